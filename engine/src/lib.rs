pub mod debug_draw;
pub mod logging;
mod macros;

pub use debug_draw::{DebugDrawSink, DrawRecorder, DrawRequest, DrawShape};
