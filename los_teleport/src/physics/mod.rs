pub mod util;
pub mod world;

pub use world::{PhysicsWorld, TrackedObject};
