// Sight-line teleport resolution
//
// Walks evenly spaced checkpoints down the player's aim ray. At each one it
// first looks for prioritized objects (vehicles, drops) around the checkpoint,
// then for ground surfaces up to the next checkpoint. The first checkpoint that
// finds either decides the destination.

pub mod query;
pub mod sight_line;

pub use query::{CandidateObject, ObjectId, OverlapQuery, SurfaceHit, SurfaceQuery};
pub use sight_line::{
    resolve, Destination, Resolution, ResolverConfig, SightLineResolver, SightRay,
    DEBUG_DRAW_DURATION,
};
