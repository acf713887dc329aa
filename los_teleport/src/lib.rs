// Line-of-sight teleport
//
// Resolves where a player looking down a sight line should be teleported to:
// onto the first prioritized object near the line, else onto the first ground
// surface the line crosses, else to the end of the line.

pub mod command;
pub mod config;
pub mod error;
pub mod layers;
pub mod physics;
pub mod scene;
pub mod teleport;

pub use command::{Caller, Effect, LineOfSightTeleport, TELEPORT_LOS_COMMAND};
pub use config::{TeleportConfig, CONFIG_VERSION};
pub use error::{TeleportError, TeleportResult};
pub use layers::{Layer, LayerMask};
pub use physics::PhysicsWorld;
pub use scene::SceneDescription;
pub use teleport::{
    resolve, CandidateObject, Destination, ObjectId, OverlapQuery, Resolution, ResolverConfig,
    SightLineResolver, SightRay, SurfaceHit, SurfaceQuery,
};
