use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Collision layers a collider can live on, and which queries can see it.
    pub struct LayerMask: u32 {
        const DEFAULT = 1 << 0;
        const DEPLOYED = 1 << 1;
        const PLAYER = 1 << 2;
        const AI = 1 << 3;
        const VEHICLE = 1 << 4;
        const VEHICLE_LARGE = 1 << 5;
        const PHYSICS_DEBRIS = 1 << 6;
        const TRIGGER = 1 << 7;
        const WORLD = 1 << 8;
        const TERRAIN = 1 << 9;
        const CONSTRUCTION = 1 << 10;

        /// Anything a player can stand on
        const GROUND = Self::WORLD.bits | Self::TERRAIN.bits | Self::CONSTRUCTION.bits;

        /// Layers scanned for prioritized objects. Some vehicles (helicopters)
        /// only expose trigger volumes, so the trigger layer is included.
        const OBJECT_SEARCH = Self::DEFAULT.bits
            | Self::DEPLOYED.bits
            | Self::AI.bits
            | Self::VEHICLE.bits
            | Self::VEHICLE_LARGE.bits
            | Self::PHYSICS_DEBRIS.bits
            | Self::TRIGGER.bits;
    }
}

/// Single named layer, as written in scene files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Default,
    Deployed,
    Player,
    Ai,
    Vehicle,
    VehicleLarge,
    PhysicsDebris,
    Trigger,
    World,
    Terrain,
    Construction,
}

impl Layer {
    pub fn mask(self) -> LayerMask {
        match self {
            Layer::Default => LayerMask::DEFAULT,
            Layer::Deployed => LayerMask::DEPLOYED,
            Layer::Player => LayerMask::PLAYER,
            Layer::Ai => LayerMask::AI,
            Layer::Vehicle => LayerMask::VEHICLE,
            Layer::VehicleLarge => LayerMask::VEHICLE_LARGE,
            Layer::PhysicsDebris => LayerMask::PHYSICS_DEBRIS,
            Layer::Trigger => LayerMask::TRIGGER,
            Layer::World => LayerMask::WORLD,
            Layer::Terrain => LayerMask::TERRAIN,
            Layer::Construction => LayerMask::CONSTRUCTION,
        }
    }

    pub fn is_ground(self) -> bool {
        LayerMask::GROUND.contains(self.mask())
    }
}

impl Default for Layer {
    fn default() -> Self {
        Layer::Default
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        layer.mask()
    }
}
