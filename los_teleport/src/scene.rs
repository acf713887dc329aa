use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TeleportError, TeleportResult};
use crate::layers::Layer;

/// Scene file: objects that can be teleported onto and the ground around them.
///
/// ```json
/// {
///   "objects": [{ "type_name": "rhib", "position": [32, 0, 0], "layer": "vehicle" }],
///   "surfaces": [{ "center": [0, -1, 0], "half_extents": [500, 1, 500] }]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub surfaces: Vec<SceneSurface>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub type_name: String,
    pub position: [f32; 3],
    #[serde(default = "default_object_radius")]
    pub radius: f32,
    #[serde(default)]
    pub layer: Layer,
    /// Trigger volume instead of a solid collider
    #[serde(default)]
    pub sensor: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneSurface {
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
    #[serde(default = "default_surface_layer")]
    pub layer: Layer,
}

fn default_object_radius() -> f32 {
    1.0
}

fn default_surface_layer() -> Layer {
    Layer::Terrain
}

impl SceneDescription {
    pub fn load(path: &Path) -> TeleportResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| TeleportError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| TeleportError::parse(path, e))
    }

    pub fn from_json(json: &str) -> TeleportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
