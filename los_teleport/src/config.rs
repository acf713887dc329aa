use std::fs;
use std::io;
use std::path::Path;

use engine::config_log;
use serde::{Deserialize, Serialize};

use crate::error::{TeleportError, TeleportResult};
use crate::teleport::ResolverConfig;

/// Version written into saved configuration files
pub const CONFIG_VERSION: &str = "1.0.0";

/// Files older than this are replaced by the defaults on load
const OLDEST_COMPATIBLE_VERSION: &str = "1.0.0";

/// Settings file for the line-of-sight teleport, keyed the way server owners
/// already know it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Missing means "older than anything"
    #[serde(rename = "Version", default)]
    pub version: String,

    #[serde(rename = "Teleport Distance Limit")]
    pub teleport_distance_limit: f32,

    #[serde(rename = "Entity Short Prefab Names To Prioritize")]
    pub prioritized_types: Vec<String>,

    #[serde(rename = "Radius For Detecting Nearby Entities")]
    pub detection_radius: f32,

    #[serde(rename = "Number Of Check Points During Teleportation")]
    pub checkpoint_count: u32,

    #[serde(rename = "Enable Debug")]
    pub enable_debug: bool,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            teleport_distance_limit: 900.0,
            prioritized_types: [
                "bradleyapc",
                "patrolhelicopter",
                "supply_drop",
                "minicopter.entity",
                "scraptransporthelicopter",
                "rhib",
                "rowboat",
                "cargoshiptest",
                "ch47scientists.entity",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
            detection_radius: 40.0,
            checkpoint_count: 15,
            enable_debug: false,
        }
    }
}

impl TeleportConfig {
    /// Load, migrate and validate the file at `path`. The file is only
    /// rewritten when it was missing (defaults) or migrated; current and
    /// newer files stay byte-for-byte as the owner left them.
    pub fn load(path: &Path) -> TeleportResult<Self> {
        let (mut config, created) = match fs::read_to_string(path) {
            Ok(content) => (
                serde_json::from_str(&content).map_err(|e| TeleportError::parse(path, e))?,
                false,
            ),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                config_log!(warn, "no config at {}, creating defaults", path.display());
                (Self::default(), true)
            }
            Err(e) => return Err(TeleportError::io(path, e)),
        };

        let migrated = config.migrate();
        config.validate()?;
        if created || migrated {
            config.save(path)?;
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> TeleportResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TeleportError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| TeleportError::io(path, e))?;
        config_log!(debug, "saved config to {}", path.display());
        Ok(())
    }

    /// Bring an older file up to [`CONFIG_VERSION`]. Returns true if anything
    /// changed. Newer files are left alone.
    pub fn migrate(&mut self) -> bool {
        let stored = parse_version(&self.version);
        if stored >= parse_version(CONFIG_VERSION) {
            return false;
        }

        config_log!(
            warn,
            "config version '{}' is older than {}, updating",
            self.version,
            CONFIG_VERSION
        );

        let previous = std::mem::take(&mut self.version);
        if stored < parse_version(OLDEST_COMPATIBLE_VERSION) {
            *self = Self::default();
        }
        self.version = CONFIG_VERSION.to_string();

        config_log!(
            warn,
            "config updated from version '{}' to {}",
            previous,
            CONFIG_VERSION
        );
        true
    }

    /// Reject values the resolver cannot work with.
    pub fn validate(&self) -> TeleportResult<()> {
        if self.checkpoint_count == 0 {
            return Err(TeleportError::validation(
                "Number Of Check Points During Teleportation",
                "must be at least 1",
            ));
        }

        if !self.teleport_distance_limit.is_finite() || self.teleport_distance_limit <= 0.0 {
            return Err(TeleportError::validation(
                "Teleport Distance Limit",
                format!("must be positive, got {}", self.teleport_distance_limit),
            ));
        }

        if !self.detection_radius.is_finite() || self.detection_radius < 0.0 {
            return Err(TeleportError::validation(
                "Radius For Detecting Nearby Entities",
                format!("must not be negative, got {}", self.detection_radius),
            ));
        }

        Ok(())
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new(
            self.teleport_distance_limit,
            self.detection_radius,
            self.checkpoint_count,
            self.prioritized_types.iter().cloned(),
        )
        .with_debug(self.enable_debug)
    }
}

/// `major.minor.patch`, with missing or unreadable parts counted as zero
fn parse_version(version: &str) -> (u32, u32, u32) {
    let mut parts = version
        .trim()
        .split('.')
        .map(|part| part.trim().parse::<u32>().unwrap_or(0));

    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}
