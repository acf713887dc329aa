//! Scoped logging on top of `tracing`.
//!
//! Every event carries a `scope` field naming the subsystem that emitted it.
//! Levels are configured per scope through [`DEFAULT_LOG_ENV_VAR`], e.g.
//! `LOS_LOG=warn,teleport=debug`.

pub mod config;
pub mod macros;

pub use config::{init_logging, LogConfig, DEFAULT_LOG_ENV_VAR};
pub use tracing::{debug, error, info, trace, warn, Level};

use once_cell::sync::Lazy;
use std::sync::OnceLock;

/// Scope names used by the logging macros.
pub mod scope {
    pub const TELEPORT: &str = "teleport";
    pub const PHYSICS: &str = "physics";
    pub const CONFIG: &str = "config";
    pub const COMMAND: &str = "command";

    pub const ALL: [&str; 4] = [TELEPORT, PHYSICS, CONFIG, COMMAND];
}

static LOG_CONFIG: OnceLock<LogConfig> = OnceLock::new();
static DEFAULT_CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::default);

/// Config installed by [`init_logging`], or the defaults before that.
pub fn get_log_config() -> &'static LogConfig {
    LOG_CONFIG.get().unwrap_or(&DEFAULT_CONFIG)
}

/// Whether an event at `level` in `scope` passes the installed config.
pub fn scope_enabled(scope: &str, level: Level) -> bool {
    get_log_config().should_log(scope, level)
}

/// First install wins; returns false when a config was already in place.
pub(crate) fn set_log_config(config: LogConfig) -> bool {
    LOG_CONFIG.set(config).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_names_are_unique() {
        for (i, a) in scope::ALL.iter().enumerate() {
            for b in &scope::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_scopes_parse_as_overrides() {
        for name in scope::ALL {
            let config = LogConfig::parse(&format!("error,{}=trace", name));
            assert_eq!(config.level_for(name), Level::TRACE);
            assert!(config.should_log(name, Level::DEBUG));
        }
    }
}
