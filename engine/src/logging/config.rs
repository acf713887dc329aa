use std::collections::HashMap;
use tracing::Level;

/// Environment variable read by the tools when no other name is given.
pub const DEFAULT_LOG_ENV_VAR: &str = "LOS_LOG";

/// Per-scope log levels, e.g. `warn,teleport=debug,physics=trace`.
#[derive(Debug, Clone)]
pub struct LogConfig {
    global_level: Level,
    scope_levels: HashMap<String, Level>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            global_level: Level::WARN,
            scope_levels: HashMap::new(),
        }
    }

    pub fn from_env(env_var_name: &str) -> Self {
        match std::env::var(env_var_name) {
            Ok(spec) => Self::parse(&spec),
            Err(_) => Self::new(),
        }
    }

    /// Parse a comma separated directive list. Unknown levels are skipped.
    pub fn parse(spec: &str) -> Self {
        let mut config = Self::new();

        for directive in spec.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((scope, level)) => {
                    if let Some(level) = parse_level(level) {
                        config
                            .scope_levels
                            .insert(scope.trim().to_string(), level);
                    }
                }
                None => {
                    if let Some(level) = parse_level(directive) {
                        config.global_level = level;
                    }
                }
            }
        }

        config
    }

    /// Overridden scopes that no logging macro emits, usually typos.
    pub fn unknown_scopes(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .scope_levels
            .keys()
            .map(String::as_str)
            .filter(|scope| !super::scope::ALL.contains(scope))
            .collect();
        unknown.sort_unstable();
        unknown
    }

    pub fn should_log(&self, scope: &str, level: Level) -> bool {
        level <= self.level_for(scope)
    }

    pub fn level_for(&self, scope: &str) -> Level {
        self.scope_levels
            .get(scope)
            .copied()
            .unwrap_or(self.global_level)
    }

    /// Most verbose level enabled by any scope.
    pub fn max_level(&self) -> Level {
        self.scope_levels
            .values()
            .copied()
            .fold(self.global_level, |max, level| max.max(level))
    }

    pub fn set_global_level(&mut self, level: Level) {
        self.global_level = level;
    }

    pub fn set_scope_level(&mut self, scope: impl Into<String>, level: Level) {
        self.scope_levels.insert(scope.into(), level);
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Install the `tracing` subscriber and the process-wide scope config.
///
/// `verbose` lifts the global level to debug regardless of the environment.
/// `RUST_LOG`, when set, still drives the subscriber filter itself.
pub fn init_logging(env_var_name: &str, verbose: bool) -> LogConfig {
    let mut config = LogConfig::from_env(env_var_name);
    if verbose && config.global_level < Level::DEBUG {
        config.set_global_level(Level::DEBUG);
    }

    let fallback = config.max_level().to_string().to_lowercase();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_target(false)
        .try_init();

    for scope in config.unknown_scopes() {
        tracing::warn!("{} names unknown log scope '{}'", env_var_name, scope);
    }
    if !super::set_log_config(config.clone()) {
        tracing::warn!("logging already initialized, keeping the first config");
    }
    config
}
