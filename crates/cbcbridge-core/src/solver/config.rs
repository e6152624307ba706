//! Solver configuration types.

use std::env;
use tracing::warn;

/// Environment variable holding the default CBC log level for new handles.
pub const SOLVER_LOG_LEVEL_ENV: &str = "CBC_BRIDGE_SOLVER_LOG_LEVEL";

/// Configuration applied to every solve of a handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// CBC console log level (`0` silences CBC). `None` uses the CBC default.
    pub log_level: Option<u32>,
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `CBC_BRIDGE_SOLVER_LOG_LEVEL`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        match env::var(SOLVER_LOG_LEVEL_ENV) {
            Ok(raw) => Self::new().with_log_level_str(&raw),
            Err(_) => Self::new(),
        }
    }

    fn with_log_level_str(self, raw: &str) -> Self {
        match raw.trim().parse::<u32>() {
            Ok(level) => self.with_log_level(level),
            Err(err) => {
                warn!(
                    component = "config",
                    operation = "from_env",
                    status = "warn",
                    variable = SOLVER_LOG_LEVEL_ENV,
                    value = raw,
                    %err,
                    "Ignoring invalid solver log level"
                );
                self
            }
        }
    }

    /// Set the CBC log level.
    pub fn with_log_level(mut self, level: u32) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.log_level.is_none()
    }
}
