//! Engine configuration
//!
//! Read-only defaults, optionally overridden from JSON. Missing fields keep
//! their defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long a multi-key prefix waits for its next key
    pub prefix_timeout_ms: u64,
    /// Spaces inserted by Tab in insert mode
    pub tab_width: usize,
}

impl EngineConfig {
    pub const DEFAULT_PREFIX_TIMEOUT_MS: u64 = 1000;
    pub const DEFAULT_TAB_WIDTH: usize = 4;

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "prefix_timeout_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.tab_width > 16 {
            return Err(ConfigError::InvalidValue {
                field: "tab_width",
                reason: format!("{} is larger than 16", self.tab_width),
            });
        }
        Ok(())
    }

    pub fn prefix_timeout(&self) -> Duration {
        Duration::from_millis(self.prefix_timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prefix_timeout_ms: Self::DEFAULT_PREFIX_TIMEOUT_MS,
            tab_width: Self::DEFAULT_TAB_WIDTH,
        }
    }
}
