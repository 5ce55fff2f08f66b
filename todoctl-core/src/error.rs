//! Configuration errors for todoctl-core.
//!
//! Invalid environment values are reported instead of silently replaced by
//! defaults, so a typo in `DB_PORT` fails at startup rather than connecting
//! somewhere unexpected.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable holds a value that cannot be parsed
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// Pool sizing is inconsistent
    #[error("Invalid pool size: min_connections ({min}) exceeds max_connections ({max})")]
    PoolSize { min: u32, max: u32 },
}

/// Result type alias for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub fn invalid_value(
        key: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
