//! Tracing setup for the todoctl CLI
//!
//! Usage:
//!   todoctl --debug ...                  # Debug logging
//!   RUST_LOG=todoctl_store=debug todoctl # Fine-grained log control
//!   LOG_LEVEL=warn todoctl ...           # Level from the environment or .env
//!
//! Logs go to stderr so `--json` output on stdout stays pipeable.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Force debug level (overrides RUST_LOG and LOG_LEVEL)
    pub debug: bool,
    /// Fallback level when RUST_LOG is unset
    pub log_level: String,
}

/// Filter precedence: `--debug`, then `RUST_LOG`, then `LOG_LEVEL`, then info.
fn build_filter(config: &TracingConfig) -> EnvFilter {
    if config.debug {
        return EnvFilter::new("debug");
    }

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

