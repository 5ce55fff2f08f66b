//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is created
//! eagerly: an unreachable database fails here, not on the first query.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use todoctl_core::{DatabaseConfig, SslMode};
use tracing::info;

use crate::error::{StoreError, StoreResult};

/// Create a PostgreSQL connection pool from a connection descriptor.
///
/// # Errors
///
/// Returns `StoreError::Config` if the descriptor cannot be turned into
/// connect options and `StoreError::Connect` if the database is unreachable.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DatabaseConfig::from_env()?).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> StoreResult<PgPool> {
    let options = connect_options(config)?;

    info!(
        database = %config,
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "connecting to database"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_with(options)
        .await
        .map_err(|source| StoreError::Connect { source })?;

    ping(&pool).await?;
    Ok(pool)
}

/// Round-trip a trivial query to prove the pool can reach the server.
pub async fn ping(pool: &PgPool) -> StoreResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|source| StoreError::Connect { source })?;
    Ok(())
}

/// Build connect options from either `DATABASE_URL` or the individual fields.
pub fn connect_options(config: &DatabaseConfig) -> StoreResult<PgConnectOptions> {
    config.validate().map_err(|e| StoreError::Config {
        reason: e.to_string(),
    })?;

    if let Some(url) = &config.url {
        return PgConnectOptions::from_str(url).map_err(|e| StoreError::Config {
            reason: format!("malformed DATABASE_URL: {}", e),
        });
    }

    if config.host.trim().is_empty() {
        return Err(StoreError::Config {
            reason: "database host is empty".into(),
        });
    }
    if config.name.trim().is_empty() {
        return Err(StoreError::Config {
            reason: "database name is empty".into(),
        });
    }

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
        .ssl_mode(pg_ssl_mode(config.ssl_mode)))
}

fn pg_ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Allow => PgSslMode::Allow,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
        SslMode::VerifyCa => PgSslMode::VerifyCa,
        SslMode::VerifyFull => PgSslMode::VerifyFull,
    }
}
