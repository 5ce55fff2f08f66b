//! Schema management
//!
//! Migrations live in `todoctl-store/migrations/` and are embedded at compile
//! time. Each one is additive and guarded, and sqlx records applied versions
//! in `_sqlx_migrations`, so running them on every startup is safe.

use sqlx::PgPool;
use tracing::info;

use crate::error::{StoreError, StoreResult};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Apply all pending migrations in order.
///
/// Any failure is fatal for the store: a partially applied schema is never
/// handed to repositories.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    info!("Ensuring database schema...");

    MIGRATOR
        .run(pool)
        .await
        .map_err(|source| StoreError::Schema { source })?;

    info!(version = latest_version(), "Database schema ready");
    Ok(())
}

/// Highest migration version compiled into this binary.
pub fn latest_version() -> i64 {
    MIGRATOR.iter().map(|m| m.version).max().unwrap_or(0)
}

/// Highest successfully applied migration version, if any.
pub async fn schema_version(pool: &PgPool) -> StoreResult<Option<i64>> {
    let tracked: bool = sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
        .fetch_one(pool)
        .await
        .map_err(StoreError::query("check schema version table"))?;

    if !tracked {
        return Ok(None);
    }

    sqlx::query_scalar("SELECT MAX(version) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await
        .map_err(StoreError::query("read schema version"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered_and_contiguous() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(latest_version(), 3);
    }

    #[test]
    fn migrations_are_additive() {
        for migration in MIGRATOR.iter() {
            let sql = migration.sql.to_uppercase();
            assert!(
                !sql.contains("DROP TABLE") && !sql.contains("DROP COLUMN"),
                "migration {} must not drop schema objects",
                migration.version
            );
        }
    }
}
