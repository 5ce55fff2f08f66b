//! PostgreSQL backend

mod lists;
mod subtasks;
mod tasks;

pub use lists::PgListRepo;
pub use subtasks::PgSubTaskRepo;
pub use tasks::PgTaskRepo;

use async_trait::async_trait;
use sqlx::PgPool;
use todoctl_core::DatabaseConfig;
use tracing::{error, info};

use crate::error::StoreResult;
use crate::pool::create_pool;
use crate::repository::{Backend, ListRepository, SubTaskRepository, TaskRepository};
use crate::schema::{ensure_schema, schema_version};

/// Store backed by a shared connection pool. Each repository holds a clone
/// of the same pool.
pub struct PgStore {
    pool: PgPool,
    lists: PgListRepo,
    tasks: PgTaskRepo,
    subtasks: PgSubTaskRepo,
}

impl PgStore {
    /// Connect, verify reachability, and bring the schema up to date.
    ///
    /// Nothing is returned until every migration has been applied.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = create_pool(config).await?;

        if let Err(e) = ensure_schema(&pool).await {
            error!(error = %e, "schema initialization failed");
            pool.close().await;
            return Err(e);
        }

        Ok(Self::from_pool(pool))
    }

    /// Wrap a pool whose schema is already current.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            lists: PgListRepo::new(pool.clone()),
            tasks: PgTaskRepo::new(pool.clone()),
            subtasks: PgSubTaskRepo::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Highest applied migration version.
    pub async fn schema_version(&self) -> StoreResult<Option<i64>> {
        schema_version(&self.pool).await
    }
}

#[async_trait]
impl Backend for PgStore {
    fn lists(&self) -> &dyn ListRepository {
        &self.lists
    }

    fn tasks(&self) -> &dyn TaskRepository {
        &self.tasks
    }

    fn subtasks(&self) -> &dyn SubTaskRepository {
        &self.subtasks
    }

    async fn close(self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}
