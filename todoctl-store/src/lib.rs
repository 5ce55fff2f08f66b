//! todoctl-store: data access for lists, tasks, and subtasks
//!
//! Everything goes through [`TodoService`], which is generic over a
//! [`Backend`]. [`PgStore`] is the PostgreSQL backend: it owns a connection
//! pool and brings the schema up to date before handing out repositories.
//! [`MemoryStore`] honours the same contracts without a database.

pub mod error;
pub mod memory;
pub mod pool;
pub mod postgres;
pub mod repository;
pub mod schema;
pub mod service;

pub use error::{Entity, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use pool::{create_pool, ping};
pub use postgres::PgStore;
pub use repository::{Backend, ListRepository, SubTaskRepository, TaskRepository};
pub use schema::{ensure_schema, latest_version, schema_version, MIGRATOR};
pub use service::TodoService;
