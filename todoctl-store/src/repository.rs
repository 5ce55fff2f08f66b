//! Repository traits for data access abstraction.
//!
//! Every backend (PostgreSQL, in-memory) implements the same contracts, so
//! `TodoService` and its callers never depend on a concrete store.

use async_trait::async_trait;
use todoctl_core::{ItemDraft, ItemUpdate, List, ListTitle, SubTask, Task};
use uuid::Uuid;

use crate::error::StoreResult;

/// Repository for List operations.
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Create a list at the next free position (current maximum + 1).
    async fn create(&self, title: ListTitle) -> StoreResult<List>;

    /// Get a list by ID.
    async fn get(&self, id: Uuid) -> StoreResult<List>;

    /// Get all lists ordered by position.
    async fn get_all(&self) -> StoreResult<Vec<List>>;

    /// Rename a list.
    async fn update(&self, id: Uuid, title: ListTitle) -> StoreResult<List>;

    /// Delete a list and, by cascade, its tasks and their subtasks.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Rewrite positions to match `ordered_ids` (1-based), atomically.
    ///
    /// Unknown IDs are skipped; an empty slice changes nothing.
    async fn reorder(&self, ordered_ids: &[Uuid]) -> StoreResult<()>;
}

/// Repository for Task operations.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, list_id: Uuid, draft: ItemDraft) -> StoreResult<Task>;

    async fn get(&self, id: Uuid) -> StoreResult<Task>;

    /// Tasks of one list, newest first.
    async fn get_by_list(&self, list_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Tasks of all lists, newest first.
    async fn get_all(&self) -> StoreResult<Vec<Task>>;

    async fn update(&self, id: Uuid, update: ItemUpdate) -> StoreResult<Task>;

    async fn toggle_completion(&self, id: Uuid) -> StoreResult<Task>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

/// Repository for SubTask operations.
#[async_trait]
pub trait SubTaskRepository: Send + Sync {
    async fn create(&self, task_id: Uuid, draft: ItemDraft) -> StoreResult<SubTask>;

    async fn get(&self, id: Uuid) -> StoreResult<SubTask>;

    /// Subtasks of one task, newest first.
    async fn get_by_task(&self, task_id: Uuid) -> StoreResult<Vec<SubTask>>;

    /// Subtasks of all tasks, newest first.
    async fn get_all(&self) -> StoreResult<Vec<SubTask>>;

    async fn update(&self, id: Uuid, update: ItemUpdate) -> StoreResult<SubTask>;

    async fn toggle_completion(&self, id: Uuid) -> StoreResult<SubTask>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

/// A complete storage backend.
#[async_trait]
pub trait Backend: Send + Sync {
    fn lists(&self) -> &dyn ListRepository;

    fn tasks(&self) -> &dyn TaskRepository;

    fn subtasks(&self) -> &dyn SubTaskRepository;

    /// Release all resources. Consumes the backend, so it runs at most once.
    async fn close(self)
    where
        Self: Sized;
}
