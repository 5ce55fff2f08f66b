//! Service facade
//!
//! `TodoService` is the API callers use. It accepts plain strings, validates
//! them into core newtypes before touching the backend, and forwards to the
//! backend's repositories.

use todoctl_core::{DatabaseConfig, ItemDraft, ItemUpdate, List, ListTitle, SubTask, Task};
use tracing::instrument;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::postgres::PgStore;
use crate::repository::Backend;

pub struct TodoService<B: Backend> {
    backend: B,
}

impl TodoService<PgStore> {
    /// Connect to PostgreSQL and apply pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        Ok(Self::new(PgStore::connect(config).await?))
    }
}

impl<B: Backend> TodoService<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Release the backend. Consumes the service.
    pub async fn close(self) {
        self.backend.close().await;
    }

    // ---- Lists ----

    #[instrument(skip(self))]
    pub async fn create_list(&self, title: &str) -> StoreResult<List> {
        let title = ListTitle::new(title)?;
        self.backend.lists().create(title).await
    }

    pub async fn get_list(&self, id: Uuid) -> StoreResult<List> {
        self.backend.lists().get(id).await
    }

    pub async fn get_all_lists(&self) -> StoreResult<Vec<List>> {
        self.backend.lists().get_all().await
    }

    #[instrument(skip(self))]
    pub async fn update_list(&self, id: Uuid, title: &str) -> StoreResult<List> {
        let title = ListTitle::new(title)?;
        self.backend.lists().update(id, title).await
    }

    #[instrument(skip(self))]
    pub async fn delete_list(&self, id: Uuid) -> StoreResult<()> {
        self.backend.lists().delete(id).await
    }

    /// Assign positions 1..=n following `ids`. Atomic: either every position
    /// is written or none is.
    #[instrument(skip_all, fields(count = ids.len()))]
    pub async fn reorder_lists(&self, ids: &[Uuid]) -> StoreResult<()> {
        self.backend.lists().reorder(ids).await
    }

    // ---- Tasks ----

    #[instrument(skip(self, description))]
    pub async fn create_task(
        &self,
        list_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<Task> {
        let draft = ItemDraft::new(name, description)?;
        self.backend.tasks().create(list_id, draft).await
    }

    pub async fn get_task(&self, id: Uuid) -> StoreResult<Task> {
        self.backend.tasks().get(id).await
    }

    pub async fn get_tasks_by_list_id(&self, list_id: Uuid) -> StoreResult<Vec<Task>> {
        self.backend.tasks().get_by_list(list_id).await
    }

    pub async fn get_all_tasks(&self) -> StoreResult<Vec<Task>> {
        self.backend.tasks().get_all().await
    }

    /// Replace name, description and completion flag in one statement.
    #[instrument(skip(self, description))]
    pub async fn update_task(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        completed: bool,
    ) -> StoreResult<Task> {
        let update = ItemUpdate::new(name, description, completed)?;
        self.backend.tasks().update(id, update).await
    }

    #[instrument(skip(self))]
    pub async fn toggle_task_completion(&self, id: Uuid) -> StoreResult<Task> {
        self.backend.tasks().toggle_completion(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        self.backend.tasks().delete(id).await
    }

    // ---- SubTasks ----

    #[instrument(skip(self, description))]
    pub async fn create_subtask(
        &self,
        task_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<SubTask> {
        let draft = ItemDraft::new(name, description)?;
        self.backend.subtasks().create(task_id, draft).await
    }

    pub async fn get_subtask(&self, id: Uuid) -> StoreResult<SubTask> {
        self.backend.subtasks().get(id).await
    }

    pub async fn get_subtasks_by_task_id(&self, task_id: Uuid) -> StoreResult<Vec<SubTask>> {
        self.backend.subtasks().get_by_task(task_id).await
    }

    pub async fn get_all_subtasks(&self) -> StoreResult<Vec<SubTask>> {
        self.backend.subtasks().get_all().await
    }

    #[instrument(skip(self, description))]
    pub async fn update_subtask(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        completed: bool,
    ) -> StoreResult<SubTask> {
        let update = ItemUpdate::new(name, description, completed)?;
        self.backend.subtasks().update(id, update).await
    }

    #[instrument(skip(self))]
    pub async fn toggle_subtask_completion(&self, id: Uuid) -> StoreResult<SubTask> {
        self.backend.subtasks().toggle_completion(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_subtask(&self, id: Uuid) -> StoreResult<()> {
        self.backend.subtasks().delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn rejects_blank_title_before_touching_backend() {
        let service = TodoService::new(MemoryStore::new());
        let err = service.create_list("   ").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(service.get_all_lists().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn trims_names_and_drops_empty_descriptions() {
        let service = TodoService::new(MemoryStore::new());
        let list = service.create_list("  Errands ").await.unwrap();
        assert_eq!(list.title, "Errands");

        let task = service
            .create_task(list.id, " post office ", Some("   "))
            .await
            .unwrap();
        assert_eq!(task.name, "post office");
        assert_eq!(task.description, None);
    }

    #[tokio::test]
    async fn update_replaces_all_mutable_fields() {
        let service = TodoService::new(MemoryStore::new());
        let list = service.create_list("Work").await.unwrap();
        let task = service
            .create_task(list.id, "draft", Some("first pass"))
            .await
            .unwrap();

        let updated = service
            .update_task(task.id, "final", None, true)
            .await
            .unwrap();
        assert_eq!(updated.name, "final");
        assert_eq!(updated.description, None);
        assert!(updated.completed);
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at > task.updated_at);
    }
}
