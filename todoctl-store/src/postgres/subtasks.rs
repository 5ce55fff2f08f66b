//! SubTask repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use todoctl_core::{ItemDraft, ItemUpdate, SubTask};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Entity, StoreError, StoreResult};
use crate::repository::SubTaskRepository;

#[derive(Clone)]
pub struct PgSubTaskRepo {
    pool: PgPool,
}

impl PgSubTaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn subtask_from_row(row: &PgRow) -> Result<SubTask, sqlx::Error> {
    Ok(SubTask {
        id: row.try_get("id")?,
        task_id: row.try_get("task_id")?,
        name: row.try_get("subtask_name")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn subtasks_from_rows(rows: &[PgRow]) -> StoreResult<Vec<SubTask>> {
    rows.iter()
        .map(subtask_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::query("read subtasks"))
}

#[async_trait]
impl SubTaskRepository for PgSubTaskRepo {
    async fn create(&self, task_id: Uuid, draft: ItemDraft) -> StoreResult<SubTask> {
        let row = sqlx::query(
            r#"
            INSERT INTO subtasks (task_id, subtask_name, description)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, subtask_name, description, completed, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(draft.name.as_str())
        .bind(draft.description.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::insert(
            "create subtask",
            Entity::SubTask,
            Entity::Task,
            task_id,
        ))?;

        let subtask = subtask_from_row(&row).map_err(StoreError::query("read created subtask"))?;
        debug!(subtask_id = %subtask.id, task_id = %task_id, "created subtask");
        Ok(subtask)
    }

    async fn get(&self, id: Uuid) -> StoreResult<SubTask> {
        let row = sqlx::query(
            r#"
            SELECT id, task_id, subtask_name, description, completed, created_at, updated_at
            FROM subtasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::query_for("get subtask", id))?
        .ok_or_else(|| StoreError::not_found(Entity::SubTask, id))?;

        subtask_from_row(&row).map_err(StoreError::query_for("read subtask", id))
    }

    async fn get_by_task(&self, task_id: Uuid) -> StoreResult<Vec<SubTask>> {
        let rows = sqlx::query(
            r#"
            SELECT id, task_id, subtask_name, description, completed, created_at, updated_at
            FROM subtasks
            WHERE task_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::query_for("get subtasks by task", task_id))?;

        subtasks_from_rows(&rows)
    }

    async fn get_all(&self) -> StoreResult<Vec<SubTask>> {
        let rows = sqlx::query(
            r#"
            SELECT id, task_id, subtask_name, description, completed, created_at, updated_at
            FROM subtasks
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::query("get subtasks"))?;

        subtasks_from_rows(&rows)
    }

    async fn update(&self, id: Uuid, update: ItemUpdate) -> StoreResult<SubTask> {
        let row = sqlx::query(
            r#"
            UPDATE subtasks
            SET subtask_name = $1,
                description = $2,
                completed = $3,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $4
            RETURNING id, task_id, subtask_name, description, completed, created_at, updated_at
            "#,
        )
        .bind(update.name.as_str())
        .bind(update.description.as_deref())
        .bind(update.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::query_for("update subtask", id))?
        .ok_or_else(|| StoreError::not_found(Entity::SubTask, id))?;

        debug!(subtask_id = %id, "updated subtask");
        subtask_from_row(&row).map_err(StoreError::query_for("read updated subtask", id))
    }

    async fn toggle_completion(&self, id: Uuid) -> StoreResult<SubTask> {
        let row = sqlx::query(
            r#"
            UPDATE subtasks
            SET completed = NOT completed,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING id, task_id, subtask_name, description, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::query_for("toggle subtask completion", id))?
        .ok_or_else(|| StoreError::not_found(Entity::SubTask, id))?;

        let subtask =
            subtask_from_row(&row).map_err(StoreError::query_for("read toggled subtask", id))?;
        debug!(subtask_id = %id, completed = subtask.completed, "toggled subtask");
        Ok(subtask)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::query_for("delete subtask", id))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Entity::SubTask, id));
        }

        debug!(subtask_id = %id, "deleted subtask");
        Ok(())
    }
}
