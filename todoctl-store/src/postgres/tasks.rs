//! Task repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use todoctl_core::{ItemDraft, ItemUpdate, Task};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Entity, StoreError, StoreResult};
use crate::repository::TaskRepository;

#[derive(Clone)]
pub struct PgTaskRepo {
    pool: PgPool,
}

impl PgTaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn task_from_row(row: &PgRow) -> Result<Task, sqlx::Error> {
    Ok(Task {
        id: row.try_get("id")?,
        list_id: row.try_get("list_id")?,
        name: row.try_get("task_name")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn tasks_from_rows(rows: &[PgRow]) -> StoreResult<Vec<Task>> {
    rows.iter()
        .map(task_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::query("read tasks"))
}

#[async_trait]
impl TaskRepository for PgTaskRepo {
    async fn create(&self, list_id: Uuid, draft: ItemDraft) -> StoreResult<Task> {
        let row = sqlx::query(
            r#"
            INSERT INTO tasks (list_id, task_name, description)
            VALUES ($1, $2, $3)
            RETURNING id, list_id, task_name, description, completed, created_at, updated_at
            "#,
        )
        .bind(list_id)
        .bind(draft.name.as_str())
        .bind(draft.description.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::insert(
            "create task",
            Entity::Task,
            Entity::List,
            list_id,
        ))?;

        let task = task_from_row(&row).map_err(StoreError::query("read created task"))?;
        debug!(task_id = %task.id, list_id = %list_id, "created task");
        Ok(task)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Task> {
        let row = sqlx::query(
            r#"
            SELECT id, list_id, task_name, description, completed, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::query_for("get task", id))?
        .ok_or_else(|| StoreError::not_found(Entity::Task, id))?;

        task_from_row(&row).map_err(StoreError::query_for("read task", id))
    }

    async fn get_by_list(&self, list_id: Uuid) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query(
            r#"
            SELECT id, list_id, task_name, description, completed, created_at, updated_at
            FROM tasks
            WHERE list_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::query_for("get tasks by list", list_id))?;

        tasks_from_rows(&rows)
    }

    async fn get_all(&self) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query(
            r#"
            SELECT id, list_id, task_name, description, completed, created_at, updated_at
            FROM tasks
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::query("get tasks"))?;

        tasks_from_rows(&rows)
    }

    async fn update(&self, id: Uuid, update: ItemUpdate) -> StoreResult<Task> {
        let row = sqlx::query(
            r#"
            UPDATE tasks
            SET task_name = $1,
                description = $2,
                completed = $3,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $4
            RETURNING id, list_id, task_name, description, completed, created_at, updated_at
            "#,
        )
        .bind(update.name.as_str())
        .bind(update.description.as_deref())
        .bind(update.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::query_for("update task", id))?
        .ok_or_else(|| StoreError::not_found(Entity::Task, id))?;

        debug!(task_id = %id, "updated task");
        task_from_row(&row).map_err(StoreError::query_for("read updated task", id))
    }

    async fn toggle_completion(&self, id: Uuid) -> StoreResult<Task> {
        let row = sqlx::query(
            r#"
            UPDATE tasks
            SET completed = NOT completed,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING id, list_id, task_name, description, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::query_for("toggle task completion", id))?
        .ok_or_else(|| StoreError::not_found(Entity::Task, id))?;

        let task =
            task_from_row(&row).map_err(StoreError::query_for("read toggled task", id))?;
        debug!(task_id = %id, completed = task.completed, "toggled task");
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::query_for("delete task", id))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Entity::Task, id));
        }

        debug!(task_id = %id, "deleted task");
        Ok(())
    }
}
