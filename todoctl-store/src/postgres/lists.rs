//! List repository
//!
//! Position writers (create and reorder) serialize on a transaction-scoped
//! advisory lock, so two creates never claim the same `MAX(position) + 1`
//! and a create never lands in the middle of a reorder. Readers do not take
//! the lock.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use todoctl_core::{List, ListTitle};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Entity, StoreError, StoreResult};
use crate::repository::ListRepository;

/// Advisory lock key guarding `lists.position` writes.
const LIST_POSITION_LOCK: i64 = 0x7464_6c73_706f_7300;

/// PostgreSQL-backed list repository
#[derive(Clone)]
pub struct PgListRepo {
    pool: PgPool,
}

impl PgListRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn list_from_row(row: &PgRow) -> Result<List, sqlx::Error> {
    Ok(List {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        position: row.try_get("position")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

async fn lock_positions(tx: &mut Transaction<'_, Postgres>) -> StoreResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(LIST_POSITION_LOCK)
        .execute(&mut **tx)
        .await
        .map_err(StoreError::query("lock list positions"))?;
    Ok(())
}

#[async_trait]
impl ListRepository for PgListRepo {
    async fn create(&self, title: ListTitle) -> StoreResult<List> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(StoreError::query("begin list creation"))?;

        lock_positions(&mut tx).await?;

        let row = sqlx::query(
            r#"
            INSERT INTO lists (title, position)
            SELECT $1, COALESCE(MAX(position), 0) + 1 FROM lists
            RETURNING id, title, position, created_at, updated_at
            "#,
        )
        .bind(title.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::query("create list"))?;
        let list = list_from_row(&row).map_err(StoreError::query("read created list"))?;

        tx.commit()
            .await
            .map_err(StoreError::query("commit list creation"))?;

        debug!(list_id = %list.id, position = list.position, "created list");
        Ok(list)
    }

    async fn get(&self, id: Uuid) -> StoreResult<List> {
        let row = sqlx::query(
            r#"
            SELECT id, title, position, created_at, updated_at
            FROM lists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::query_for("get list", id))?
        .ok_or_else(|| StoreError::not_found(Entity::List, id))?;

        list_from_row(&row).map_err(StoreError::query_for("read list", id))
    }

    async fn get_all(&self) -> StoreResult<Vec<List>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, position, created_at, updated_at
            FROM lists
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::query("get lists"))?;

        rows.iter()
            .map(list_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::query("read lists"))
    }

    async fn update(&self, id: Uuid, title: ListTitle) -> StoreResult<List> {
        let row = sqlx::query(
            r#"
            UPDATE lists
            SET title = $1,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $2
            RETURNING id, title, position, created_at, updated_at
            "#,
        )
        .bind(title.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::query_for("update list", id))?
        .ok_or_else(|| StoreError::not_found(Entity::List, id))?;

        debug!(list_id = %id, "updated list");
        list_from_row(&row).map_err(StoreError::query_for("read updated list", id))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::query_for("delete list", id))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Entity::List, id));
        }

        debug!(list_id = %id, "deleted list");
        Ok(())
    }

    async fn reorder(&self, ordered_ids: &[Uuid]) -> StoreResult<()> {
        if ordered_ids.is_empty() {
            return Ok(());
        }

        // Dropping the transaction on any early return rolls it back.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(StoreError::query("begin list reorder"))?;

        lock_positions(&mut tx).await?;

        let mut matched = 0u64;
        for (position, id) in (1i32..).zip(ordered_ids) {
            let result = sqlx::query(
                r#"
                UPDATE lists
                SET position = $1,
                    updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
                WHERE id = $2
                "#,
            )
            .bind(position)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::query_for("update list position", *id))?;

            matched += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(StoreError::query("commit list reorder"))?;

        debug!(
            requested = ordered_ids.len(),
            unmatched = ordered_ids.len() as u64 - matched,
            "reordered lists"
        );
        Ok(())
    }
}
