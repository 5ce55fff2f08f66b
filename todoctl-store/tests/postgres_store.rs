//! PostgreSQL integration tests
//!
//! Each test gets a fresh database from `#[sqlx::test]`.
//! Run with: DATABASE_URL=postgres://... cargo test -p todoctl-store -- --ignored

use anyhow::Result;
use sqlx::PgPool;
use todoctl_store::{ensure_schema, latest_version, schema_version, PgStore, TodoService};
use uuid::Uuid;

fn service(pool: PgPool) -> TodoService<PgStore> {
    TodoService::new(PgStore::from_pool(pool))
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn schema_setup_is_idempotent(pool: PgPool) -> Result<()> {
    ensure_schema(&pool).await?;
    ensure_schema(&pool).await?;

    assert_eq!(schema_version(&pool).await?, Some(latest_version()));
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn legacy_schema_is_adopted(pool: PgPool) -> Result<()> {
    sqlx::raw_sql(
        r#"
        CREATE EXTENSION IF NOT EXISTS "uuid-ossp";
        CREATE TABLE lists (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            title VARCHAR(255) NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        CREATE TABLE tasks (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            list_id UUID NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
            task_name VARCHAR(255) NOT NULL,
            completed BOOLEAN DEFAULT FALSE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        CREATE TABLE subtasks (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            subtask_name VARCHAR(255) NOT NULL,
            completed BOOLEAN DEFAULT FALSE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        INSERT INTO lists (title, created_at) VALUES
            ('older', '2024-01-01 00:00:00'),
            ('newer', '2024-02-01 00:00:00');
        "#,
    )
    .execute(&pool)
    .await?;

    assert_eq!(schema_version(&pool).await?, None);
    ensure_schema(&pool).await?;
    assert_eq!(schema_version(&pool).await?, Some(latest_version()));

    let svc = service(pool);
    let lists = svc.get_all_lists().await?;
    let titles: Vec<(&str, i32)> = lists
        .iter()
        .map(|l| (l.title.as_str(), l.position))
        .collect();
    assert_eq!(titles, vec![("older", 1), ("newer", 2)]);

    let task = svc
        .create_task(lists[0].id, "migrated", Some("has a description"))
        .await?;
    assert_eq!(task.description.as_deref(), Some("has a description"));
    Ok(())
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn create_then_get_list(pool: PgPool) -> Result<()> {
    let svc = service(pool);
    let created = svc.create_list("Groceries").await?;
    let fetched = svc.get_list(created.id).await?;

    assert_eq!(fetched.title, "Groceries");
    assert_eq!(fetched.position, 1);
    assert_eq!(fetched, created);
    Ok(())
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn get_all_on_empty_tables(pool: PgPool) -> Result<()> {
    let svc = service(pool);
    assert!(svc.get_all_lists().await?.is_empty());
    assert!(svc.get_all_tasks().await?.is_empty());
    assert!(svc.get_all_subtasks().await?.is_empty());
    Ok(())
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn concurrent_creates_get_distinct_positions(pool: PgPool) -> Result<()> {
    let svc = std::sync::Arc::new(service(pool));
    let mut handles = Vec::new();
    for n in 0..8 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            svc.create_list(&format!("list {n}")).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let mut positions: Vec<i32> = svc
        .get_all_lists()
        .await?
        .iter()
        .map(|l| l.position)
        .collect();
    positions.sort_unstable();
    assert_eq!(positions, (1..=8).collect::<Vec<_>>());
    Ok(())
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn reorder_lists(pool: PgPool) -> Result<()> {
    let svc = service(pool);
    let id1 = svc.create_list("one").await?.id;
    let id2 = svc.create_list("two").await?.id;
    let id3 = svc.create_list("three").await?.id;

    svc.reorder_lists(&[id3, id1, id2]).await?;
    let order: Vec<(Uuid, i32)> = svc
        .get_all_lists()
        .await?
        .iter()
        .map(|l| (l.id, l.position))
        .collect();
    assert_eq!(order, vec![(id3, 1), (id1, 2), (id2, 3)]);

    let before = svc.get_all_lists().await?;
    svc.reorder_lists(&[]).await?;
    assert_eq!(svc.get_all_lists().await?, before);

    svc.reorder_lists(&[Uuid::new_v4(), id1]).await?;
    assert_eq!(svc.get_list(id1).await?.position, 2);
    Ok(())
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn failed_reorder_leaves_positions_untouched(pool: PgPool) -> Result<()> {
    let svc = service(pool.clone());
    let a = svc.create_list("a").await?.id;
    let b = svc.create_list("b").await?.id;
    let before = svc.get_all_lists().await?;

    // b is renumbered first, then the update of a raises
    sqlx::raw_sql(&format!(
        r#"
        CREATE FUNCTION reject_list_update() RETURNS trigger AS $$
        BEGIN
            IF NEW.id = '{a}' THEN
                RAISE EXCEPTION 'list {a} is locked';
            END IF;
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql;
        CREATE TRIGGER reject_list_update BEFORE UPDATE ON lists
            FOR EACH ROW EXECUTE FUNCTION reject_list_update();
        "#
    ))
    .execute(&pool)
    .await?;

    let err = svc.reorder_lists(&[b, a]).await.unwrap_err();
    assert!(err.to_string().contains("update list position"));
    assert!(err.to_string().contains(&format!("(id {a})")));

    assert_eq!(svc.get_all_lists().await?, before);
    Ok(())
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn toggle_twice_restores_completion(pool: PgPool) -> Result<()> {
    let svc = service(pool);
    let list = svc.create_list("Chores").await?;
    let task = svc.create_task(list.id, "laundry", None).await?;

    let once = svc.toggle_task_completion(task.id).await?;
    let twice = svc.toggle_task_completion(task.id).await?;

    assert!(once.completed);
    assert!(!twice.completed);
    assert!(once.updated_at > task.updated_at);
    assert!(twice.updated_at > once.updated_at);
    assert_eq!(twice.created_at, task.created_at);
    Ok(())
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn update_task_replaces_fields(pool: PgPool) -> Result<()> {
    let svc = service(pool);
    let list = svc.create_list("Work").await?;
    let task = svc.create_task(list.id, "draft", Some("notes")).await?;

    let updated = svc.update_task(task.id, "final", None, true).await?;
    assert_eq!(updated.name, "final");
    assert_eq!(updated.description, None);
    assert!(updated.completed);

    let subtask = svc.create_subtask(task.id, "review", None).await?;
    let updated = svc
        .update_subtask(subtask.id, "review twice", Some("carefully"), false)
        .await?;
    assert_eq!(updated.name, "review twice");
    assert_eq!(updated.description.as_deref(), Some("carefully"));
    Ok(())
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn missing_parent_is_rejected(pool: PgPool) -> Result<()> {
    let svc = service(pool);
    let before = svc.get_all_tasks().await?.len();

    let err = svc
        .create_task(Uuid::new_v4(), "orphan", None)
        .await
        .unwrap_err();
    assert!(err.is_missing_parent());
    assert_eq!(svc.get_all_tasks().await?.len(), before);

    let err = svc
        .create_subtask(Uuid::new_v4(), "orphan", None)
        .await
        .unwrap_err();
    assert!(err.is_missing_parent());
    Ok(())
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn delete_list_cascades(pool: PgPool) -> Result<()> {
    let svc = service(pool);
    let list = svc.create_list("Project").await?;

    let mut task_ids = Vec::new();
    let mut subtask_ids = Vec::new();
    for n in 0..3 {
        let task = svc.create_task(list.id, &format!("task {n}"), None).await?;
        for m in 0..2 {
            subtask_ids.push(svc.create_subtask(task.id, &format!("step {m}"), None).await?.id);
        }
        task_ids.push(task.id);
    }

    svc.delete_list(list.id).await?;

    assert!(svc.get_list(list.id).await.unwrap_err().is_not_found());
    for id in task_ids {
        assert!(svc.get_task(id).await.unwrap_err().is_not_found());
    }
    for id in subtask_ids {
        assert!(svc.get_subtask(id).await.unwrap_err().is_not_found());
    }
    assert!(svc.delete_list(list.id).await.unwrap_err().is_not_found());
    Ok(())
}

#[sqlx::test(migrator = "todoctl_store::MIGRATOR")]
#[ignore = "requires database"]
async fn groceries_scenario(pool: PgPool) -> Result<()> {
    let svc = service(pool);
    let list = svc.create_list("Groceries").await?;
    let task = svc.create_task(list.id, "Buy milk", None).await?;
    let subtask = svc.create_subtask(task.id, "Check expiry", None).await?;

    assert_eq!(svc.get_tasks_by_list_id(list.id).await?, vec![task.clone()]);
    assert_eq!(svc.get_subtasks_by_task_id(task.id).await?, vec![subtask.clone()]);

    svc.delete_list(list.id).await?;

    assert!(svc.get_task(task.id).await.unwrap_err().is_not_found());
    assert!(svc.get_subtask(subtask.id).await.unwrap_err().is_not_found());

    svc.close().await;
    Ok(())
}
