//! In-memory backend
//!
//! Mirrors the PostgreSQL backend's observable behavior: cascading deletes,
//! missing-parent rejection, list positions, and newest-first item order.
//! All repositories share one lock, so every operation (reorder included)
//! is atomic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use todoctl_core::{ItemDraft, ItemUpdate, List, ListTitle, SubTask, Task};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Entity, StoreError, StoreResult};
use crate::repository::{Backend, ListRepository, SubTaskRepository, TaskRepository};

#[derive(Default)]
struct State {
    lists: HashMap<Uuid, List>,
    tasks: HashMap<Uuid, Task>,
    subtasks: HashMap<Uuid, SubTask>,
    last_tick: Option<DateTime<Utc>>,
}

impl State {
    /// Wall-clock time, bumped so successive calls are strictly increasing.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }
}

type Shared = Arc<Mutex<State>>;

fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

/// Backend holding everything in process memory, for exercising the layer
/// without a live database.
#[derive(Clone)]
pub struct MemoryStore {
    lists: MemoryLists,
    tasks: MemoryTasks,
    subtasks: MemorySubTasks,
}

impl MemoryStore {
    pub fn new() -> Self {
        let state: Shared = Arc::default();
        Self {
            lists: MemoryLists(state.clone()),
            tasks: MemoryTasks(state.clone()),
            subtasks: MemorySubTasks(state),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryStore {
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
        debug!("memory store closed");
    }
}

#[derive(Clone)]
pub struct MemoryLists(Shared);

#[async_trait]
impl ListRepository for MemoryLists {
    async fn create(&self, title: ListTitle) -> StoreResult<List> {
        let mut state = self.0.lock().await;
        let position = state.lists.values().map(|l| l.position).max().unwrap_or(0) + 1;
        let now = state.tick();
        let list = List {
            id: Uuid::new_v4(),
            title: title.into_string(),
            position,
            created_at: now,
            updated_at: now,
        };
        state.lists.insert(list.id, list.clone());
        debug!(list_id = %list.id, position = list.position, "created list");
        Ok(list)
    }

    async fn get(&self, id: Uuid) -> StoreResult<List> {
        let state = self.0.lock().await;
        state
            .lists
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::List, id))
    }

    async fn get_all(&self) -> StoreResult<Vec<List>> {
        let state = self.0.lock().await;
        let mut lists: Vec<List> = state.lists.values().cloned().collect();
        lists.sort_by_key(|l| (l.position, l.created_at));
        Ok(lists)
    }

    async fn update(&self, id: Uuid, title: ListTitle) -> StoreResult<List> {
        let mut state = self.0.lock().await;
        let now = state.tick();
        let list = state
            .lists
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Entity::List, id))?;
        list.title = title.into_string();
        list.updated_at = now;
        debug!(list_id = %id, "updated list");
        Ok(list.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.0.lock().await;
        if state.lists.remove(&id).is_none() {
            return Err(StoreError::not_found(Entity::List, id));
        }

        let task_ids: Vec<Uuid> = state
            .tasks
            .values()
            .filter(|t| t.list_id == id)
            .map(|t| t.id)
            .collect();
        state.tasks.retain(|_, t| t.list_id != id);
        state.subtasks.retain(|_, s| !task_ids.contains(&s.task_id));
        debug!(list_id = %id, tasks = task_ids.len(), "deleted list");
        Ok(())
    }

    async fn reorder(&self, ordered_ids: &[Uuid]) -> StoreResult<()> {
        if ordered_ids.is_empty() {
            return Ok(());
        }

        let mut state = self.0.lock().await;
        let mut unmatched = 0usize;
        for (position, id) in (1i32..).zip(ordered_ids) {
            let now = state.tick();
            match state.lists.get_mut(id) {
                Some(list) => {
                    list.position = position;
                    list.updated_at = now;
                }
                None => unmatched += 1,
            }
        }

        debug!(requested = ordered_ids.len(), unmatched, "reordered lists");
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemoryTasks(Shared);

#[async_trait]
impl TaskRepository for MemoryTasks {
    async fn create(&self, list_id: Uuid, draft: ItemDraft) -> StoreResult<Task> {
        let mut state = self.0.lock().await;
        if !state.lists.contains_key(&list_id) {
            return Err(StoreError::MissingParent {
                entity: Entity::Task,
                parent: Entity::List,
                parent_id: list_id,
            });
        }

        let now = state.tick();
        let task = Task {
            id: Uuid::new_v4(),
            list_id,
            name: draft.name.into_string(),
            description: draft.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(task.id, task.clone());
        debug!(task_id = %task.id, list_id = %list_id, "created task");
        Ok(task)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Task> {
        let state = self.0.lock().await;
        state
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Task, id))
    }

    async fn get_by_list(&self, list_id: Uuid) -> StoreResult<Vec<Task>> {
        let state = self.0.lock().await;
        let tasks = state
            .tasks
            .values()
            .filter(|t| t.list_id == list_id)
            .cloned()
            .collect();
        Ok(newest_first(tasks, |t| t.created_at))
    }

    async fn get_all(&self) -> StoreResult<Vec<Task>> {
        let state = self.0.lock().await;
        let tasks = state.tasks.values().cloned().collect();
        Ok(newest_first(tasks, |t| t.created_at))
    }

    async fn update(&self, id: Uuid, update: ItemUpdate) -> StoreResult<Task> {
        let mut state = self.0.lock().await;
        let now = state.tick();
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Entity::Task, id))?;
        task.name = update.name.into_string();
        task.description = update.description;
        task.completed = update.completed;
        task.updated_at = now;
        debug!(task_id = %id, "updated task");
        Ok(task.clone())
    }

    async fn toggle_completion(&self, id: Uuid) -> StoreResult<Task> {
        let mut state = self.0.lock().await;
        let now = state.tick();
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Entity::Task, id))?;
        task.completed = !task.completed;
        task.updated_at = now;
        debug!(task_id = %id, completed = task.completed, "toggled task");
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.0.lock().await;
        if state.tasks.remove(&id).is_none() {
            return Err(StoreError::not_found(Entity::Task, id));
        }
        state.subtasks.retain(|_, s| s.task_id != id);
        debug!(task_id = %id, "deleted task");
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemorySubTasks(Shared);

#[async_trait]
impl SubTaskRepository for MemorySubTasks {
    async fn create(&self, task_id: Uuid, draft: ItemDraft) -> StoreResult<SubTask> {
        let mut state = self.0.lock().await;
        if !state.tasks.contains_key(&task_id) {
            return Err(StoreError::MissingParent {
                entity: Entity::SubTask,
                parent: Entity::Task,
                parent_id: task_id,
            });
        }

        let now = state.tick();
        let subtask = SubTask {
            id: Uuid::new_v4(),
            task_id,
            name: draft.name.into_string(),
            description: draft.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        state.subtasks.insert(subtask.id, subtask.clone());
        debug!(subtask_id = %subtask.id, task_id = %task_id, "created subtask");
        Ok(subtask)
    }

    async fn get(&self, id: Uuid) -> StoreResult<SubTask> {
        let state = self.0.lock().await;
        state
            .subtasks
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::SubTask, id))
    }

    async fn get_by_task(&self, task_id: Uuid) -> StoreResult<Vec<SubTask>> {
        let state = self.0.lock().await;
        let subtasks = state
            .subtasks
            .values()
            .filter(|s| s.task_id == task_id)
            .cloned()
            .collect();
        Ok(newest_first(subtasks, |s| s.created_at))
    }

    async fn get_all(&self) -> StoreResult<Vec<SubTask>> {
        let state = self.0.lock().await;
        let subtasks = state.subtasks.values().cloned().collect();
        Ok(newest_first(subtasks, |s| s.created_at))
    }

    async fn update(&self, id: Uuid, update: ItemUpdate) -> StoreResult<SubTask> {
        let mut state = self.0.lock().await;
        let now = state.tick();
        let subtask = state
            .subtasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Entity::SubTask, id))?;
        subtask.name = update.name.into_string();
        subtask.description = update.description;
        subtask.completed = update.completed;
        subtask.updated_at = now;
        debug!(subtask_id = %id, "updated subtask");
        Ok(subtask.clone())
    }

    async fn toggle_completion(&self, id: Uuid) -> StoreResult<SubTask> {
        let mut state = self.0.lock().await;
        let now = state.tick();
        let subtask = state
            .subtasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Entity::SubTask, id))?;
        subtask.completed = !subtask.completed;
        subtask.updated_at = now;
        debug!(subtask_id = %id, completed = subtask.completed, "toggled subtask");
        Ok(subtask.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.0.lock().await;
        if state.subtasks.remove(&id).is_none() {
            return Err(StoreError::not_found(Entity::SubTask, id));
        }
        debug!(subtask_id = %id, "deleted subtask");
        Ok(())
    }
}
