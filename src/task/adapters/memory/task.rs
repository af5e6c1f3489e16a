//! Thread-safe in-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// In-memory task repository used by tests and embedded deployments.
///
/// Listing preserves insertion order, giving the stable storage order the
/// query model requires. The version check in `update` runs under the
/// write lock, so concurrent transitions on one task cannot both apply.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn matches(task: &Task, query: &TaskQuery) -> bool {
    if let Some(search) = &query.title_contains {
        let title = task.title().as_str().to_lowercase();
        if !title.contains(&search.to_lowercase()) {
            return false;
        }
    }
    if let Some(status) = query.status {
        if !status.matches(task.status()) {
            return false;
        }
    }
    if let Some(assignee) = query.assigned_to {
        if task.assigned_to() != assignee {
            return false;
        }
    }
    if let Some(assigner) = query.assigned_by {
        if task.assigned_by() != assigner {
            return false;
        }
    }
    if let Some(client) = query.client {
        if task.client() != Some(client) {
            return false;
        }
    }
    if let Some(threshold) = query.created_after {
        if task.created_at() < threshold {
            return false;
        }
    }
    if let Some(threshold) = query.completed_after {
        match task.completed_at() {
            Some(completed) if completed >= threshold => {}
            _ => return false,
        }
    }
    true
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, expected_version: u64) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let current = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if current.version() != expected_version {
            return Err(TaskRepositoryError::VersionConflict(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_children(&self, parent: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.tasks.get(id))
            .filter(|task| task.parent() == Some(parent))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.order.retain(|kept| *kept != id);
        Ok(())
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.tasks.get(id))
            .filter(|task| matches(task, query))
            .cloned()
            .collect())
    }
}
