//! Repository port for task persistence, lookup, and filtered listing.

use crate::task::domain::{ClientId, StaffId, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Status constraint for task listings. Absence of a filter (the UI's
/// "All" tab) is expressed by omitting it from the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Pending tasks, with or without an outstanding retry request.
    Pending,
    /// Accepted, in-progress tasks.
    InProgress,
    /// Rejected tasks.
    Rejected,
    /// Completed tasks.
    Completed,
}

impl StatusFilter {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// Whether a task status satisfies this filter.
    #[must_use]
    pub const fn matches(self, status: TaskStatus) -> bool {
        matches!(
            (self, status),
            (Self::Pending, TaskStatus::Pending { .. })
                | (Self::InProgress, TaskStatus::InProgress)
                | (Self::Rejected, TaskStatus::Rejected)
                | (Self::Completed, TaskStatus::Completed)
        )
    }
}

/// Filter criteria for task listings. Every field is optional; an empty
/// query matches all tasks in stable storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
    /// Exact status constraint.
    pub status: Option<StatusFilter>,
    /// Constrain to tasks assigned to this staff member.
    pub assigned_to: Option<StaffId>,
    /// Constrain to tasks created by this assigner.
    pub assigned_by: Option<StaffId>,
    /// Constrain to tasks for this client.
    pub client: Option<ClientId>,
    /// Lower bound on the creation timestamp.
    pub created_after: Option<DateTime<Utc>>,
    /// Lower bound on the completion timestamp; excludes uncompleted tasks.
    pub completed_after: Option<DateTime<Utc>>,
}

/// Task persistence contract.
///
/// Lifecycle operations are single-record transactions: services read the
/// current task, apply a transition, and write back through [`update`],
/// which is a compare-and-swap on the task's version so that concurrent
/// transitions on the same record can never both apply.
///
/// [`update`]: TaskRepository::update
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists a mutated task if the stored version still equals
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, or [`TaskRepositoryError::VersionConflict`] when another
    /// transition won the race.
    async fn update(&self, task: &Task, expected_version: u64) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the direct subtasks of the given parent, in storage order.
    async fn find_children(&self, parent: TaskId) -> TaskRepositoryResult<Vec<Task>>;

    /// Removes a task record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Returns all tasks matching the query, in stable storage order.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored version no longer matches; the caller read stale state.
    #[error("concurrent update on task {0}")]
    VersionConflict(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
