//! Application services orchestrating the task workflow.
//!
//! Each mutating service loads one task, applies a domain transition,
//! persists it with a compare-and-swap update, and hands the resulting
//! event to the notifier port.

mod assignment;
mod lifecycle;
mod query;
mod retry;

use crate::task::{
    domain::{Task, TaskDomainError, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use thiserror::Error;

pub use assignment::{AssignTaskRequest, AssignmentService};
pub use lifecycle::TaskLifecycleService;
pub use query::{DEFAULT_PAGE_SIZE, PageRequest, TaskPage, TaskQueryService};
pub use retry::RetryService;

/// Service-level errors for task workflow operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation or transition failure.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failure.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task workflow service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Fetches a task, converting absence into a not-found error.
async fn load_task<R>(repository: &R, id: TaskId) -> TaskServiceResult<Task>
where
    R: TaskRepository,
{
    repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| TaskServiceError::Repository(TaskRepositoryError::NotFound(id)))
}
