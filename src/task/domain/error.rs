//! Error types for task domain validation, transitions, and parsing.

use super::{Role, StaffId, TaskId};
use thiserror::Error;

/// Classification of a domain error, used by callers to render
/// role-appropriate failures without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskErrorKind {
    /// Missing or malformed input.
    Validation,
    /// The operation is not legal in the task's current status.
    InvalidState,
    /// The actor lacks the role or ownership required by the operation.
    Authorization,
}

/// Errors returned by task domain constructors and transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The rejection reason is empty after trimming.
    #[error("rejection reason must not be empty")]
    EmptyRejectionReason,

    /// The remark is empty after trimming.
    #[error("remark must not be empty")]
    EmptyRemark,

    /// The requested transition is not legal from the current status.
    #[error("task {task} is {status}, expected {expected}")]
    InvalidTransition {
        /// Task the transition was attempted on.
        task: TaskId,
        /// Current status of the task.
        status: &'static str,
        /// Status the operation requires.
        expected: &'static str,
    },

    /// A retry was requested on a task whose due date has not elapsed.
    #[error("task {0} is not overdue")]
    NotOverdue(TaskId),

    /// A retry request is already outstanding for the task.
    #[error("retry already requested for task {0}")]
    RetryAlreadyRequested(TaskId),

    /// Retry approval was attempted with no outstanding request.
    #[error("no retry request outstanding for task {0}")]
    RetryNotRequested(TaskId),

    /// The acting caller is not the task's assignee.
    #[error("actor {actor} is not the assignee of task {task}")]
    NotAssignee {
        /// Task the operation targeted.
        task: TaskId,
        /// Identity of the caller.
        actor: StaffId,
    },

    /// The acting caller's role lacks the assignment capability.
    #[error("role {0} may not assign tasks")]
    AssignmentNotPermitted(Role),

    /// The chosen parent is itself a subtask; tasks nest one level only.
    #[error("task {0} is itself a subtask and cannot have children")]
    NestedSubtask(TaskId),
}

impl TaskDomainError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::EmptyTitle
            | Self::EmptyRejectionReason
            | Self::EmptyRemark
            | Self::NestedSubtask(_) => TaskErrorKind::Validation,
            Self::InvalidTransition { .. }
            | Self::NotOverdue(_)
            | Self::RetryAlreadyRequested(_)
            | Self::RetryNotRequested(_) => TaskErrorKind::InvalidState,
            Self::NotAssignee { .. } | Self::AssignmentNotPermitted(_) => {
                TaskErrorKind::Authorization
            }
        }
    }
}

/// Error returned while parsing persisted task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing persisted roles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing persisted priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);
