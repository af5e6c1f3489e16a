//! Outbound event port consumed by the external notification subsystem.

use crate::task::domain::{Actor, StaffId, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to a task, with the delta fields relevant to the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskEventKind {
    /// A task was created and assigned.
    Created,
    /// A task moved to a new assignee.
    Reassigned {
        /// Assignee before the change.
        previous_assignee: StaffId,
        /// Assignee after the change.
        new_assignee: StaffId,
    },
    /// The assignee accepted the task.
    Accepted,
    /// The assignee rejected the task.
    Rejected {
        /// Recorded justification.
        reason: String,
    },
    /// The assignee completed the task.
    Completed,
    /// The assignee requested a retry on an overdue task.
    RetryRequested,
    /// An assigner approved a retry request.
    RetryAccepted {
        /// Assignee responsible after approval.
        assignee: StaffId,
    },
}

/// A lifecycle event handed outward after a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEvent {
    /// Task the event concerns.
    pub task: TaskId,
    /// Caller who performed the operation.
    pub actor: Actor,
    /// When the operation was applied.
    pub occurred_at: DateTime<Utc>,
    /// Event payload.
    pub kind: TaskEventKind,
}

/// Lifecycle event sink.
///
/// Delivery is fire-and-forget: the engine never fails an operation
/// because a downstream consumer could not be notified.
#[async_trait]
pub trait TaskNotifier: Send + Sync {
    /// Publishes a lifecycle event.
    async fn publish(&self, event: &TaskEvent);
}

/// Notifier that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl TaskNotifier for NullNotifier {
    async fn publish(&self, _event: &TaskEvent) {}
}
