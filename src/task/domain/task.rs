//! Task aggregate root and the lifecycle state machine.

use super::{
    Actor, ClientId, ParseTaskStatusError, Priority, RejectionReason, Remark, StaffId,
    TaskDomainError, TaskId, TaskTitle,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
///
/// The retry flag lives inside [`TaskStatus::Pending`] so that
/// `retry_requested` can never be observed alongside any other status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Assigned and awaiting the assignee's accept or reject decision.
    Pending {
        /// Whether the assignee has an outstanding retry request on this
        /// overdue task.
        retry_requested: bool,
    },
    /// Accepted by the assignee and being worked.
    InProgress,
    /// Declined by the assignee with a recorded reason.
    Rejected,
    /// Finished by the assignee.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation. The retry flag is
    /// persisted separately.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending { .. } => "pending",
            Self::InProgress => "in_progress",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// Whether the status is pending, with or without a retry request.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Whether a retry request is outstanding.
    #[must_use]
    pub const fn retry_requested(self) -> bool {
        matches!(
            self,
            Self::Pending {
                retry_requested: true
            }
        )
    }

    /// Reconstructs a status from its persisted parts.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTaskStatusError`] for an unknown status string or a
    /// retry flag persisted against a non-pending status.
    pub fn from_parts(
        status: &str,
        retry_requested: bool,
    ) -> Result<Self, ParseTaskStatusError> {
        let normalized = status.trim().to_ascii_lowercase();
        let parsed = match normalized.as_str() {
            "pending" => Self::Pending { retry_requested },
            "in_progress" => Self::InProgress,
            "rejected" => Self::Rejected,
            "completed" => Self::Completed,
            _ => return Err(ParseTaskStatusError(status.to_owned())),
        };
        if retry_requested && !parsed.is_pending() {
            return Err(ParseTaskStatusError(format!(
                "{normalized} with retry flag set"
            )));
        }
        Ok(parsed)
    }
}

/// Whether a due date has elapsed at day granularity.
///
/// A task due today stays on time through the last instant of its due
/// date's day; it becomes overdue once `now` reaches the following day.
#[must_use]
pub fn is_overdue(due_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    due_date.date_naive() < now.date_naive()
}

/// Validated inputs for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Task title.
    pub title: TaskTitle,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional free-form tags.
    pub tags: Option<String>,
    /// Task priority.
    pub priority: Priority,
    /// Staff member responsible for executing the task.
    pub assigned_to: StaffId,
    /// Optional client reference.
    pub client: Option<ClientId>,
    /// Optional parent task for subtasks.
    pub parent: Option<TaskId>,
    /// Deadline for the task.
    pub due_date: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted tags, if any.
    pub tags: Option<String>,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted assignee.
    pub assigned_to: StaffId,
    /// Persisted assigner.
    pub assigned_by: StaffId,
    /// Persisted client reference, if any.
    pub client: Option<ClientId>,
    /// Persisted parent task, if any.
    pub parent: Option<TaskId>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted rejection reason, if any.
    pub reason: Option<RejectionReason>,
    /// Persisted remark, if any.
    pub remark: Option<Remark>,
    /// Persisted delay reason, if any.
    pub delay_reason: Option<String>,
    /// Persisted due date.
    pub due_date: DateTime<Utc>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted optimistic-concurrency version.
    pub version: u64,
}

/// Task aggregate root.
///
/// All mutation goes through transition methods that validate the acting
/// caller and the current status; every successful mutation bumps the
/// optimistic-concurrency version checked by the repository on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    tags: Option<String>,
    priority: Priority,
    assigned_to: StaffId,
    assigned_by: StaffId,
    client: Option<ClientId>,
    parent: Option<TaskId>,
    #[serde(flatten)]
    status: TaskStatus,
    reason: Option<RejectionReason>,
    remark: Option<Remark>,
    delay_reason: Option<String>,
    due_date: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Task {
    /// Creates a new pending task assigned atomically at creation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AssignmentNotPermitted`] when the
    /// assigner's role lacks the assignment capability.
    pub fn assigned(
        data: NewTaskData,
        assigner: &Actor,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        if !assigner.role().can_assign() {
            return Err(TaskDomainError::AssignmentNotPermitted(assigner.role()));
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            tags: data.tags,
            priority: data.priority,
            assigned_to: data.assigned_to,
            assigned_by: assigner.id(),
            client: data.client,
            parent: data.parent,
            status: TaskStatus::Pending {
                retry_requested: false,
            },
            reason: None,
            remark: None,
            delay_reason: None,
            due_date: data.due_date,
            completed_at: None,
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            tags: data.tags,
            priority: data.priority,
            assigned_to: data.assigned_to,
            assigned_by: data.assigned_by,
            client: data.client,
            parent: data.parent,
            status: data.status,
            reason: data.reason,
            remark: data.remark,
            delay_reason: data.delay_reason,
            due_date: data.due_date,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
            version: data.version,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the free-form tags, if any.
    #[must_use]
    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the current assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> StaffId {
        self.assigned_to
    }

    /// Returns the assigner.
    #[must_use]
    pub const fn assigned_by(&self) -> StaffId {
        self.assigned_by
    }

    /// Returns the client reference, if any.
    #[must_use]
    pub const fn client(&self) -> Option<ClientId> {
        self.client
    }

    /// Returns the parent task, if this task is a subtask.
    #[must_use]
    pub const fn parent(&self) -> Option<TaskId> {
        self.parent
    }

    /// Whether this task is a subtask of another.
    #[must_use]
    pub const fn is_subtask(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the recorded rejection reason, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<&RejectionReason> {
        self.reason.as_ref()
    }

    /// Returns the recorded remark, if any.
    #[must_use]
    pub const fn remark(&self) -> Option<&Remark> {
        self.remark.as_ref()
    }

    /// Returns the recorded delay reason, if any.
    #[must_use]
    pub fn delay_reason(&self) -> Option<&str> {
        self.delay_reason.as_deref()
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic-concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Whether the task's due date has elapsed at `now`, day-granular.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        is_overdue(self.due_date, now)
    }

    /// Accepts a pending task, moving it into progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] when the actor is not the
    /// assignee, or [`TaskDomainError::InvalidTransition`] when the task is
    /// not pending.
    pub fn accept(&mut self, actor: &Actor, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_assignee(actor)?;
        self.ensure_pending()?;
        self.status = TaskStatus::InProgress;
        self.touch(clock);
        Ok(())
    }

    /// Rejects a pending task with a justification.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] when the actor is not the
    /// assignee, or [`TaskDomainError::InvalidTransition`] when the task is
    /// not pending.
    pub fn reject(
        &mut self,
        actor: &Actor,
        reason: RejectionReason,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_assignee(actor)?;
        self.ensure_pending()?;
        self.status = TaskStatus::Rejected;
        self.reason = Some(reason);
        self.touch(clock);
        Ok(())
    }

    /// Completes an in-progress task, stamping the completion time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] when the actor is not the
    /// assignee, or [`TaskDomainError::InvalidTransition`] when the task is
    /// not in progress.
    pub fn complete(&mut self, actor: &Actor, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_assignee(actor)?;
        if self.status != TaskStatus::InProgress {
            return Err(self.invalid_transition("in_progress"));
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(clock.utc());
        self.touch(clock);
        Ok(())
    }

    /// Records a remark and delay reason without changing status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] when the actor is not the
    /// assignee.
    pub fn submit_remark(
        &mut self,
        actor: &Actor,
        remark: Remark,
        delay_reason: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_assignee(actor)?;
        self.remark = Some(remark);
        self.delay_reason = delay_reason;
        self.touch(clock);
        Ok(())
    }

    /// Flags an overdue pending task with a retry request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] when the actor is not the
    /// assignee, [`TaskDomainError::RetryAlreadyRequested`] when a request
    /// is already outstanding, [`TaskDomainError::InvalidTransition`] when
    /// the task is not pending, or [`TaskDomainError::NotOverdue`] when the
    /// due date has not elapsed.
    pub fn request_retry(
        &mut self,
        actor: &Actor,
        remark: Option<Remark>,
        delay_reason: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_assignee(actor)?;
        match self.status {
            TaskStatus::Pending {
                retry_requested: true,
            } => return Err(TaskDomainError::RetryAlreadyRequested(self.id)),
            TaskStatus::Pending {
                retry_requested: false,
            } => {}
            _ => return Err(self.invalid_transition("pending")),
        }
        if !self.is_overdue(clock.utc()) {
            return Err(TaskDomainError::NotOverdue(self.id));
        }
        self.status = TaskStatus::Pending {
            retry_requested: true,
        };
        if remark.is_some() {
            self.remark = remark;
        }
        if delay_reason.is_some() {
            self.delay_reason = delay_reason;
        }
        self.touch(clock);
        Ok(())
    }

    /// Approves an outstanding retry request, re-opening the task with a
    /// fresh due date and an optional new assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AssignmentNotPermitted`] when the
    /// approver's role lacks the assignment capability, or
    /// [`TaskDomainError::RetryNotRequested`] when no request is
    /// outstanding.
    pub fn accept_retry(
        &mut self,
        approver: &Actor,
        new_assignee: Option<StaffId>,
        new_due_date: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !approver.role().can_assign() {
            return Err(TaskDomainError::AssignmentNotPermitted(approver.role()));
        }
        if !self.status.retry_requested() {
            return Err(TaskDomainError::RetryNotRequested(self.id));
        }
        self.status = TaskStatus::Pending {
            retry_requested: false,
        };
        self.due_date = new_due_date;
        if let Some(assignee) = new_assignee {
            self.assigned_to = assignee;
        }
        self.touch(clock);
        Ok(())
    }

    /// Reassigns the task to a new staff member, resetting it to pending
    /// and clearing any rejection reason, retry request, and completion
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AssignmentNotPermitted`] when the actor's
    /// role lacks the assignment capability.
    pub fn reassign(
        &mut self,
        actor: &Actor,
        new_assignee: StaffId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !actor.role().can_assign() {
            return Err(TaskDomainError::AssignmentNotPermitted(actor.role()));
        }
        self.assigned_to = new_assignee;
        self.status = TaskStatus::Pending {
            retry_requested: false,
        };
        self.reason = None;
        self.completed_at = None;
        self.touch(clock);
        Ok(())
    }

    fn ensure_assignee(&self, actor: &Actor) -> Result<(), TaskDomainError> {
        if actor.id() != self.assigned_to {
            return Err(TaskDomainError::NotAssignee {
                task: self.id,
                actor: actor.id(),
            });
        }
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), TaskDomainError> {
        if self.status.is_pending() {
            return Ok(());
        }
        Err(self.invalid_transition("pending"))
    }

    const fn invalid_transition(&self, expected: &'static str) -> TaskDomainError {
        TaskDomainError::InvalidTransition {
            task: self.id,
            status: self.status.as_str(),
            expected,
        }
    }

    /// Updates the mutation timestamp and bumps the version.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
        self.version += 1;
    }
}
