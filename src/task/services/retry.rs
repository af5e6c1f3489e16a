//! Retry workflow for overdue pending tasks.
//!
//! This is the only path by which a missed-deadline task re-enters active
//! work without administrative deletion and recreation. The single retry
//! flag inside the pending status guarantees at most one outstanding
//! request per task.

use super::{TaskServiceResult, load_task};
use crate::task::{
    domain::{Actor, Remark, StaffId, Task, TaskId},
    ports::{TaskEvent, TaskEventKind, TaskNotifier, TaskRepository},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Retry escalation orchestration service.
#[derive(Clone)]
pub struct RetryService<R, N, C>
where
    R: TaskRepository,
    N: TaskNotifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, N, C> RetryService<R, N, C>
where
    R: TaskRepository,
    N: TaskNotifier,
    C: Clock + Send + Sync,
{
    /// Creates a new retry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    /// Requests a retry on an overdue pending task, optionally recording a
    /// remark and delay reason alongside the request.
    ///
    /// A second request while one is outstanding fails rather than
    /// creating a duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError`] when the task is unknown, the
    /// actor is not the assignee, the task is not an overdue pending task,
    /// a request is already outstanding, or the write loses a concurrent
    /// update race.
    pub async fn request_retry(
        &self,
        task_id: TaskId,
        actor: &Actor,
        remark: Option<String>,
        delay_reason: Option<String>,
    ) -> TaskServiceResult<Task> {
        let note = remark.map(Remark::new).transpose()?;
        let mut task = load_task(self.repository.as_ref(), task_id).await?;
        let expected_version = task.version();
        task.request_retry(actor, note, delay_reason, &*self.clock)?;
        self.repository.update(&task, expected_version).await?;
        self.notifier
            .publish(&TaskEvent {
                task: task.id(),
                actor: *actor,
                occurred_at: task.updated_at(),
                kind: TaskEventKind::RetryRequested,
            })
            .await;
        Ok(task)
    }

    /// Approves an outstanding retry request, re-opening the task with the
    /// supplied due date and, when given, a new assignee.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError`] when the task is unknown, the
    /// approver lacks the assignment capability, no request is
    /// outstanding, or the write loses a concurrent update race.
    pub async fn accept_retry(
        &self,
        task_id: TaskId,
        approver: &Actor,
        new_assignee: Option<StaffId>,
        new_due_date: DateTime<Utc>,
    ) -> TaskServiceResult<Task> {
        let mut task = load_task(self.repository.as_ref(), task_id).await?;
        let expected_version = task.version();
        task.accept_retry(approver, new_assignee, new_due_date, &*self.clock)?;
        self.repository.update(&task, expected_version).await?;
        self.notifier
            .publish(&TaskEvent {
                task: task.id(),
                actor: *approver,
                occurred_at: task.updated_at(),
                kind: TaskEventKind::RetryAccepted {
                    assignee: task.assigned_to(),
                },
            })
            .await;
        Ok(task)
    }
}
