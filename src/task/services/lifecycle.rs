//! Service layer for assignee-driven lifecycle transitions.

use super::{TaskServiceResult, load_task};
use crate::task::{
    domain::{Actor, RejectionReason, Remark, Task, TaskId},
    ports::{TaskEvent, TaskEventKind, TaskNotifier, TaskRepository},
};
use mockable::Clock;
use std::sync::Arc;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, N, C>
where
    R: TaskRepository,
    N: TaskNotifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, N, C> TaskLifecycleService<R, N, C>
where
    R: TaskRepository,
    N: TaskNotifier,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    /// Accepts a pending task on behalf of its assignee.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError`] when the task is unknown, the
    /// actor is not the assignee, the task is not pending, or the write
    /// loses a concurrent update race.
    pub async fn accept(&self, task_id: TaskId, actor: &Actor) -> TaskServiceResult<Task> {
        let mut task = load_task(self.repository.as_ref(), task_id).await?;
        let expected_version = task.version();
        task.accept(actor, &*self.clock)?;
        self.repository.update(&task, expected_version).await?;
        self.publish(&task, actor, TaskEventKind::Accepted).await;
        Ok(task)
    }

    /// Rejects a pending task with a justification.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError`] when the reason is empty, the
    /// task is unknown or not pending, the actor is not the assignee, or
    /// the write loses a concurrent update race.
    pub async fn reject(
        &self,
        task_id: TaskId,
        actor: &Actor,
        reason: impl Into<String>,
    ) -> TaskServiceResult<Task> {
        let rejection = RejectionReason::new(reason)?;
        let mut task = load_task(self.repository.as_ref(), task_id).await?;
        let expected_version = task.version();
        task.reject(actor, rejection.clone(), &*self.clock)?;
        self.repository.update(&task, expected_version).await?;
        self.publish(
            &task,
            actor,
            TaskEventKind::Rejected {
                reason: rejection.as_str().to_owned(),
            },
        )
        .await;
        Ok(task)
    }

    /// Completes an in-progress task.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError`] when the task is unknown or not
    /// in progress, the actor is not the assignee, or the write loses a
    /// concurrent update race.
    pub async fn complete(&self, task_id: TaskId, actor: &Actor) -> TaskServiceResult<Task> {
        let mut task = load_task(self.repository.as_ref(), task_id).await?;
        let expected_version = task.version();
        task.complete(actor, &*self.clock)?;
        self.repository.update(&task, expected_version).await?;
        self.publish(&task, actor, TaskEventKind::Completed).await;
        Ok(task)
    }

    /// Records a remark and delay reason without changing status.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError`] when the remark is empty, the
    /// task is unknown, the actor is not the assignee, or the write loses
    /// a concurrent update race.
    pub async fn submit_remark(
        &self,
        task_id: TaskId,
        actor: &Actor,
        remark: impl Into<String>,
        delay_reason: Option<String>,
    ) -> TaskServiceResult<Task> {
        let note = Remark::new(remark)?;
        let mut task = load_task(self.repository.as_ref(), task_id).await?;
        let expected_version = task.version();
        task.submit_remark(actor, note, delay_reason, &*self.clock)?;
        self.repository.update(&task, expected_version).await?;
        Ok(task)
    }

    /// Fetches the remark recorded on a task, if any.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError`] when the task is unknown.
    pub async fn remark(&self, task_id: TaskId) -> TaskServiceResult<Option<Remark>> {
        let task = load_task(self.repository.as_ref(), task_id).await?;
        Ok(task.remark().cloned())
    }

    async fn publish(&self, task: &Task, actor: &Actor, kind: TaskEventKind) {
        self.notifier
            .publish(&TaskEvent {
                task: task.id(),
                actor: *actor,
                occurred_at: task.updated_at(),
                kind,
            })
            .await;
    }
}
