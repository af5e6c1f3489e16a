//! Service layer for task creation, reassignment, and deletion.

use super::{TaskServiceError, TaskServiceResult, load_task};
use crate::task::{
    domain::{
        Actor, ClientId, NewTaskData, Priority, StaffId, Task, TaskDomainError, TaskId, TaskTitle,
    },
    ports::{TaskEvent, TaskEventKind, TaskNotifier, TaskRepository},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for assigning a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignTaskRequest {
    title: String,
    assignee: StaffId,
    due_date: DateTime<Utc>,
    description: Option<String>,
    tags: Option<String>,
    priority: Priority,
    client: Option<ClientId>,
}

impl AssignTaskRequest {
    /// Creates a request with the mandatory assignment fields.
    #[must_use]
    pub fn new(title: impl Into<String>, assignee: StaffId, due_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            assignee,
            due_date,
            description: None,
            tags: None,
            priority: Priority::default(),
            client: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets free-form tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Sets the task priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the client reference.
    #[must_use]
    pub const fn with_client(mut self, client: ClientId) -> Self {
        self.client = Some(client);
        self
    }

    fn into_task_data(self, parent: Option<TaskId>) -> Result<NewTaskData, TaskDomainError> {
        Ok(NewTaskData {
            title: TaskTitle::new(self.title)?,
            description: self.description,
            tags: self.tags,
            priority: self.priority,
            assigned_to: self.assignee,
            client: self.client,
            parent,
            due_date: self.due_date,
        })
    }
}

/// Task assignment orchestration service.
#[derive(Clone)]
pub struct AssignmentService<R, N, C>
where
    R: TaskRepository,
    N: TaskNotifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, N, C> AssignmentService<R, N, C>
where
    R: TaskRepository,
    N: TaskNotifier,
    C: Clock + Send + Sync,
{
    /// Creates a new assignment service.
    #[must_use]
    pub const fn new(repository: Arc<R>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    /// Creates a new pending task assigned to a staff member.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when validation fails, the assigner's
    /// role lacks the assignment capability, or persistence rejects the
    /// record.
    pub async fn assign(
        &self,
        request: AssignTaskRequest,
        assigner: &Actor,
    ) -> TaskServiceResult<Task> {
        self.create(request, None, assigner).await
    }

    /// Creates a subtask under an existing parent.
    ///
    /// Subtasks nest exactly one level: the parent must exist and must not
    /// itself be a subtask.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the parent is unknown, the parent
    /// is itself a subtask, or creation fails as for [`Self::assign`].
    pub async fn create_subtask(
        &self,
        parent_id: TaskId,
        request: AssignTaskRequest,
        assigner: &Actor,
    ) -> TaskServiceResult<Task> {
        let parent = load_task(self.repository.as_ref(), parent_id).await?;
        if parent.is_subtask() {
            return Err(TaskServiceError::Domain(TaskDomainError::NestedSubtask(
                parent_id,
            )));
        }
        self.create(request, Some(parent_id), assigner).await
    }

    /// Moves a task to a new assignee, resetting it to pending.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task is unknown, the actor
    /// lacks the assignment capability, or the write loses a concurrent
    /// update race.
    pub async fn reassign(
        &self,
        task_id: TaskId,
        new_assignee: StaffId,
        actor: &Actor,
    ) -> TaskServiceResult<Task> {
        let mut task = load_task(self.repository.as_ref(), task_id).await?;
        let expected_version = task.version();
        let previous_assignee = task.assigned_to();
        task.reassign(actor, new_assignee, &*self.clock)?;
        self.repository.update(&task, expected_version).await?;
        self.notifier
            .publish(&TaskEvent {
                task: task.id(),
                actor: *actor,
                occurred_at: task.updated_at(),
                kind: TaskEventKind::Reassigned {
                    previous_assignee,
                    new_assignee,
                },
            })
            .await;
        Ok(task)
    }

    /// Removes a task and all of its subtasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task is unknown or the actor
    /// lacks the assignment capability.
    pub async fn delete(&self, task_id: TaskId, actor: &Actor) -> TaskServiceResult<()> {
        if !actor.role().can_assign() {
            return Err(TaskServiceError::Domain(
                TaskDomainError::AssignmentNotPermitted(actor.role()),
            ));
        }
        // Existence check up front so an unknown id fails before any child
        // is touched.
        let task = load_task(self.repository.as_ref(), task_id).await?;
        let children = self.repository.find_children(task.id()).await?;
        for child in children {
            self.repository.delete(child.id()).await?;
        }
        self.repository.delete(task.id()).await?;
        Ok(())
    }

    async fn create(
        &self,
        request: AssignTaskRequest,
        parent: Option<TaskId>,
        assigner: &Actor,
    ) -> TaskServiceResult<Task> {
        let data = request.into_task_data(parent)?;
        let task = Task::assigned(data, assigner, &*self.clock)?;
        self.repository.store(&task).await?;
        self.notifier
            .publish(&TaskEvent {
                task: task.id(),
                actor: *assigner,
                occurred_at: task.created_at(),
                kind: TaskEventKind::Created,
            })
            .await;
        Ok(task)
    }
}
