//! `PostgreSQL` repository implementation for task workflow storage.

use super::{models::TaskRow, schema::tasks};
use crate::task::{
    domain::{
        ClientId, PersistedTaskData, Priority, RejectionReason, Remark, StaffId, Task, TaskId,
        TaskStatus, TaskTitle,
    },
    ports::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task, expected_version: u64) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let expected =
            i64::try_from(expected_version).map_err(TaskRepositoryError::persistence)?;
        let row = to_row(task)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::version.eq(expected)),
            )
            .set(&row)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if affected == 0 {
                let exists: i64 = tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .count()
                    .get_result(connection)
                    .map_err(TaskRepositoryError::persistence)?;
                if exists > 0 {
                    return Err(TaskRepositoryError::VersionConflict(task_id));
                }
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_children(&self, parent: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::parent_id.eq(parent.into_inner()))
                .select(TaskRow::as_select())
                .order(tasks::created_at.asc())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let criteria = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = tasks::table
                .select(TaskRow::as_select())
                .order(tasks::created_at.asc())
                .into_boxed();

            if let Some(search) = criteria.title_contains {
                let pattern = format!("%{}%", escape_like(&search));
                statement = statement.filter(tasks::title.ilike(pattern));
            }
            if let Some(status) = criteria.status {
                statement = statement.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(assignee) = criteria.assigned_to {
                statement = statement.filter(tasks::assigned_to.eq(assignee.into_inner()));
            }
            if let Some(assigner) = criteria.assigned_by {
                statement = statement.filter(tasks::assigned_by.eq(assigner.into_inner()));
            }
            if let Some(client) = criteria.client {
                statement = statement.filter(tasks::client_id.eq(client.into_inner()));
            }
            if let Some(threshold) = criteria.created_after {
                statement = statement.filter(tasks::created_at.ge(threshold));
            }
            if let Some(threshold) = criteria.completed_after {
                statement = statement.filter(tasks::completed_at.ge(threshold));
            }

            let rows = statement
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

/// Escapes `LIKE` metacharacters so search text matches literally.
fn escape_like(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len());
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn to_row(task: &Task) -> TaskRepositoryResult<TaskRow> {
    let version = i64::try_from(task.version()).map_err(TaskRepositoryError::persistence)?;

    Ok(TaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        tags: task.tags().map(str::to_owned),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        retry_requested: task.status().retry_requested(),
        reason: task.reason().map(|reason| reason.as_str().to_owned()),
        remark: task.remark().map(|remark| remark.as_str().to_owned()),
        delay_reason: task.delay_reason().map(str::to_owned),
        assigned_to: task.assigned_to().into_inner(),
        assigned_by: task.assigned_by().into_inner(),
        client_id: task.client().map(ClientId::into_inner),
        parent_id: task.parent().map(TaskId::into_inner),
        due_date: task.due_date(),
        completed_at: task.completed_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        version,
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let status = TaskStatus::from_parts(&row.status, row.retry_requested)
        .map_err(TaskRepositoryError::persistence)?;
    let priority =
        Priority::try_from(row.priority.as_str()).map_err(TaskRepositoryError::persistence)?;
    let title = TaskTitle::new(row.title).map_err(TaskRepositoryError::persistence)?;
    let reason = row
        .reason
        .map(RejectionReason::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let remark = row
        .remark
        .map(Remark::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let version = u64::try_from(row.version).map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title,
        description: row.description,
        tags: row.tags,
        priority,
        assigned_to: StaffId::from_uuid(row.assigned_to),
        assigned_by: StaffId::from_uuid(row.assigned_by),
        client: row.client_id.map(ClientId::from_uuid),
        parent: row.parent_id.map(TaskId::from_uuid),
        status,
        reason,
        remark,
        delay_reason: row.delay_reason,
        due_date: row.due_date,
        completed_at: row.completed_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
        version,
    }))
}
