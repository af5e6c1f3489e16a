//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for task records, used for reads, inserts, and full-row
/// updates. `None` values null their columns on update so cleared fields
/// (e.g. a rejection reason wiped by reassignment) do not linger.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional free-form tags.
    pub tags: Option<String>,
    /// Priority in canonical storage form.
    pub priority: String,
    /// Lifecycle status in canonical storage form.
    pub status: String,
    /// Whether a retry request is outstanding.
    pub retry_requested: bool,
    /// Rejection justification, if rejected.
    pub reason: Option<String>,
    /// Latest remark, if any.
    pub remark: Option<String>,
    /// Latest delay reason, if any.
    pub delay_reason: Option<String>,
    /// Assignee identifier.
    pub assigned_to: uuid::Uuid,
    /// Assigner identifier.
    pub assigned_by: uuid::Uuid,
    /// Optional client identifier.
    pub client_id: Option<uuid::Uuid>,
    /// Optional parent task identifier.
    pub parent_id: Option<uuid::Uuid>,
    /// Deadline.
    pub due_date: DateTime<Utc>,
    /// Completion timestamp, if completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency version.
    pub version: i64,
}
