//! Diesel schema for task workflow persistence.

diesel::table! {
    /// Task records with assignment and lifecycle state.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Optional free-form tags.
        tags -> Nullable<Text>,
        /// Task priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Whether a retry request is outstanding (pending tasks only).
        retry_requested -> Bool,
        /// Rejection justification, if rejected.
        reason -> Nullable<Text>,
        /// Latest remark, if any.
        remark -> Nullable<Text>,
        /// Latest delay reason, if any.
        delay_reason -> Nullable<Text>,
        /// Staff member responsible for the task.
        assigned_to -> Uuid,
        /// Staff member who assigned the task.
        assigned_by -> Uuid,
        /// Optional client reference.
        client_id -> Nullable<Uuid>,
        /// Optional parent task for subtasks.
        parent_id -> Nullable<Uuid>,
        /// Deadline.
        due_date -> Timestamptz,
        /// Completion timestamp, if completed.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest mutation timestamp.
        updated_at -> Timestamptz,
        /// Optimistic-concurrency version.
        version -> Int8,
    }
}
