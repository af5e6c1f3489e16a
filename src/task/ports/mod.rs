//! Port contracts for the task workflow engine.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod notifier;
pub mod repository;

pub use notifier::{NullNotifier, TaskEvent, TaskEventKind, TaskNotifier};
pub use repository::{
    StatusFilter, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
};
