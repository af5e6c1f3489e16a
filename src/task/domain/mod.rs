//! Domain model for the task assignment workflow.
//!
//! The domain owns the lifecycle state machine, caller capability checks,
//! and field validation while keeping all infrastructure concerns outside
//! the boundary.

mod actor;
mod error;
mod fields;
mod ids;
mod task;

pub use actor::{Actor, Role};
pub use error::{
    ParsePriorityError, ParseRoleError, ParseTaskStatusError, TaskDomainError, TaskErrorKind,
};
pub use fields::{Priority, RejectionReason, Remark, TaskTitle};
pub use ids::{ClientId, StaffId, TaskId};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskStatus, is_overdue};
