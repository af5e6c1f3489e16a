//! Shared fixtures and builders for task workflow tests.

use crate::task::domain::{Actor, NewTaskData, Role, StaffId, Task, TaskTitle};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to a single instant for deterministic transitions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Reference instant used across tests: midday, away from day boundaries.
pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

pub(crate) fn days_from_now(days: i64) -> DateTime<Utc> {
    now() + Duration::days(days)
}

pub(crate) fn manager() -> Actor {
    Actor::new(StaffId::new(), Role::Manager)
}

pub(crate) fn staff() -> Actor {
    Actor::new(StaffId::new(), Role::Staff)
}

/// Builds a pending task assigned to `assignee` by `assigner`.
pub(crate) fn pending_task(
    assignee: &Actor,
    assigner: &Actor,
    due_date: DateTime<Utc>,
) -> Task {
    let data = NewTaskData {
        title: TaskTitle::new("Prepare quarterly report").expect("valid title"),
        description: Some("Compile client figures".to_owned()),
        tags: Some("reporting".to_owned()),
        priority: crate::task::domain::Priority::High,
        assigned_to: assignee.id(),
        client: None,
        parent: None,
        due_date,
    };
    Task::assigned(data, assigner, &FixedClock(now())).expect("manager may assign")
}
