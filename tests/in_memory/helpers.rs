//! Shared fixtures and helpers for in-memory workflow tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use foreman::task::{
    adapters::memory::{InMemoryTaskRepository, RecordingNotifier},
    domain::{Actor, Role, StaffId},
    ports::TaskEventKind,
    services::{
        AssignTaskRequest, AssignmentService, RetryService, TaskLifecycleService,
        TaskQueryService,
    },
};
use mockable::Clock;
use rstest::fixture;

/// Clock pinned to a single instant so overdue checks are deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Reference instant for all workflow tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 9, 30, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn days_from_now(days: i64) -> DateTime<Utc> {
    now() + Duration::days(days)
}

pub fn manager() -> Actor {
    Actor::new(StaffId::new(), Role::Manager)
}

pub fn staff() -> Actor {
    Actor::new(StaffId::new(), Role::Staff)
}

/// Fully wired service stack over one shared in-memory repository.
pub struct Services {
    pub repository: Arc<InMemoryTaskRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub assignment: AssignmentService<InMemoryTaskRepository, RecordingNotifier, FixedClock>,
    pub lifecycle: TaskLifecycleService<InMemoryTaskRepository, RecordingNotifier, FixedClock>,
    pub retry: RetryService<InMemoryTaskRepository, RecordingNotifier, FixedClock>,
    pub queries: TaskQueryService<InMemoryTaskRepository>,
}

#[fixture]
pub fn services() -> Services {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(FixedClock(now()));
    Services {
        assignment: AssignmentService::new(
            Arc::clone(&repository),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        ),
        lifecycle: TaskLifecycleService::new(
            Arc::clone(&repository),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        ),
        retry: RetryService::new(
            Arc::clone(&repository),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        ),
        queries: TaskQueryService::new(Arc::clone(&repository)),
        repository,
        notifier,
    }
}

/// Builds an assignment request due a few days out.
pub fn assignment_request(assignee: &Actor, title: &str) -> AssignTaskRequest {
    AssignTaskRequest::new(title, assignee.id(), days_from_now(3))
}

/// Asserts the notifier saw exactly the expected event sequence.
///
/// # Errors
///
/// Returns an error if the published events differ from `expected`.
pub fn assert_event_sequence(
    notifier: &RecordingNotifier,
    expected: &[TaskEventKind],
) -> Result<(), eyre::Report> {
    let kinds: Vec<TaskEventKind> = notifier
        .events()
        .into_iter()
        .map(|event| event.kind)
        .collect();
    eyre::ensure!(
        kinds == expected,
        "event sequence mismatch: got {kinds:?}, expected {expected:?}"
    );
    Ok(())
}
