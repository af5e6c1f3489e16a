//! End-to-end workflow tests through the public service API.

use foreman::task::{
    domain::{TaskDomainError, TaskErrorKind, TaskId, TaskStatus},
    ports::{TaskEventKind, TaskQuery, TaskRepository, TaskRepositoryError},
    services::TaskServiceError,
};
use rstest::rstest;

use super::helpers::{self, Services, services};

fn kind_of(err: &TaskServiceError) -> Option<TaskErrorKind> {
    match err {
        TaskServiceError::Domain(domain) => Some(domain.kind()),
        TaskServiceError::Repository(_) => None,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn happy_path_runs_assign_accept_complete(services: Services) {
    let manager = helpers::manager();
    let assignee = helpers::staff();

    let task = services
        .assignment
        .assign(
            helpers::assignment_request(&assignee, "Prepare onboarding pack"),
            &manager,
        )
        .await
        .expect("assign");
    services
        .lifecycle
        .accept(task.id(), &assignee)
        .await
        .expect("accept");
    let done = services
        .lifecycle
        .complete(task.id(), &assignee)
        .await
        .expect("complete");

    assert_eq!(done.status(), TaskStatus::Completed);
    assert_eq!(done.completed_at(), Some(helpers::now()));
    helpers::assert_event_sequence(
        &services.notifier,
        &[
            TaskEventKind::Created,
            TaskEventKind::Accepted,
            TaskEventKind::Completed,
        ],
    )
    .expect("event sequence");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejection_records_the_reason(services: Services) {
    let manager = helpers::manager();
    let assignee = helpers::staff();
    let task = services
        .assignment
        .assign(
            helpers::assignment_request(&assignee, "Inventory check"),
            &manager,
        )
        .await
        .expect("assign");

    let rejected = services
        .lifecycle
        .reject(task.id(), &assignee, "Out of my remit")
        .await
        .expect("reject");

    assert_eq!(rejected.status(), TaskStatus::Rejected);
    assert_eq!(
        rejected.reason().map(|reason| reason.as_str()),
        Some("Out of my remit")
    );
    helpers::assert_event_sequence(
        &services.notifier,
        &[
            TaskEventKind::Created,
            TaskEventKind::Rejected {
                reason: "Out of my remit".to_owned(),
            },
        ],
    )
    .expect("event sequence");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retry_request_and_approval_reopen_an_overdue_task(services: Services) {
    let manager = helpers::manager();
    let original = helpers::staff();
    let replacement = helpers::staff();
    let overdue = foreman::task::services::AssignTaskRequest::new(
        "Chase supplier quote",
        original.id(),
        helpers::days_from_now(-2),
    );
    let task = services
        .assignment
        .assign(overdue, &manager)
        .await
        .expect("assign");

    services
        .retry
        .request_retry(
            task.id(),
            &original,
            Some("Supplier never replied".to_owned()),
            Some("Client Delay".to_owned()),
        )
        .await
        .expect("request retry");
    let reopened = services
        .retry
        .accept_retry(
            task.id(),
            &manager,
            Some(replacement.id()),
            helpers::days_from_now(5),
        )
        .await
        .expect("accept retry");

    assert_eq!(
        reopened.status(),
        TaskStatus::Pending {
            retry_requested: false
        }
    );
    assert_eq!(reopened.assigned_to(), replacement.id());
    assert_eq!(reopened.due_date(), helpers::days_from_now(5));
    helpers::assert_event_sequence(
        &services.notifier,
        &[
            TaskEventKind::Created,
            TaskEventKind::RetryRequested,
            TaskEventKind::RetryAccepted {
                assignee: replacement.id(),
            },
        ],
    )
    .expect("event sequence");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retry_can_be_requested_again_once_overdue_again(services: Services) {
    let manager = helpers::manager();
    let assignee = helpers::staff();
    let task = services
        .assignment
        .assign(
            foreman::task::services::AssignTaskRequest::new(
                "Quarterly compliance filing",
                assignee.id(),
                helpers::days_from_now(-1),
            ),
            &manager,
        )
        .await
        .expect("assign");

    services
        .retry
        .request_retry(task.id(), &assignee, None, None)
        .await
        .expect("first request");
    // Approval sets a due date that is already past, so the task is
    // immediately overdue again.
    services
        .retry
        .accept_retry(task.id(), &manager, None, helpers::days_from_now(-1))
        .await
        .expect("approve");

    let again = services
        .retry
        .request_retry(task.id(), &assignee, None, None)
        .await
        .expect("second request after approval");
    assert!(again.status().retry_requested());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_assignee_cannot_drive_the_lifecycle(services: Services) {
    let manager = helpers::manager();
    let assignee = helpers::staff();
    let interloper = helpers::staff();
    let task = services
        .assignment
        .assign(
            helpers::assignment_request(&assignee, "Draft press release"),
            &manager,
        )
        .await
        .expect("assign");

    let err = services
        .lifecycle
        .accept(task.id(), &interloper)
        .await
        .expect_err("only the assignee may accept");

    assert_eq!(kind_of(&err), Some(TaskErrorKind::Authorization));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accept_on_an_in_progress_task_is_an_invalid_state(services: Services) {
    let manager = helpers::manager();
    let assignee = helpers::staff();
    let task = services
        .assignment
        .assign(
            helpers::assignment_request(&assignee, "Draft press release"),
            &manager,
        )
        .await
        .expect("assign");
    services
        .lifecycle
        .accept(task.id(), &assignee)
        .await
        .expect("first accept");

    let err = services
        .lifecycle
        .accept(task.id(), &assignee)
        .await
        .expect_err("second accept must fail");

    assert_eq!(kind_of(&err), Some(TaskErrorKind::InvalidState));
    assert!(matches!(
        err,
        TaskServiceError::Domain(TaskDomainError::InvalidTransition { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_subtask_creation_leaves_no_partial_record(services: Services) {
    let manager = helpers::manager();
    let assignee = helpers::staff();
    let missing = TaskId::new();

    let err = services
        .assignment
        .create_subtask(
            missing,
            helpers::assignment_request(&assignee, "Orphan subtask"),
            &manager,
        )
        .await
        .expect_err("unknown parent");

    assert!(matches!(
        err,
        TaskServiceError::Repository(TaskRepositoryError::NotFound(_))
    ));
    let remaining = services
        .repository
        .list(&TaskQuery::default())
        .await
        .expect("list");
    assert!(remaining.is_empty());
    assert!(services.notifier.events().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_of_a_completed_task_reopens_it(services: Services) {
    let manager = helpers::manager();
    let assignee = helpers::staff();
    let replacement = helpers::staff();
    let task = services
        .assignment
        .assign(
            helpers::assignment_request(&assignee, "Archive old records"),
            &manager,
        )
        .await
        .expect("assign");
    services
        .lifecycle
        .accept(task.id(), &assignee)
        .await
        .expect("accept");
    services
        .lifecycle
        .complete(task.id(), &assignee)
        .await
        .expect("complete");

    let reopened = services
        .assignment
        .reassign(task.id(), replacement.id(), &manager)
        .await
        .expect("reassign");

    assert_eq!(
        reopened.status(),
        TaskStatus::Pending {
            retry_requested: false
        }
    );
    assert_eq!(reopened.assigned_to(), replacement.id());
    assert_eq!(reopened.completed_at(), None);

    // A reopened task must not linger in completion-window queries.
    let window = services
        .repository
        .list(&TaskQuery {
            completed_after: Some(helpers::days_from_now(-7)),
            ..TaskQuery::default()
        })
        .await
        .expect("list");
    assert!(window.is_empty());
}
