//! Listing behaviour as seen through the full service stack.

use foreman::task::{
    ports::{StatusFilter, TaskQuery},
    services::{AssignTaskRequest, PageRequest},
};
use rstest::rstest;

use super::helpers::{self, Services, services};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_work_shows_up_under_the_completed_filter(services: Services) {
    let manager = helpers::manager();
    let assignee = helpers::staff();
    let done = services
        .assignment
        .assign(
            helpers::assignment_request(&assignee, "Settle accounts"),
            &manager,
        )
        .await
        .expect("assign");
    services
        .assignment
        .assign(
            helpers::assignment_request(&assignee, "Plan offsite"),
            &manager,
        )
        .await
        .expect("assign");
    services
        .lifecycle
        .accept(done.id(), &assignee)
        .await
        .expect("accept");
    services
        .lifecycle
        .complete(done.id(), &assignee)
        .await
        .expect("complete");

    let filter = TaskQuery {
        status: Some(StatusFilter::Completed),
        completed_after: Some(helpers::days_from_now(-1)),
        ..TaskQuery::default()
    };
    let page = services
        .queries
        .list(&manager, filter, PageRequest::default())
        .await
        .expect("list");

    assert_eq!(page.total_tasks, 1);
    assert_eq!(page.tasks.first().map(foreman::task::domain::Task::id), Some(done.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn staff_only_ever_see_their_own_workload(services: Services) {
    let manager = helpers::manager();
    let me = helpers::staff();
    let colleague = helpers::staff();
    for n in 0..3 {
        services
            .assignment
            .assign(
                AssignTaskRequest::new(
                    format!("My task {n}"),
                    me.id(),
                    helpers::days_from_now(2),
                ),
                &manager,
            )
            .await
            .expect("assign");
    }
    services
        .assignment
        .assign(
            helpers::assignment_request(&colleague, "Colleague task"),
            &manager,
        )
        .await
        .expect("assign");

    let mine = services
        .queries
        .list(&me, TaskQuery::default(), PageRequest::default())
        .await
        .expect("list");
    let everything = services
        .queries
        .list(&manager, TaskQuery::default(), PageRequest::default())
        .await
        .expect("list");

    assert_eq!(mine.total_tasks, 3);
    assert!(mine.tasks.iter().all(|task| task.assigned_to() == me.id()));
    assert_eq!(everything.total_tasks, 4);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pages_beyond_the_first_continue_the_listing(services: Services) {
    let manager = helpers::manager();
    let assignee = helpers::staff();
    for n in 0..6 {
        services
            .assignment
            .assign(
                AssignTaskRequest::new(
                    format!("Batch item {n}"),
                    assignee.id(),
                    helpers::days_from_now(2),
                ),
                &manager,
            )
            .await
            .expect("assign");
    }

    let first = services
        .queries
        .list(&manager, TaskQuery::default(), PageRequest::new(1))
        .await
        .expect("list");
    let second = services
        .queries
        .list(&manager, TaskQuery::default(), PageRequest::new(2))
        .await
        .expect("list");

    assert_eq!(first.tasks.len(), 5);
    assert_eq!(second.tasks.len(), 1);
    assert_eq!(first.total_pages, 2);
    assert_eq!(
        second.tasks.first().map(|task| task.title().as_str()),
        Some("Batch item 5")
    );
}
