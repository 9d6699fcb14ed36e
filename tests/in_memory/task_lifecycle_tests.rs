//! In-memory integration tests for task lifecycle operations.

use super::helpers::{TestService, admin, assign, other_worker, service, worker};
use eyre::ensure;
use rstest::rstest;
use taskpilot::task::{
    domain::{ReviewOutcome, TaskDomainError, TaskStatus, UrgencyTier, User},
    services::{ReviewWorkRequest, SubmitWorkRequest, TaskLifecycleError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_review_cycle_keeps_rejection_in_history(
    service: TestService,
    admin: User,
    worker: User,
) -> eyre::Result<()> {
    let task = assign(&service, &admin, &worker, "Translate the landing page").await?;
    ensure!(task.urgency(chrono::Utc::now()) == UrgencyTier::DueSoon);

    let submitted = service
        .submit(
            SubmitWorkRequest::new(task.id().clone(), worker.clone(), "done")
                .with_work_link("https://docs.example.com/landing"),
        )
        .await?;
    ensure!(submitted.status() == TaskStatus::Submitted);
    ensure!(submitted.submitted_at().is_some());

    let rejected = service
        .reject(ReviewWorkRequest::new(task.id().clone(), admin.clone()).with_notes("redo X"))
        .await?;
    ensure!(rejected.status() == TaskStatus::Rejected);
    ensure!(rejected.review_notes() == Some("redo X"));

    let resubmitted = service
        .submit(SubmitWorkRequest::new(
            task.id().clone(),
            worker.clone(),
            "fixed X",
        ))
        .await?;
    ensure!(resubmitted.status() == TaskStatus::Submitted);
    ensure!(resubmitted.explanation() == Some("fixed X"));
    ensure!(resubmitted.work_link().is_none());
    ensure!(resubmitted.review_notes().is_none());
    ensure!(resubmitted.reviewed_by().is_none());

    let approved = service
        .approve(ReviewWorkRequest::new(task.id().clone(), admin))
        .await?;
    let outcomes: Vec<ReviewOutcome> = approved
        .review_history()
        .iter()
        .map(|record| record.outcome)
        .collect();
    ensure!(approved.status() == TaskStatus::Approved);
    ensure!(outcomes == [ReviewOutcome::Rejected, ReviewOutcome::Approved]);
    ensure!(
        approved
            .review_history()
            .first()
            .and_then(|record| record.notes.as_deref())
            == Some("redo X")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_assigned_worker_may_submit(
    service: TestService,
    admin: User,
    worker: User,
    other_worker: User,
) -> eyre::Result<()> {
    let task = assign(&service, &admin, &worker, "Count inventory").await?;

    let result = service
        .submit(SubmitWorkRequest::new(
            task.id().clone(),
            other_worker,
            "done",
        ))
        .await;

    ensure!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::NotTaskOwner { .. }))
    ));
    let stored = service.find_by_id(task.id()).await?;
    ensure!(stored.map(|t| t.status()) == Some(TaskStatus::Pending));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approved_tasks_are_terminal(
    service: TestService,
    admin: User,
    worker: User,
) -> eyre::Result<()> {
    let task = assign(&service, &admin, &worker, "Draft FAQ").await?;
    service
        .submit(SubmitWorkRequest::new(task.id().clone(), worker.clone(), "done"))
        .await?;
    service
        .approve(ReviewWorkRequest::new(task.id().clone(), admin.clone()).with_notes("great"))
        .await?;

    let resubmit = service
        .submit(SubmitWorkRequest::new(task.id().clone(), worker, "more"))
        .await;
    let reject = service
        .reject(ReviewWorkRequest::new(task.id().clone(), admin).with_notes("changed my mind"))
        .await;

    ensure!(matches!(
        resubmit,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStatusTransition { .. }
        ))
    ));
    ensure!(matches!(
        reject,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStatusTransition { .. }
        ))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workers_cannot_review(
    service: TestService,
    admin: User,
    worker: User,
) -> eyre::Result<()> {
    let task = assign(&service, &admin, &worker, "Sort receipts").await?;
    service
        .submit(SubmitWorkRequest::new(task.id().clone(), worker.clone(), "done"))
        .await?;

    let result = service
        .approve(ReviewWorkRequest::new(task.id().clone(), worker))
        .await;

    ensure!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::AdminRequired(_)))
    ));
    Ok(())
}
