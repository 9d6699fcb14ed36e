//! In-memory integration tests for boards, the review queue and worker
//! removal.

use super::helpers::{TestService, admin, assign, other_worker, service, worker};
use eyre::ensure;
use rstest::rstest;
use taskpilot::task::{
    domain::{Task, User, Viewer},
    services::{ReviewWorkRequest, SubmitWorkRequest},
};

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(Task::title).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn boards_are_scoped_to_the_viewer(
    service: TestService,
    admin: User,
    worker: User,
    other_worker: User,
) -> eyre::Result<()> {
    let first = assign(&service, &admin, &worker, "First").await?;
    assign(&service, &admin, &other_worker, "Elsewhere").await?;
    assign(&service, &admin, &worker, "Second").await?;
    service
        .submit(SubmitWorkRequest::new(first.id().clone(), worker.clone(), "done"))
        .await?;

    let mine = service.board(&Viewer::for_user(&worker)).await?;
    let everyone = service.board(&Viewer::for_user(&admin)).await?;

    ensure!(titles(&mine.to_do) == ["Second"]);
    ensure!(titles(&mine.under_review) == ["First"]);
    ensure!(titles(&everyone.to_do) == ["Elsewhere", "Second"]);
    ensure!(titles(&everyone.under_review) == ["First"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_queue_lists_submissions_across_workers(
    service: TestService,
    admin: User,
    worker: User,
    other_worker: User,
) -> eyre::Result<()> {
    let a = assign(&service, &admin, &worker, "A").await?;
    let b = assign(&service, &admin, &other_worker, "B").await?;
    assign(&service, &admin, &worker, "C").await?;
    service
        .submit(SubmitWorkRequest::new(a.id().clone(), worker, "done"))
        .await?;
    service
        .submit(SubmitWorkRequest::new(b.id().clone(), other_worker, "done"))
        .await?;
    service
        .approve(ReviewWorkRequest::new(a.id().clone(), admin))
        .await?;

    let queue = service.review_queue().await?;

    ensure!(titles(&queue) == ["B"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_worker_cascades_to_their_tasks(
    service: TestService,
    admin: User,
    worker: User,
    other_worker: User,
) -> eyre::Result<()> {
    assign(&service, &admin, &worker, "Mine 1").await?;
    assign(&service, &admin, &worker, "Mine 2").await?;
    assign(&service, &admin, &other_worker, "Theirs").await?;

    let removed = service.remove_worker_tasks(&admin, worker.id()).await?;
    let everyone = service.board(&Viewer::Admin).await?;

    ensure!(removed == 2);
    ensure!(titles(&everyone.to_do) == ["Theirs"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workers_cannot_remove_accounts(
    service: TestService,
    admin: User,
    worker: User,
) -> eyre::Result<()> {
    assign(&service, &admin, &worker, "Keep me").await?;

    let result = service.remove_worker_tasks(&worker, worker.id()).await;

    ensure!(result.is_err());
    ensure!(service.board(&Viewer::Admin).await?.len() == 1);
    Ok(())
}
