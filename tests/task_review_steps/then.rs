//! Then steps for task review cycle BDD scenarios.

use super::world::{ReviewCycleWorld, run_async};
use chrono::Utc;
use rstest_bdd_macros::then;
use taskpilot::task::{
    domain::{TaskDomainError, TaskStatus, Viewer},
    services::TaskLifecycleError,
};

fn stored_task(
    world: &ReviewCycleWorld,
) -> Result<taskpilot::task::domain::Task, eyre::Report> {
    let task_id = world.task()?.id().clone();
    run_async(world.service.find_by_id(&task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} is no longer stored"))
}

#[then("the review queue contains the task")]
fn review_queue_contains_task(world: &ReviewCycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    let queue = run_async(world.service.review_queue())?;
    eyre::ensure!(
        queue.iter().any(|task| task.id() == &task_id),
        "task {task_id} missing from review queue"
    );
    Ok(())
}

#[then(r#"the task is "{tier}""#)]
fn task_urgency_is(world: &ReviewCycleWorld, tier: String) -> Result<(), eyre::Report> {
    let actual = world.task()?.urgency(Utc::now());
    eyre::ensure!(
        actual.as_str() == tier,
        "expected urgency {tier}, found {}",
        actual.as_str()
    );
    Ok(())
}

#[then(r#"the worker to-do list shows the task with notes "{notes}""#)]
fn worker_to_do_shows_notes(world: &ReviewCycleWorld, notes: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    let board = run_async(world.service.board(&Viewer::for_user(world.worker()?)))?;
    let task = board
        .to_do
        .iter()
        .find(|task| task.id() == &task_id)
        .ok_or_else(|| eyre::eyre!("task {task_id} missing from worker to-do list"))?;
    eyre::ensure!(
        task.review_notes() == Some(notes.as_str()),
        "expected notes {notes:?}, found {:?}",
        task.review_notes()
    );
    Ok(())
}

#[then("the worker completed list contains the task")]
fn worker_completed_contains_task(world: &ReviewCycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    let board = run_async(world.service.board(&Viewer::for_user(world.worker()?)))?;
    eyre::ensure!(
        board.completed.iter().any(|task| task.id() == &task_id),
        "task {task_id} missing from completed list"
    );
    Ok(())
}

#[then("the task has no current feedback")]
fn task_has_no_current_feedback(world: &ReviewCycleWorld) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(task.review_notes().is_none(), "stale review notes remain");
    eyre::ensure!(task.reviewed_at().is_none(), "stale review timestamp remains");
    eyre::ensure!(
        task.review_history().len() == 1,
        "the rejection should stay in the review history"
    );
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &ReviewCycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = stored_task(world)?;
    eyre::ensure!(
        task.status() == expected,
        "expected status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then("the action fails because review notes are required")]
fn fails_for_missing_notes(world: &ReviewCycleWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action result"))?;
    eyre::ensure!(
        matches!(
            result,
            Err(TaskLifecycleError::Domain(
                TaskDomainError::MissingRejectionNotes
            ))
        ),
        "expected MissingRejectionNotes, got {result:?}"
    );
    Ok(())
}

#[then("the action fails because the worker does not own the task")]
fn fails_for_wrong_owner(world: &ReviewCycleWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action result"))?;
    eyre::ensure!(
        matches!(
            result,
            Err(TaskLifecycleError::Domain(TaskDomainError::NotTaskOwner { .. }))
        ),
        "expected NotTaskOwner, got {result:?}"
    );
    Ok(())
}
