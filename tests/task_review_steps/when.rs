//! When steps for task review cycle BDD scenarios.

use super::world::{ReviewCycleWorld, run_async};
use rstest_bdd_macros::when;
use taskpilot::task::services::{ReviewWorkRequest, SubmitWorkRequest};

#[when(r#"the worker submits "{explanation}""#)]
fn worker_submits(world: &mut ReviewCycleWorld, explanation: String) -> Result<(), eyre::Report> {
    let request =
        SubmitWorkRequest::new(world.task()?.id().clone(), world.worker()?.clone(), explanation);
    let result = run_async(world.service.submit(request));
    world.record(result);
    Ok(())
}

#[when(r#"the other worker submits "{explanation}""#)]
fn other_worker_submits(
    world: &mut ReviewCycleWorld,
    explanation: String,
) -> Result<(), eyre::Report> {
    let other = world
        .other_worker
        .clone()
        .ok_or_else(|| eyre::eyre!("missing other worker in scenario world"))?;
    let request = SubmitWorkRequest::new(world.task()?.id().clone(), other, explanation);
    let result = run_async(world.service.submit(request));
    world.record(result);
    Ok(())
}

#[when(r#"the admin rejects the task with notes "{notes}""#)]
fn admin_rejects(world: &mut ReviewCycleWorld, notes: String) -> Result<(), eyre::Report> {
    let request =
        ReviewWorkRequest::new(world.task()?.id().clone(), world.admin()?.clone()).with_notes(notes);
    let result = run_async(world.service.reject(request));
    world.record(result);
    Ok(())
}

#[when("the admin rejects the task without notes")]
fn admin_rejects_without_notes(world: &mut ReviewCycleWorld) -> Result<(), eyre::Report> {
    let request = ReviewWorkRequest::new(world.task()?.id().clone(), world.admin()?.clone());
    let result = run_async(world.service.reject(request));
    world.record(result);
    Ok(())
}

#[when("the admin approves the task")]
fn admin_approves(world: &mut ReviewCycleWorld) -> Result<(), eyre::Report> {
    let request = ReviewWorkRequest::new(world.task()?.id().clone(), world.admin()?.clone());
    let result = run_async(world.service.approve(request));
    world.record(result);
    Ok(())
}
