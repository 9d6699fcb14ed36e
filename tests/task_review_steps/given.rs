//! Given steps for task review cycle BDD scenarios.

use super::world::{ReviewCycleWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskpilot::task::{
    domain::{Role, User, UserId},
    services::AssignTaskRequest,
};

fn account(name: &str, role: Role) -> User {
    let slug = name.to_ascii_lowercase();
    User::new(
        UserId::from_raw(format!("{}-{slug}", role.as_str())),
        name,
        format!("{slug}@example.com"),
        role,
    )
}

#[given(r#"an admin "{admin}" and a worker "{worker}""#)]
fn admin_and_worker(world: &mut ReviewCycleWorld, admin: String, worker: String) {
    world.admin = Some(account(&admin, Role::Admin));
    world.worker = Some(account(&worker, Role::Worker));
}

#[given(r#"another worker "{name}""#)]
fn another_worker(world: &mut ReviewCycleWorld, name: String) {
    world.other_worker = Some(account(&name, Role::Worker));
}

#[given(r#"a task "{title}" due in {hours:u32} hours"#)]
fn task_due_in(
    world: &mut ReviewCycleWorld,
    title: String,
    hours: u32,
) -> Result<(), eyre::Report> {
    let request = AssignTaskRequest::new(
        world.admin()?.clone(),
        world.worker()?.clone(),
        title,
        "Follow the attached brief",
        Utc::now() + Duration::hours(i64::from(hours)),
    );
    let task = run_async(world.service.assign(request)).wrap_err("assign scenario task")?;
    world.task = Some(task);
    Ok(())
}
