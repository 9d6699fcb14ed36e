//! Shared fixtures for task lifecycle unit tests.

use crate::task::domain::{Role, Task, TaskAssignment, TaskDomainError, User, UserId};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::Mutex;

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct StepClock {
    now: Mutex<DateTime<Utc>>,
}

impl StepClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }

    pub fn rewind(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now -= by;
        }
    }
}

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_default()
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("epoch should be a valid UTC instant"))
}

#[fixture]
pub fn clock() -> StepClock {
    StepClock::starting_at(epoch())
}

#[fixture]
pub fn admin() -> User {
    User::new(
        UserId::from_raw("admin-1"),
        "Ada Admin",
        "ada@example.com",
        Role::Admin,
    )
}

#[fixture]
pub fn worker() -> User {
    User::new(
        UserId::from_raw("worker-1"),
        "Wren Worker",
        "wren@example.com",
        Role::Worker,
    )
}

#[fixture]
pub fn other_worker() -> User {
    User::new(
        UserId::from_raw("worker-2"),
        "Otto Other",
        "otto@example.com",
        Role::Worker,
    )
}

/// Assigns a task due in three days from the clock's current time.
pub fn assign_task(
    title: &str,
    admin: &User,
    worker: &User,
    clock: &StepClock,
) -> Result<Task, TaskDomainError> {
    let assignment = TaskAssignment::new(
        title,
        "Follow the checklist in the shared folder",
        clock.utc() + Duration::days(3),
    )?;
    Task::assign(assignment, admin, worker, clock)
}

#[fixture]
pub fn pending_task(clock: StepClock, admin: User, worker: User) -> (Task, StepClock) {
    let task = assign_task("Write the quarterly report", &admin, &worker, &clock);
    (task.unwrap_or_else(|err| panic!("fixture task should assign: {err}")), clock)
}
