//! Shared test helpers for in-memory lifecycle integration tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use taskpilot::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Role, Task, User, UserId},
    services::{AssignTaskRequest, TaskLifecycleResult, TaskLifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the integration tests.
pub type TestService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Provides a service over a fresh in-memory repository.
#[fixture]
pub fn service() -> TestService {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(DefaultClock),
    )
}

/// Provides the reviewing admin.
#[fixture]
pub fn admin() -> User {
    User::new(
        UserId::from_raw("admin-1"),
        "Ada Admin",
        "ada@example.com",
        Role::Admin,
    )
}

/// Provides the primary worker.
#[fixture]
pub fn worker() -> User {
    User::new(
        UserId::from_raw("worker-1"),
        "Wren Worker",
        "wren@example.com",
        Role::Worker,
    )
}

/// Provides a second worker.
#[fixture]
pub fn other_worker() -> User {
    User::new(
        UserId::from_raw("worker-2"),
        "Otto Other",
        "otto@example.com",
        Role::Worker,
    )
}

/// Assigns a task due in one hour.
///
/// # Errors
///
/// Returns the service error when assignment fails.
pub async fn assign(
    service: &TestService,
    admin: &User,
    worker: &User,
    title: &str,
) -> TaskLifecycleResult<Task> {
    service
        .assign(AssignTaskRequest::new(
            admin.clone(),
            worker.clone(),
            title,
            "Follow the attached brief",
            Utc::now() + Duration::hours(1),
        ))
        .await
}
