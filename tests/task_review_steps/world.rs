//! Shared world state for task review cycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskpilot::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, User},
    services::{TaskLifecycleError, TaskLifecycleService},
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for review cycle behaviour tests.
pub struct ReviewCycleWorld {
    pub service: TestTaskService,
    pub admin: Option<User>,
    pub worker: Option<User>,
    pub other_worker: Option<User>,
    pub task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl ReviewCycleWorld {
    /// Creates a world with no users or tasks.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            admin: None,
            worker: None,
            other_worker: None,
            task: None,
            last_result: None,
        }
    }

    /// Returns the scenario admin.
    pub fn admin(&self) -> Result<&User, eyre::Report> {
        self.admin
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing admin in scenario world"))
    }

    /// Returns the assigned worker.
    pub fn worker(&self) -> Result<&User, eyre::Report> {
        self.worker
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing worker in scenario world"))
    }

    /// Returns the scenario task as last seen.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Records a transition result, keeping the updated task on success.
    pub fn record(&mut self, result: Result<Task, TaskLifecycleError>) {
        if let Ok(ref updated) = result {
            self.task = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for ReviewCycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReviewCycleWorld {
    ReviewCycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
