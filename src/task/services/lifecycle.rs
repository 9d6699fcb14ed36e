//! Service layer for assigning, submitting and reviewing tasks.

use crate::task::{
    domain::{
        ReviewDecision, Submission, Task, TaskAssignment, TaskBoard, TaskDomainError, TaskId,
        TaskStatus, User, UserId, Viewer, partition,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for assigning a task to a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignTaskRequest {
    admin: User,
    worker: User,
    title: String,
    description: Option<String>,
    instructions: String,
    deadline: DateTime<Utc>,
}

impl AssignTaskRequest {
    /// Creates a request with the required assignment fields.
    #[must_use]
    pub fn new(
        admin: User,
        worker: User,
        title: impl Into<String>,
        instructions: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            admin,
            worker,
            title: title.into(),
            description: None,
            instructions: instructions.into(),
            deadline,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for submitting completed work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitWorkRequest {
    task_id: TaskId,
    worker: User,
    explanation: String,
    work_link: Option<String>,
}

impl SubmitWorkRequest {
    /// Creates a submission request.
    #[must_use]
    pub fn new(task_id: TaskId, worker: User, explanation: impl Into<String>) -> Self {
        Self {
            task_id,
            worker,
            explanation: explanation.into(),
            work_link: None,
        }
    }

    /// Sets the link to the completed work.
    #[must_use]
    pub fn with_work_link(mut self, work_link: impl Into<String>) -> Self {
        self.work_link = Some(work_link.into());
        self
    }
}

/// Request payload for reviewing submitted work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWorkRequest {
    task_id: TaskId,
    reviewer: User,
    notes: Option<String>,
}

impl ReviewWorkRequest {
    /// Creates a review request without notes.
    #[must_use]
    pub const fn new(task_id: TaskId, reviewer: User) -> Self {
        Self {
            task_id,
            reviewer,
            notes: None,
        }
    }

    /// Sets the review notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a lifecycle guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Assigns a new pending task to a worker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when validation or role checks
    /// fail, or [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn assign(&self, request: AssignTaskRequest) -> TaskLifecycleResult<Task> {
        let mut assignment =
            TaskAssignment::new(request.title, request.instructions, request.deadline)?;
        if let Some(description) = request.description {
            assignment = assignment.with_description(description);
        }

        let task = Task::assign(assignment, &request.admin, &request.worker, &*self.clock)?;
        self.repository.store(&task).await?;
        info!(
            task_id = %task.id(),
            worker_id = %task.worker().id,
            deadline = %task.deadline(),
            "task assigned"
        );
        Ok(task)
    }

    /// Submits completed work for a pending or rejected task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] when the submission is invalid or the
    /// lifecycle forbids it, or [`TaskRepositoryError::StatusChanged`]
    /// (wrapped) when a concurrent transition won. Nothing is persisted on
    /// error.
    pub async fn submit(&self, request: SubmitWorkRequest) -> TaskLifecycleResult<Task> {
        let submission = Submission::new(request.explanation, request.work_link.as_deref())?;
        let mut task = self.load(&request.task_id).await?;
        let loaded = task.status();
        task.submit(&request.worker, submission, &*self.clock)?;
        self.repository.update(&task, loaded).await?;
        info!(task_id = %task.id(), "work submitted");
        Ok(task)
    }

    /// Approves submitted work. Notes are optional.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] when the reviewer is not an admin or
    /// the task is not awaiting review. A review that loses a race with
    /// another transition fails with [`TaskRepositoryError::StatusChanged`]
    /// (wrapped).
    pub async fn approve(&self, request: ReviewWorkRequest) -> TaskLifecycleResult<Task> {
        let decision = ReviewDecision::approve(request.notes.as_deref());
        self.review(&request.task_id, &request.reviewer, decision)
            .await
    }

    /// Rejects submitted work. Notes are mandatory.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingRejectionNotes`] (wrapped) for blank
    /// notes, plus every error of [`TaskLifecycleService::approve`].
    pub async fn reject(&self, request: ReviewWorkRequest) -> TaskLifecycleResult<Task> {
        let decision = ReviewDecision::reject(request.notes.as_deref().unwrap_or_default())?;
        self.review(&request.task_id, &request.reviewer, decision)
            .await
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, task_id: &TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Builds the board a viewer sees.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when listing fails.
    pub async fn board(&self, viewer: &Viewer) -> TaskLifecycleResult<TaskBoard> {
        let tasks = match viewer {
            Viewer::Worker(worker_id) => self.repository.list_for_worker(worker_id).await?,
            Viewer::Admin => self.repository.list_all().await?,
        };
        Ok(partition(tasks, viewer))
    }

    /// Returns every task awaiting review, across all workers.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when listing fails.
    pub async fn review_queue(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self
            .repository
            .list_by_status(TaskStatus::Submitted)
            .await?)
    }

    /// Removes every task of a worker whose account is being deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AdminRequired`] (wrapped) when `admin` is
    /// not an admin, or [`TaskLifecycleError::Repository`] when removal
    /// fails.
    pub async fn remove_worker_tasks(
        &self,
        admin: &User,
        worker_id: &UserId,
    ) -> TaskLifecycleResult<usize> {
        if !admin.is_admin() {
            return Err(TaskDomainError::AdminRequired(admin.id().clone()).into());
        }
        let removed = self.repository.remove_for_worker(worker_id).await?;
        info!(%worker_id, removed, "worker tasks removed");
        Ok(removed)
    }

    async fn review(
        &self,
        task_id: &TaskId,
        reviewer: &User,
        decision: ReviewDecision,
    ) -> TaskLifecycleResult<Task> {
        let outcome = decision.outcome();
        let mut task = self.load(task_id).await?;
        let loaded = task.status();
        task.review(reviewer, decision, &*self.clock)?;
        self.repository.update(&task, loaded).await?;
        info!(task_id = %task.id(), ?outcome, "work reviewed");
        Ok(task)
    }

    async fn load(&self, task_id: &TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| TaskLifecycleError::TaskNotFound(task_id.clone()))
    }
}
