//! Role-parameterized dashboard view model.
//!
//! A [`Dashboard`] holds the last board fetched from the server for one
//! viewer. Transitions are sent to the server and followed by a fresh fetch;
//! the local board never changes on its own. When a call fails the previous
//! board is kept and the control becomes available again.

use super::{ActionGate, ApiError, ApiResult, HttpTransport, NewAccount, TaskPilotClient};
use crate::task::domain::{
    ReviewDecision, ReviewOutcome, Role, Submission, Task, TaskAssignment, TaskBoard,
    TaskDomainError, TaskId, TaskStatus, UrgencyTier, User, UserId, Viewer, partition,
};
use mockable::Clock;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// View model backing both the worker and the admin dashboards.
#[derive(Debug)]
pub struct Dashboard<T: HttpTransport, C: Clock> {
    client: Arc<TaskPilotClient<T>>,
    viewer: Viewer,
    clock: Arc<C>,
    board: Mutex<TaskBoard>,
    refresh_gate: ActionGate,
    submit_gate: ActionGate,
    review_gate: ActionGate,
    assign_gate: ActionGate,
    account_gate: ActionGate,
}

impl<T: HttpTransport, C: Clock> Dashboard<T, C> {
    /// Creates an empty dashboard for `viewer`. Call [`Self::refresh`] to
    /// load tasks.
    #[must_use]
    pub fn new(client: Arc<TaskPilotClient<T>>, viewer: Viewer, clock: Arc<C>) -> Self {
        Self {
            client,
            viewer,
            clock,
            board: Mutex::new(TaskBoard::default()),
            refresh_gate: ActionGate::new(),
            submit_gate: ActionGate::new(),
            review_gate: ActionGate::new(),
            assign_gate: ActionGate::new(),
            account_gate: ActionGate::new(),
        }
    }

    /// Creates the dashboard matching `user`'s role.
    #[must_use]
    pub fn for_user(client: Arc<TaskPilotClient<T>>, user: &User, clock: Arc<C>) -> Self {
        Self::new(client, Viewer::for_user(user), clock)
    }

    /// Returns the viewer this dashboard partitions for.
    #[must_use]
    pub const fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Returns a snapshot of the last fetched board.
    #[must_use]
    pub fn board(&self) -> TaskBoard {
        self.board
            .lock()
            .map(|board| board.clone())
            .unwrap_or_default()
    }

    /// Classifies a task's deadline against the current time.
    #[must_use]
    pub fn urgency_of(&self, task: &Task) -> UrgencyTier {
        task.urgency(self.clock.utc())
    }

    /// Returns whether a refresh is in flight.
    #[must_use]
    pub fn refresh_in_flight(&self) -> bool {
        self.refresh_gate.is_busy()
    }

    /// Fetches the caller's tasks and rebuilds the board.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Busy`] while a refresh is in flight, or any error
    /// raised by the fetch; the previous board is kept.
    pub async fn refresh(&self) -> ApiResult<TaskBoard> {
        let _guard = self.refresh_gate.try_acquire("refresh")?;
        self.reload().await
    }

    /// Fetches the submitted tasks awaiting review. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for worker dashboards, or any error
    /// raised by the fetch.
    pub async fn review_queue(&self) -> ApiResult<Vec<Task>> {
        self.require_admin()?;
        let tasks = self.client.list_submitted().await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.status() == TaskStatus::Submitted)
            .collect())
    }

    /// Submits completed work for one of the viewer's tasks. Worker only.
    ///
    /// Input is validated before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] for a blank explanation, a
    /// malformed link or a task the board shows as not awaiting work, and
    /// [`ApiError::Busy`] while another submission is in flight.
    pub async fn submit_work(
        &self,
        task_id: &TaskId,
        explanation: &str,
        work_link: Option<&str>,
    ) -> ApiResult<TaskBoard> {
        let Viewer::Worker(worker_id) = &self.viewer else {
            return Err(ApiError::Forbidden("only workers can submit work".to_owned()));
        };
        let submission = Submission::new(explanation, work_link)?;
        if let Some(task) = self.known_task(task_id) {
            if !task.is_assigned_to(worker_id) {
                return Err(TaskDomainError::NotTaskOwner {
                    task_id: task_id.clone(),
                    user_id: worker_id.clone(),
                }
                .into());
            }
            ensure_transition(&task, TaskStatus::Submitted)?;
        }

        let _guard = self.submit_gate.try_acquire("submit")?;
        self.client.complete_task(task_id, &submission).await?;
        self.reload().await
    }

    /// Approves submitted work. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Busy`] while another review is in flight, or any
    /// error raised by the call.
    pub async fn approve(&self, task_id: &TaskId, notes: Option<&str>) -> ApiResult<TaskBoard> {
        self.review(task_id, &ReviewDecision::approve(notes)).await
    }

    /// Rejects submitted work with feedback. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for worker dashboards and
    /// [`ApiError::InvalidInput`] when `notes` is blank; no request is sent.
    pub async fn reject(&self, task_id: &TaskId, notes: &str) -> ApiResult<TaskBoard> {
        self.require_admin()?;
        let decision = ReviewDecision::reject(notes)?;
        self.review(task_id, &decision).await
    }

    /// Assigns a new task to a worker. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] when the deadline has already
    /// passed, or any error raised by the call.
    pub async fn assign(
        &self,
        worker_id: &UserId,
        assignment: &TaskAssignment,
    ) -> ApiResult<TaskBoard> {
        self.require_admin()?;
        if assignment.deadline() < self.clock.utc() {
            return Err(TaskDomainError::DeadlineInPast(assignment.deadline()).into());
        }
        let _guard = self.assign_gate.try_acquire("assign")?;
        self.client.assign_task(worker_id, assignment).await?;
        self.reload().await
    }

    /// Lists worker accounts. Admin only.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the call.
    pub async fn workers(&self) -> ApiResult<Vec<User>> {
        self.require_admin()?;
        let users = self.client.list_users().await?;
        Ok(users
            .into_iter()
            .filter(|user| user.role() == Role::Worker)
            .collect())
    }

    /// Creates an account. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Busy`] while another account change is in flight,
    /// or any error raised by the call.
    pub async fn create_account(&self, account: &NewAccount) -> ApiResult<()> {
        self.require_admin()?;
        let _guard = self.account_gate.try_acquire("account change")?;
        self.client.register_user(account).await
    }

    /// Deletes a worker account together with its tasks. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Busy`] while another account change is in flight,
    /// or any error raised by the call.
    pub async fn remove_worker(&self, worker_id: &UserId) -> ApiResult<TaskBoard> {
        self.require_admin()?;
        let _guard = self.account_gate.try_acquire("account change")?;
        self.client.delete_user(worker_id).await?;
        self.reload().await
    }

    async fn review(&self, task_id: &TaskId, decision: &ReviewDecision) -> ApiResult<TaskBoard> {
        self.require_admin()?;
        let target = match decision.outcome() {
            ReviewOutcome::Approved => TaskStatus::Approved,
            ReviewOutcome::Rejected => TaskStatus::Rejected,
        };
        if let Some(task) = self.known_task(task_id) {
            ensure_transition(&task, target)?;
        }

        let _guard = self.review_gate.try_acquire("review")?;
        self.client.review_task(task_id, decision).await?;
        self.reload().await
    }

    async fn reload(&self) -> ApiResult<TaskBoard> {
        let tasks = self.client.list_tasks(&self.viewer).await?;
        let board = partition(tasks, &self.viewer);
        debug!(
            to_do = board.to_do.len(),
            under_review = board.under_review.len(),
            completed = board.completed.len(),
            "board refreshed"
        );
        match self.board.lock() {
            Ok(mut current) => current.clone_from(&board),
            Err(_) => warn!("board snapshot lock poisoned; snapshot not updated"),
        }
        Ok(board)
    }

    fn known_task(&self, task_id: &TaskId) -> Option<Task> {
        self.board
            .lock()
            .ok()
            .and_then(|board| board.find(task_id).cloned())
    }

    fn require_admin(&self) -> ApiResult<()> {
        match self.viewer {
            Viewer::Admin => Ok(()),
            Viewer::Worker(_) => Err(ApiError::Forbidden("admin role required".to_owned())),
        }
    }
}

fn ensure_transition(task: &Task, target: TaskStatus) -> ApiResult<()> {
    if task.status().can_transition_to(target) {
        Ok(())
    } else {
        Err(TaskDomainError::InvalidStatusTransition {
            task_id: task.id().clone(),
            from: task.status(),
            to: target,
        }
        .into())
    }
}
