//! Task aggregate root and the task status lifecycle.

use super::{
    ParseTaskStatusError, ReviewDecision, ReviewOutcome, ReviewRecord, Submission,
    TaskAssignment, TaskDomainError, TaskId, UrgencyTier, User, UserId, UserRef, classify,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Assigned and waiting for the worker.
    Pending,
    /// Work has been submitted and awaits review.
    Submitted,
    /// Work has been accepted.
    Approved,
    /// Work was sent back to the worker with feedback.
    Rejected,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Submitted,
        Self::Approved,
        Self::Rejected,
    ];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns whether the lifecycle permits moving from `self` to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending | Self::Rejected, Self::Submitted)
                | (Self::Submitted, Self::Approved | Self::Rejected)
        )
    }

    /// Returns whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Returns whether the worker is expected to act on the task.
    #[must_use]
    pub const fn is_actionable_by_worker(self) -> bool {
        matches!(self, Self::Pending | Self::Rejected)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    instructions: String,
    deadline: DateTime<Utc>,
    status: TaskStatus,
    assigned_by: Option<UserRef>,
    worker: UserRef,
    assigned_at: DateTime<Utc>,
    explanation: Option<String>,
    work_link: Option<String>,
    review_notes: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
    reviewed_at: Option<DateTime<Utc>>,
    reviewed_by: Option<UserRef>,
    review_history: Vec<ReviewRecord>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a stored or fetched task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Instructions for the worker.
    pub instructions: String,
    /// Deadline.
    pub deadline: DateTime<Utc>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Admin who assigned the task, when the source recorded one.
    pub assigned_by: Option<UserRef>,
    /// Worker the task is assigned to.
    pub worker: UserRef,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Latest submission explanation.
    pub explanation: Option<String>,
    /// Latest submission work link.
    pub work_link: Option<String>,
    /// Current review feedback.
    pub review_notes: Option<String>,
    /// Latest submission timestamp.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Latest review timestamp.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Latest reviewer.
    pub reviewed_by: Option<UserRef>,
    /// Review audit trail, oldest first.
    pub review_history: Vec<ReviewRecord>,
}

impl Task {
    /// Assigns a new task to a worker. The task starts out
    /// [`TaskStatus::Pending`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AdminRequired`] when `assigned_by` is not an
    /// admin, [`TaskDomainError::WorkerRequired`] when `worker` is not a
    /// worker, or [`TaskDomainError::DeadlineInPast`] when the deadline lies
    /// before the assignment time.
    pub fn assign(
        assignment: TaskAssignment,
        assigned_by: &User,
        worker: &User,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        if !assigned_by.is_admin() {
            return Err(TaskDomainError::AdminRequired(assigned_by.id().clone()));
        }
        if worker.is_admin() {
            return Err(TaskDomainError::WorkerRequired(worker.id().clone()));
        }
        let timestamp = clock.utc();
        if assignment.deadline() < timestamp {
            return Err(TaskDomainError::DeadlineInPast(assignment.deadline()));
        }

        Ok(Self {
            id: TaskId::new(),
            title: assignment.title().to_owned(),
            description: assignment.description().map(str::to_owned),
            instructions: assignment.instructions().to_owned(),
            deadline: assignment.deadline(),
            status: TaskStatus::Pending,
            assigned_by: Some(assigned_by.to_ref()),
            worker: worker.to_ref(),
            assigned_at: timestamp,
            explanation: None,
            work_link: None,
            review_notes: None,
            submitted_at: None,
            reviewed_at: None,
            reviewed_by: None,
            review_history: Vec::new(),
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from storage or from the remote work API.
    ///
    /// The latest lifecycle timestamp is derived from the assignment,
    /// submission and review timestamps.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let updated_at = [Some(data.assigned_at), data.submitted_at, data.reviewed_at]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(data.assigned_at);

        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            instructions: data.instructions,
            deadline: data.deadline,
            status: data.status,
            assigned_by: data.assigned_by,
            worker: data.worker,
            assigned_at: data.assigned_at,
            explanation: data.explanation,
            work_link: data.work_link,
            review_notes: data.review_notes,
            submitted_at: data.submitted_at,
            reviewed_at: data.reviewed_at,
            reviewed_by: data.reviewed_by,
            review_history: data.review_history,
            updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the worker instructions.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the admin who assigned the task.
    ///
    /// Tasks created locally always have one. Fetched records may omit it.
    #[must_use]
    pub const fn assigned_by(&self) -> Option<&UserRef> {
        self.assigned_by.as_ref()
    }

    /// Returns the worker the task is assigned to.
    #[must_use]
    pub const fn worker(&self) -> &UserRef {
        &self.worker
    }

    /// Returns the assignment timestamp.
    #[must_use]
    pub const fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// Returns the latest submission explanation.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Returns the latest submission work link.
    #[must_use]
    pub fn work_link(&self) -> Option<&str> {
        self.work_link.as_deref()
    }

    /// Returns the current review feedback.
    ///
    /// Cleared as soon as the worker resubmits; earlier notes stay available
    /// through [`Task::review_history`].
    #[must_use]
    pub fn review_notes(&self) -> Option<&str> {
        self.review_notes.as_deref()
    }

    /// Returns the latest submission timestamp.
    #[must_use]
    pub const fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// Returns the latest review timestamp.
    #[must_use]
    pub const fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.reviewed_at
    }

    /// Returns the latest reviewer.
    #[must_use]
    pub const fn reviewed_by(&self) -> Option<&UserRef> {
        self.reviewed_by.as_ref()
    }

    /// Returns every review decision taken on this task, oldest first.
    #[must_use]
    pub fn review_history(&self) -> &[ReviewRecord] {
        &self.review_history
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the task is assigned to the given worker.
    #[must_use]
    pub fn is_assigned_to(&self, worker_id: &UserId) -> bool {
        &self.worker.id == worker_id
    }

    /// Classifies the deadline against `now`.
    #[must_use]
    pub fn urgency(&self, now: DateTime<Utc>) -> UrgencyTier {
        classify(self.deadline, now)
    }

    /// Submits completed work, moving the task to [`TaskStatus::Submitted`].
    ///
    /// A resubmission after rejection overwrites the previous explanation and
    /// link and clears the current review feedback.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskOwner`] when `actor` is not the
    /// assigned worker, or [`TaskDomainError::InvalidStatusTransition`] when
    /// the task is neither pending nor rejected. The task is left unchanged
    /// on error.
    pub fn submit(
        &mut self,
        actor: &User,
        submission: Submission,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.is_assigned_to(actor.id()) {
            return Err(TaskDomainError::NotTaskOwner {
                task_id: self.id.clone(),
                user_id: actor.id().clone(),
            });
        }
        self.ensure_transition(TaskStatus::Submitted)?;

        let timestamp = self.next_timestamp(clock);
        let (explanation, work_link) = submission.into_parts();
        self.explanation = Some(explanation);
        self.work_link = work_link;
        self.review_notes = None;
        self.reviewed_at = None;
        self.reviewed_by = None;
        self.submitted_at = Some(timestamp);
        self.status = TaskStatus::Submitted;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Applies an admin review decision to submitted work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AdminRequired`] when `reviewer` is not an
    /// admin, or [`TaskDomainError::InvalidStatusTransition`] when the task is
    /// not awaiting review. The task is left unchanged on error.
    pub fn review(
        &mut self,
        reviewer: &User,
        decision: ReviewDecision,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !reviewer.is_admin() {
            return Err(TaskDomainError::AdminRequired(reviewer.id().clone()));
        }
        let outcome = decision.outcome();
        let target = match outcome {
            ReviewOutcome::Approved => TaskStatus::Approved,
            ReviewOutcome::Rejected => TaskStatus::Rejected,
        };
        self.ensure_transition(target)?;

        let timestamp = self.next_timestamp(clock);
        let notes = decision.into_notes();
        self.review_history.push(ReviewRecord {
            outcome,
            notes: notes.clone(),
            reviewed_by: reviewer.to_ref(),
            reviewed_at: timestamp,
        });
        self.review_notes = notes;
        self.reviewed_at = Some(timestamp);
        self.reviewed_by = Some(reviewer.to_ref());
        self.status = target;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Approves submitted work. See [`Task::review`].
    ///
    /// # Errors
    ///
    /// Same as [`Task::review`].
    pub fn approve(
        &mut self,
        reviewer: &User,
        notes: Option<&str>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.review(reviewer, ReviewDecision::approve(notes), clock)
    }

    /// Rejects submitted work with mandatory feedback. See [`Task::review`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingRejectionNotes`] for blank notes, or
    /// any error of [`Task::review`].
    pub fn reject(
        &mut self,
        reviewer: &User,
        notes: &str,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.review(reviewer, ReviewDecision::reject(notes)?, clock)
    }

    fn ensure_transition(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(TaskDomainError::InvalidStatusTransition {
            task_id: self.id.clone(),
            from: self.status,
            to: target,
        })
    }

    /// Returns the clock time, never earlier than the latest lifecycle
    /// timestamp.
    fn next_timestamp(&self, clock: &impl Clock) -> DateTime<Utc> {
        clock.utc().max(self.updated_at)
    }
}
