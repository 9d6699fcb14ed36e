//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing task values or applying transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the permitted length.
    #[error("task title is {length} characters, the limit is {max}")]
    TitleTooLong {
        /// Observed title length in characters.
        length: usize,
        /// Maximum title length in characters.
        max: usize,
    },

    /// The task instructions are empty after trimming.
    #[error("task instructions must not be empty")]
    EmptyInstructions,

    /// The deadline lies before the assignment time.
    #[error("deadline {0} is already in the past")]
    DeadlineInPast(DateTime<Utc>),

    /// A submission carried no explanation of the completed work.
    #[error("an explanation of the completed work is required")]
    EmptyExplanation,

    /// A submission carried a work link that is not an absolute http(s) URL.
    #[error("invalid work link '{0}', expected an absolute http or https URL")]
    InvalidWorkLink(String),

    /// A rejection carried no feedback notes.
    #[error("review notes are required when rejecting work")]
    MissingRejectionNotes,

    /// The requested status change is not permitted by the lifecycle.
    #[error("invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidStatusTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Status held when the transition was attempted.
        from: TaskStatus,
        /// Status the transition would have produced.
        to: TaskStatus,
    },

    /// The acting user is not the worker the task is assigned to.
    #[error("user {user_id} is not the worker assigned to task {task_id}")]
    NotTaskOwner {
        /// Task the submission targeted.
        task_id: TaskId,
        /// User who attempted the submission.
        user_id: UserId,
    },

    /// The acting user needs the admin role.
    #[error("user {0} must be an admin to perform this action")]
    AdminRequired(UserId),

    /// Tasks can only be assigned to accounts with the worker role.
    #[error("user {0} is not a worker and cannot be assigned tasks")]
    WorkerRequired(UserId),
}

/// Error returned while parsing task statuses from external input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing account roles from external input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
