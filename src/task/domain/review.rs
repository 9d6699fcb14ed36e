//! Admin review decisions and the review audit trail.

use super::{TaskDomainError, UserRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of reviewing a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    /// The work was accepted.
    Approved,
    /// The work was sent back to the worker.
    Rejected,
}

/// A validated admin decision on submitted work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Accept the work, optionally with notes.
    Approve {
        /// Optional reviewer notes.
        notes: Option<String>,
    },
    /// Send the work back with mandatory feedback.
    Reject {
        /// Feedback explaining what must change.
        notes: String,
    },
}

impl ReviewDecision {
    /// Creates an approval. Blank notes are treated as absent.
    #[must_use]
    pub fn approve(notes: Option<&str>) -> Self {
        let cleaned = notes
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Self::Approve { notes: cleaned }
    }

    /// Creates a rejection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingRejectionNotes`] when the notes are
    /// empty after trimming.
    pub fn reject(notes: &str) -> Result<Self, TaskDomainError> {
        let trimmed = notes.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::MissingRejectionNotes);
        }
        Ok(Self::Reject {
            notes: trimmed.to_owned(),
        })
    }

    /// Returns the outcome this decision produces.
    #[must_use]
    pub const fn outcome(&self) -> ReviewOutcome {
        match self {
            Self::Approve { .. } => ReviewOutcome::Approved,
            Self::Reject { .. } => ReviewOutcome::Rejected,
        }
    }

    /// Returns the reviewer notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        match self {
            Self::Approve { notes } => notes.as_deref(),
            Self::Reject { notes } => Some(notes),
        }
    }

    pub(crate) fn into_notes(self) -> Option<String> {
        match self {
            Self::Approve { notes } => notes,
            Self::Reject { notes } => Some(notes),
        }
    }
}

/// One entry of a task's review history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Decision taken.
    pub outcome: ReviewOutcome,
    /// Notes supplied with the decision.
    pub notes: Option<String>,
    /// Admin who took the decision.
    pub reviewed_by: UserRef,
    /// When the decision was recorded.
    pub reviewed_at: DateTime<Utc>,
}
