//! Validated input for assigning a new task.

use super::TaskDomainError;
use chrono::{DateTime, Utc};

/// Maximum number of characters in a task title.
pub const MAX_TITLE_CHARS: usize = 200;

/// Operator-supplied content of a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAssignment {
    title: String,
    description: Option<String>,
    instructions: String,
    deadline: DateTime<Utc>,
}

impl TaskAssignment {
    /// Creates an assignment with the mandatory fields.
    ///
    /// Title and instructions are trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`], [`TaskDomainError::TitleTooLong`]
    /// or [`TaskDomainError::EmptyInstructions`] when the text fields are
    /// unusable.
    pub fn new(
        title: impl Into<String>,
        instructions: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        let raw_title = title.into();
        let trimmed_title = raw_title.trim();
        if trimmed_title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let length = trimmed_title.chars().count();
        if length > MAX_TITLE_CHARS {
            return Err(TaskDomainError::TitleTooLong {
                length,
                max: MAX_TITLE_CHARS,
            });
        }

        let raw_instructions = instructions.into();
        let trimmed_instructions = raw_instructions.trim();
        if trimmed_instructions.is_empty() {
            return Err(TaskDomainError::EmptyInstructions);
        }

        Ok(Self {
            title: trimmed_title.to_owned(),
            description: None,
            instructions: trimmed_instructions.to_owned(),
            deadline,
        })
    }

    /// Sets the optional description. Blank descriptions are dropped.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let raw = description.into();
        let trimmed = raw.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
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

    /// Returns the instructions.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }
}
