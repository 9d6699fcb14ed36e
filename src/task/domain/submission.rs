//! Worker submissions of completed work.

use super::TaskDomainError;
use reqwest::Url;

/// Explanation and optional link a worker supplies when submitting a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    explanation: String,
    work_link: Option<String>,
}

impl Submission {
    /// Creates a validated submission.
    ///
    /// The explanation is trimmed and must not be empty. A blank work link is
    /// treated as absent; a non-blank one must be an absolute `http` or
    /// `https` URL.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyExplanation`] or
    /// [`TaskDomainError::InvalidWorkLink`].
    pub fn new(
        explanation: impl Into<String>,
        work_link: Option<&str>,
    ) -> Result<Self, TaskDomainError> {
        let raw = explanation.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyExplanation);
        }

        let link = work_link
            .map(str::trim)
            .filter(|link| !link.is_empty())
            .map(validate_work_link)
            .transpose()?;

        Ok(Self {
            explanation: trimmed.to_owned(),
            work_link: link,
        })
    }

    /// Returns the explanation of the completed work.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Returns the link to the completed work, if any.
    #[must_use]
    pub fn work_link(&self) -> Option<&str> {
        self.work_link.as_deref()
    }

    pub(crate) fn into_parts(self) -> (String, Option<String>) {
        (self.explanation, self.work_link)
    }
}

fn validate_work_link(link: &str) -> Result<String, TaskDomainError> {
    let invalid = || TaskDomainError::InvalidWorkLink(link.to_owned());
    let url = Url::parse(link).map_err(|_| invalid())?;
    let is_web = matches!(url.scheme(), "http" | "https");
    if !is_web || url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    Ok(link.to_owned())
}
