//! Error taxonomy for calls against the remote work API.

use crate::task::domain::TaskDomainError;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures surfaced by the API client and dashboards.
///
/// None of these are fatal: callers show the message and leave the failed
/// control re-actionable.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The session is missing or was rejected (HTTP 401).
    #[error("authentication failed: {0}")]
    Unauthenticated(String),

    /// The caller lacks permission (HTTP 403).
    #[error("access denied: {0}")]
    Forbidden(String),

    /// The server rejected the request body (HTTP 400).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The addressed resource does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource changed underneath the request, e.g. a task that was
    /// already reviewed (HTTP 409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The server failed (HTTP 5xx).
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message.
        message: String,
    },

    /// Any other non-success status.
    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message.
        message: String,
    },

    /// A response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The input failed local validation; no request was sent.
    #[error(transparent)]
    InvalidInput(#[from] TaskDomainError),

    /// No credential is stored; sign in first.
    #[error("not signed in")]
    MissingCredential,

    /// The same control already has a request in flight.
    #[error("{0} is already in progress")]
    Busy(&'static str),

    /// Credential storage failed.
    #[error(transparent)]
    Credentials(#[from] CredentialStoreError),
}

impl ApiError {
    /// Maps a non-success HTTP status and server message to an error.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 422 => Self::Validation(message),
            401 => Self::Unauthenticated(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            500..=599 => Self::Server { status, message },
            _ => Self::UnexpectedStatus { status, message },
        }
    }

    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }

    /// Returns whether the error ended the session.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }
}

/// Errors raised by credential stores.
#[derive(Debug, Clone, Error)]
pub enum CredentialStoreError {
    /// No location is available for the credential file.
    #[error("no configuration directory available for credentials")]
    NoLocation,

    /// Reading or writing the credential failed.
    #[error("credential storage error: {0}")]
    Io(Arc<std::io::Error>),

    /// In-process state was poisoned by a panicking writer.
    #[error("credential state poisoned: {0}")]
    Poisoned(String),
}

impl From<std::io::Error> for CredentialStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
