//! Client for the remote work API.
//!
//! The server owns authoritative task state. This module provides the
//! transport port and its `reqwest` adapter, the JSON wire types, an explicit
//! [`Session`] carrying the bearer token, credential stores, and the
//! [`Dashboard`] view model that partitions fetched tasks for a viewer.

mod accounts;
mod client;
mod credentials;
mod dashboard;
mod error;
mod gate;
mod retry;
mod session;
mod transport;
pub mod wire;

#[cfg(test)]
mod tests;

pub use accounts::{GENERATED_PASSWORD_LEN, NewAccount, generate_password};
pub use client::TaskPilotClient;
pub use credentials::{CredentialStore, FileCredentialStore, InMemoryCredentialStore};
pub use dashboard::Dashboard;
pub use error::{ApiError, ApiResult, CredentialStoreError};
pub use gate::{ActionGate, GateGuard};
pub use retry::RetryPolicy;
pub use session::{Credential, LogExpiry, Session, SessionExpiryHandler};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport, TransportError,
};

#[cfg(test)]
pub use transport::MockHttpTransport;
