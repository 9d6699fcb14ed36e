//! Shared fixtures for API client tests.

use crate::api::{
    ApiResponse, InMemoryCredentialStore, MockHttpTransport, RetryPolicy, Session,
    SessionExpiryHandler, TaskPilotClient,
};
use rstest::fixture;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const TOKEN: &str = "token-abc";

/// Expiry handler that counts notifications.
#[derive(Debug, Default)]
pub struct CountingExpiry {
    calls: AtomicUsize,
}

impl CountingExpiry {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SessionExpiryHandler for CountingExpiry {
    fn session_expired(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[fixture]
pub fn expiry() -> Arc<CountingExpiry> {
    Arc::new(CountingExpiry::default())
}

pub fn session_with(token: Option<&str>, expiry: &Arc<CountingExpiry>) -> Arc<Session> {
    let store = token.map_or_else(InMemoryCredentialStore::new, InMemoryCredentialStore::with_token);
    let handler: Arc<dyn SessionExpiryHandler> = expiry.clone();
    Arc::new(
        Session::open(Arc::new(store), handler)
            .unwrap_or_else(|err| panic!("in-memory session should open: {err}")),
    )
}

/// Client with a signed-in session and a fast login retry.
pub fn client_with(
    transport: MockHttpTransport,
    token: Option<&str>,
    expiry: &Arc<CountingExpiry>,
) -> TaskPilotClient<MockHttpTransport> {
    TaskPilotClient::new(transport, session_with(token, expiry))
        .with_login_retry(RetryPolicy::new(3, Duration::from_millis(5)))
}

pub fn ok_json(body: &Value) -> ApiResponse {
    ApiResponse::new(200, body.to_string())
}

pub fn task_json(id: u64, status: &str, worker_id: &str) -> Value {
    json!({
        "id": id,
        "task": format!("Task {id}"),
        "description": null,
        "instructions": "Follow the brief",
        "deadline": "2025-03-20T17:00:00Z",
        "status": status,
        "assignedAt": "2025-03-14T09:00:00Z",
        "assignedByUser": { "id": "admin-1", "name": "Ada Admin", "email": "ada@example.com" },
        "worker": { "id": worker_id, "name": "Wren Worker", "email": "wren@example.com" },
    })
}

pub fn user_json(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": format!("User {id}"),
        "email": format!("{id}@example.com"),
        "role": role,
    })
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub chrono::DateTime<chrono::Utc>);

impl mockable::Clock for FixedClock {
    fn local(&self) -> chrono::DateTime<chrono::Local> {
        self.0.with_timezone(&chrono::Local)
    }

    fn utc(&self) -> chrono::DateTime<chrono::Utc> {
        self.0
    }
}

/// 2025-03-14 09:00 UTC, the assignment time used by [`task_json`].
pub fn fixed_now() -> FixedClock {
    use chrono::TimeZone;
    FixedClock(
        chrono::Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("fixed clock time should be a valid UTC instant")),
    )
}
