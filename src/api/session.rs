//! Explicit session context shared by every authenticated call.
//!
//! The session owns the bearer token for its whole lifetime: it loads it from
//! a [`CredentialStore`], replaces it on login, and clears it on logout or
//! expiry. Expiry is reported to a single [`SessionExpiryHandler`] exactly
//! once per credential, however many in-flight calls observe the 401.

use super::{ApiResult, CredentialStore, CredentialStoreError};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// Receives notice that the session ended because the server rejected it.
///
/// Implementations typically send the user back to the login screen.
pub trait SessionExpiryHandler: Send + Sync {
    /// Called once after the expired credential has been cleared.
    fn session_expired(&self);
}

/// Expiry handler that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogExpiry;

impl SessionExpiryHandler for LogExpiry {
    fn session_expired(&self) {
        info!("session expired; sign in again");
    }
}

/// Snapshot of the token used for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    generation: u64,
}

impl Credential {
    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    generation: u64,
}

/// Session context passed to the API client.
pub struct Session {
    store: Arc<dyn CredentialStore>,
    on_expiry: Arc<dyn SessionExpiryHandler>,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Opens a session, resuming any token already in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiError::Credentials`] when the store cannot be read.
    pub fn open(
        store: Arc<dyn CredentialStore>,
        on_expiry: Arc<dyn SessionExpiryHandler>,
    ) -> ApiResult<Self> {
        let token = store.load()?;
        Ok(Self {
            store,
            on_expiry,
            state: Mutex::new(SessionState {
                token,
                generation: 0,
            }),
        })
    }

    /// Returns the current credential, if signed in.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiError::Credentials`] when session state is poisoned.
    pub fn credential(&self) -> ApiResult<Option<Credential>> {
        let state = self.lock()?;
        Ok(state.token.as_ref().map(|token| Credential {
            token: token.clone(),
            generation: state.generation,
        }))
    }

    /// Returns whether a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_ok_and(|state| state.token.is_some())
    }

    /// Installs a freshly issued token and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiError::Credentials`] when persisting fails.
    pub fn sign_in(&self, token: &str) -> ApiResult<()> {
        let mut state = self.lock()?;
        self.store.store(token)?;
        state.token = Some(token.to_owned());
        state.generation = state.generation.wrapping_add(1);
        Ok(())
    }

    /// Ends the session at the user's request. The expiry handler is not
    /// notified.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiError::Credentials`] when clearing the store fails.
    pub fn sign_out(&self) -> ApiResult<()> {
        let mut state = self.lock()?;
        state.token = None;
        state.generation = state.generation.wrapping_add(1);
        self.store.clear()?;
        Ok(())
    }

    /// Ends the session because a request made with `credential` was
    /// rejected.
    ///
    /// Only the first report for a given credential clears the store and
    /// notifies the expiry handler; later reports, and reports about a
    /// credential that has since been replaced, return `false`.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiError::Credentials`] when clearing the store fails.
    pub fn expire(&self, credential: &Credential) -> ApiResult<bool> {
        {
            let mut state = self.lock()?;
            if state.generation != credential.generation || state.token.is_none() {
                return Ok(false);
            }
            state.token = None;
            state.generation = state.generation.wrapping_add(1);
            if let Err(error) = self.store.clear() {
                warn!(%error, "failed to clear expired credential");
            }
        }
        warn!("session rejected by server; credential cleared");
        self.on_expiry.session_expired();
        Ok(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionState>, CredentialStoreError> {
        self.state
            .lock()
            .map_err(|err| CredentialStoreError::Poisoned(err.to_string()))
    }
}
