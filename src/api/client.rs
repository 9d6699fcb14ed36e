//! Typed client for the remote work API.

use super::{
    ApiError, ApiRequest, ApiResponse, ApiResult, HttpTransport, Method, NewAccount, RetryPolicy,
    Session,
    wire::{
        AssignBody, CalendarStatus, CompleteBody, LoginBody, LoginResponse, RegisterBody,
        ReviewBody, TaskDto, UserDto, VerifyResponse, decode_tasks,
    },
};
use crate::task::domain::{
    ReviewDecision, ReviewOutcome, Submission, Task, TaskAssignment, TaskId, User, UserId,
    Viewer,
};
use reqwest::Url;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the work API.
///
/// Every authenticated call reads its token from the shared [`Session`]. A
/// 401 response expires the session (clearing the stored credential and
/// notifying the expiry handler once) and is returned as
/// [`ApiError::Unauthenticated`]. Transition calls never change local state;
/// callers re-fetch after success.
#[derive(Debug)]
pub struct TaskPilotClient<T: HttpTransport> {
    transport: T,
    session: Arc<Session>,
    login_retry: RetryPolicy,
}

impl<T: HttpTransport> TaskPilotClient<T> {
    /// Creates a client using the default login retry policy.
    #[must_use]
    pub fn new(transport: T, session: Arc<Session>) -> Self {
        Self {
            transport,
            session,
            login_retry: RetryPolicy::default(),
        }
    }

    /// Replaces the login retry policy.
    #[must_use]
    pub const fn with_login_retry(mut self, policy: RetryPolicy) -> Self {
        self.login_retry = policy;
        self
    }

    /// Returns the session this client authenticates with.
    #[must_use]
    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Signs in and stores the issued token.
    ///
    /// Network failures and server faults are retried according to the login
    /// retry policy; rejected credentials are not.
    ///
    /// # Errors
    ///
    /// Returns the error of the final attempt, or [`ApiError::Decode`] when
    /// the response lacks a token or user.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let body = encode(&LoginBody { email, password })?;
        let response = self
            .login_retry
            .run("login", || {
                let request = ApiRequest::new(Method::Post, "/auth/login").with_body(body.clone());
                self.send_public(request)
            })
            .await?;

        let payload: LoginResponse = response.json()?;
        if payload.token.trim().is_empty() {
            return Err(ApiError::Decode("no token received from server".to_owned()));
        }
        self.session.sign_in(&payload.token)?;
        info!(user_id = %payload.user.id, role = %payload.user.role, "signed in");
        Ok(payload.user.into())
    }

    /// Signs out locally.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Credentials`] when the stored token cannot be
    /// removed.
    pub fn logout(&self) -> ApiResult<()> {
        self.session.sign_out()?;
        info!("signed out");
        Ok(())
    }

    /// Returns the account the current token belongs to.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn verify(&self) -> ApiResult<User> {
        let response = self.authorized(Method::Get, "/auth/verify", None).await?;
        let payload: VerifyResponse = response.json()?;
        Ok(payload.user.into())
    }

    /// Registers a new account. Admin only.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn register_user(&self, account: &NewAccount) -> ApiResult<()> {
        let body = encode(&RegisterBody {
            name: account.name(),
            email: account.email(),
            password: account.password(),
            role: account.role(),
        })?;
        self.authorized(Method::Post, "/auth/register", Some(body))
            .await?;
        info!(email = account.email(), role = %account.role(), "account registered");
        Ok(())
    }

    /// Lists accounts. Admin only.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        let response = self.authorized(Method::Get, "/users", None).await?;
        let users: Vec<UserDto> = response.json()?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Deletes an account and, server-side, every task assigned to it.
    /// Admin only.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn delete_user(&self, user_id: &UserId) -> ApiResult<()> {
        self.authorized(Method::Delete, &format!("/users/{user_id}"), None)
            .await?;
        info!(%user_id, "account deleted");
        Ok(())
    }

    /// Lists the tasks visible to `viewer`, in server order.
    ///
    /// For a worker, records that omit the worker are attributed to them.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn list_tasks(&self, viewer: &Viewer) -> ApiResult<Vec<Task>> {
        let owner = match viewer {
            Viewer::Worker(worker_id) => Some(worker_id),
            Viewer::Admin => None,
        };
        self.fetch_tasks("/work", owner).await
    }

    /// Lists submitted tasks awaiting review. Admin only.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn list_submitted(&self) -> ApiResult<Vec<Task>> {
        self.fetch_tasks("/work/submitted", None).await
    }

    /// Assigns a task to a worker. Admin only.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn assign_task(
        &self,
        worker_id: &UserId,
        assignment: &TaskAssignment,
    ) -> ApiResult<()> {
        let body = encode(&AssignBody {
            worker_id,
            task: assignment.title(),
            description: assignment.description(),
            instructions: assignment.instructions(),
            deadline: assignment.deadline(),
        })?;
        self.authorized(Method::Post, "/work/assign", Some(body))
            .await?;
        info!(%worker_id, title = assignment.title(), "task assigned");
        Ok(())
    }

    /// Submits completed work for a task.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn complete_task(&self, task_id: &TaskId, submission: &Submission) -> ApiResult<()> {
        let body = encode(&CompleteBody {
            explanation: submission.explanation(),
            work_link: submission.work_link(),
        })?;
        self.authorized(Method::Put, &format!("/work/complete/{task_id}"), Some(body))
            .await?;
        info!(%task_id, "work submitted");
        Ok(())
    }

    /// Approves or rejects submitted work. Admin only.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call; a task that was already
    /// reviewed typically yields [`ApiError::Conflict`].
    pub async fn review_task(&self, task_id: &TaskId, decision: &ReviewDecision) -> ApiResult<()> {
        let action = match decision.outcome() {
            ReviewOutcome::Approved => "approve",
            ReviewOutcome::Rejected => "reject",
        };
        let body = encode(&ReviewBody {
            review_notes: decision.notes(),
        })?;
        self.authorized(Method::Put, &format!("/work/{action}/{task_id}"), Some(body))
            .await?;
        info!(%task_id, outcome = ?decision.outcome(), "work reviewed");
        Ok(())
    }

    /// Returns whether the caller has linked a Google Calendar.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn calendar_status(&self) -> ApiResult<bool> {
        let response = self
            .authorized(Method::Get, "/auth/google/status", None)
            .await?;
        let status: CalendarStatus = response.json()?;
        Ok(status.connected)
    }

    /// Builds the browser URL that starts linking a Google Calendar.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] when signed out, or
    /// [`ApiError::Validation`] when `base_url` is not a valid URL.
    pub fn calendar_connect_url(&self, base_url: &str) -> ApiResult<Url> {
        let credential = self
            .session
            .credential()?
            .ok_or(ApiError::MissingCredential)?;
        let endpoint = format!("{}/auth/google", base_url.trim_end_matches('/'));
        let mut url = Url::parse(&endpoint)
            .map_err(|err| ApiError::Validation(format!("invalid API base URL: {err}")))?;
        url.query_pairs_mut()
            .append_pair("token", credential.token());
        Ok(url)
    }

    /// Unlinks the caller's Google Calendar.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn calendar_disconnect(&self) -> ApiResult<()> {
        self.authorized(Method::Post, "/auth/google/disconnect", None)
            .await?;
        info!("calendar disconnected");
        Ok(())
    }

    /// Calls the unauthenticated health endpoint.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] raised by the call.
    pub async fn health(&self) -> ApiResult<serde_json::Value> {
        let response = self
            .send_public(ApiRequest::new(Method::Get, "/health"))
            .await?;
        response.json()
    }

    async fn fetch_tasks(&self, path: &str, owner: Option<&UserId>) -> ApiResult<Vec<Task>> {
        let response = self.authorized(Method::Get, path, None).await?;
        let records: Vec<TaskDto> = response.json()?;
        let tasks = decode_tasks(records, owner)?;
        debug!(path, count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    async fn send_public(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.transport.send(request).await?.error_for_status()
    }

    async fn authorized(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiResult<ApiResponse> {
        let credential = self
            .session
            .credential()?
            .ok_or(ApiError::MissingCredential)?;
        let mut request = ApiRequest::new(method, path).with_bearer(credential.token());
        if let Some(json) = body {
            request = request.with_body(json);
        }

        let response = self.transport.send(request).await?;
        if response.status == 401 {
            self.session.expire(&credential)?;
            return Err(ApiError::Unauthenticated(response.error_message()));
        }
        response.error_for_status()
    }
}

fn encode(value: &impl Serialize) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|err| ApiError::Decode(format!("encode request: {err}")))
}
