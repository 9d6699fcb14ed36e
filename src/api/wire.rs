//! JSON payloads exchanged with the work API.
//!
//! Field names follow the server's camelCase convention. Server task records
//! call the title `task` and may carry users either as embedded objects or as
//! bare identifiers.

use crate::task::domain::{
    PersistedTaskData, Role, Task, TaskId, TaskStatus, User, UserId, UserRef,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult};

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginBody<'a> {
    /// Account email.
    pub email: &'a str,
    /// Account password.
    pub password: &'a str,
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls.
    pub token: String,
    /// The signed-in account.
    pub user: UserDto,
}

/// `GET /auth/verify` response.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    /// The account the token belongs to.
    pub user: UserDto,
}

/// Account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    /// Account identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Account role; unknown roles fail to decode.
    pub role: Role,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self::new(dto.id, dto.name, dto.email, dto.role)
    }
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterBody<'a> {
    /// Display name.
    pub name: &'a str,
    /// Email address.
    pub email: &'a str,
    /// Initial password.
    pub password: &'a str,
    /// Account role.
    pub role: Role,
}

/// `POST /work/assign` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignBody<'a> {
    /// Worker receiving the task.
    pub worker_id: &'a UserId,
    /// Task title.
    pub task: &'a str,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    /// Worker instructions.
    pub instructions: &'a str,
    /// Deadline.
    pub deadline: DateTime<Utc>,
}

/// `PUT /work/complete/:id` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteBody<'a> {
    /// Explanation of the completed work.
    pub explanation: &'a str,
    /// Optional link to the work.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_link: Option<&'a str>,
}

/// `PUT /work/approve/:id` and `PUT /work/reject/:id` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBody<'a> {
    /// Reviewer notes; omitted for approvals without notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<&'a str>,
}

/// `GET /auth/google/status` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CalendarStatus {
    /// Whether a Google Calendar is linked to the account.
    pub connected: bool,
}

/// User summary embedded in task records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSummaryDto {
    /// Account identifier.
    pub id: Option<UserId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
}

/// Task record as returned by `GET /work` and `GET /work/submitted`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    #[serde(alias = "title")]
    pub task: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Worker instructions.
    #[serde(default)]
    pub instructions: String,
    /// Deadline.
    pub deadline: DateTime<Utc>,
    /// Lifecycle status; unknown values fail to decode.
    pub status: TaskStatus,
    /// Assignment timestamp.
    #[serde(default, alias = "createdAt")]
    pub assigned_at: Option<DateTime<Utc>>,
    /// Embedded assigning admin.
    #[serde(default)]
    pub assigned_by_user: Option<UserSummaryDto>,
    /// Assigning admin identifier.
    #[serde(default)]
    pub assigned_by: Option<UserId>,
    /// Embedded worker.
    #[serde(default)]
    pub worker: Option<UserSummaryDto>,
    /// Worker identifier.
    #[serde(default)]
    pub worker_id: Option<UserId>,
    /// Latest submission explanation.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Latest submission work link.
    #[serde(default)]
    pub work_link: Option<String>,
    /// Current review notes.
    #[serde(default)]
    pub review_notes: Option<String>,
    /// Latest submission timestamp.
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Latest review timestamp.
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Embedded reviewer.
    #[serde(default)]
    pub reviewed_by_user: Option<UserSummaryDto>,
    /// Reviewer identifier.
    #[serde(default)]
    pub reviewed_by: Option<UserId>,
}

impl TaskDto {
    /// Converts the record into a domain task.
    ///
    /// Worker-scoped listings often leave out the worker, so `owner` stands
    /// in when the record names none. A missing assignment time falls back
    /// to the submission time, then to the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the record names no worker and no
    /// `owner` is given.
    pub fn into_task(self, owner: Option<&UserId>) -> ApiResult<Task> {
        let task_id = self.id;
        let worker = user_ref(self.worker, self.worker_id)
            .or_else(|| owner.cloned().map(UserRef::from_id))
            .ok_or_else(|| ApiError::Decode(format!("task {task_id} has no worker")))?;
        let assigned_by = user_ref(self.assigned_by_user, self.assigned_by);
        let reviewed_by = user_ref(self.reviewed_by_user, self.reviewed_by);
        let assigned_at = self
            .assigned_at
            .or(self.submitted_at)
            .unwrap_or(self.deadline);

        Ok(Task::from_persisted(PersistedTaskData {
            id: task_id,
            title: self.task,
            description: non_blank(self.description),
            instructions: self.instructions,
            deadline: self.deadline,
            status: self.status,
            assigned_by,
            worker,
            assigned_at,
            explanation: non_blank(self.explanation),
            work_link: non_blank(self.work_link),
            review_notes: non_blank(self.review_notes),
            submitted_at: self.submitted_at,
            reviewed_at: self.reviewed_at,
            reviewed_by,
            review_history: Vec::new(),
        }))
    }
}

/// Decodes a JSON array of task records into domain tasks, keeping order.
///
/// `owner` is the worker a worker-scoped listing belongs to; see
/// [`TaskDto::into_task`].
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when any record is malformed.
pub fn decode_tasks(records: Vec<TaskDto>, owner: Option<&UserId>) -> ApiResult<Vec<Task>> {
    records
        .into_iter()
        .map(|record| record.into_task(owner))
        .collect()
}

fn user_ref(summary: Option<UserSummaryDto>, id: Option<UserId>) -> Option<UserRef> {
    let (summary_id, name, email) =
        summary.map_or((None, None, None), |dto| (dto.id, dto.name, dto.email));
    let resolved = summary_id.or(id)?;
    Some(UserRef {
        id: resolved,
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
