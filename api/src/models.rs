//! Wire models for the todolists API
//!
//! All payloads are camelCase JSON.

use serde::{Deserialize, Serialize};

/// A list as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    /// Server-assigned identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Server ordering key
    pub order: i64,
    /// Creation date as sent by the server
    pub added_date: String,
}

/// Task status code
///
/// `0` is active and `1` is completed. Any other value is reserved by the
/// server and round-trips unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum TaskStatus {
    /// Not yet done
    #[default]
    Active,
    /// Done
    Completed,
    /// A reserved status value
    Other(i32),
}

impl From<i32> for TaskStatus {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Active,
            1 => Self::Completed,
            other => Self::Other(other),
        }
    }
}

impl From<TaskStatus> for i32 {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Active => 0,
            TaskStatus::Completed => 1,
            TaskStatus::Other(value) => value,
        }
    }
}

/// A task as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier
    pub id: String,
    /// Owning list
    pub todo_list_id: String,
    /// Display title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// Status code
    #[serde(default)]
    pub status: TaskStatus,
    /// Priority
    #[serde(default)]
    pub priority: i32,
    /// Start date
    #[serde(default)]
    pub start_date: Option<String>,
    /// Deadline
    #[serde(default)]
    pub deadline: Option<String>,
    /// Server ordering key
    #[serde(default)]
    pub order: i64,
    /// Creation date as sent by the server
    #[serde(default)]
    pub added_date: String,
}

/// Partial task update
///
/// Absent fields are not serialized. For the nullable fields the outer
/// `Option` means "present", the inner one carries an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description (`Some(None)` clears it)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub description: Option<Option<String>>,
    /// New completion flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// New start date (`Some(None)` clears it)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub start_date: Option<Option<String>>,
    /// New deadline (`Some(None)` clears it)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub deadline: Option<Option<String>>,
}

impl UpdateTaskRequest {
    /// Patch that only changes the status
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Patch that only changes the title
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow-merge this patch over `task`
    ///
    /// Only the fields present in the patch are replaced.
    #[must_use]
    pub fn apply_to(&self, task: &Task) -> Task {
        let mut merged = task.clone();
        if let Some(title) = &self.title {
            merged.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            merged.description.clone_from(description);
        }
        if let Some(completed) = self.completed {
            merged.completed = completed;
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        if let Some(priority) = self.priority {
            merged.priority = priority;
        }
        if let Some(start_date) = &self.start_date {
            merged.start_date.clone_from(start_date);
        }
        if let Some(deadline) = &self.deadline {
            merged.deadline.clone_from(deadline);
        }
        merged
    }
}

// A present `null` must become `Some(None)`, which the plain derive collapses
// to `None`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Credentials for `POST /auth/login`
///
/// `Debug` redacts the password so requests can be logged.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Keep the session cookie across restarts
    pub remember_me: bool,
    /// Captcha answer, required after repeated failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha: Option<String>,
}

impl LoginRequest {
    /// Credentials without a captcha answer
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>, remember_me: bool) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me,
            captcha: None,
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .field("captcha", &self.captcha)
            .finish()
    }
}

/// Profile returned by `GET /auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    /// User id
    pub id: u64,
    /// Account email
    pub email: String,
    /// Login name
    pub login: String,
}

/// Standard response envelope for mutations and auth calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonResponse<D> {
    /// `0` on success
    #[serde(default)]
    pub result_code: i32,
    /// Payload
    pub data: D,
    /// Human-readable messages, the first one is shown to users
    #[serde(default)]
    pub messages: Vec<String>,
    /// Per-field validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_errors: Option<serde_json::Value>,
}

impl<D> CommonResponse<D> {
    /// Whether the server accepted the request
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result_code == 0
    }
}

/// `data: { item }` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData<T> {
    /// The created or updated entity
    pub item: T,
}

/// `data: { userId }` payload of a login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Authenticated user
    pub user_id: u64,
}

/// Envelope of `GET /todo-lists/{id}/tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTasksResponse {
    /// Tasks in server order
    pub items: Vec<Task>,
    /// Total number of tasks in the list
    #[serde(default)]
    pub total_count: u64,
    /// Application error, if any
    #[serde(default)]
    pub error: Option<String>,
}
