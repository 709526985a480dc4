//! # Todolists API
//!
//! Wire models and HTTP client for the todolists remote API.
//!
//! The [`TodoApi`] trait is the capability the client stores depend on; the
//! [`HttpTodoApi`] implementation talks to the real server with `reqwest`,
//! and test code substitutes an in-memory fake.
//!
//! ## Example
//!
//! ```no_run
//! use todolists_api::{ApiConfig, HttpTodoApi, TodoApi};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig::from_env()?;
//! let api = HttpTodoApi::new(&config)?;
//!
//! let lists = api.fetch_lists().await?;
//! println!("{} lists", lists.len());
//! # Ok(())
//! # }
//! ```

use std::future::Future;

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::HttpTodoApi;
pub use config::{ApiConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use models::{
    CommonResponse, GetTasksResponse, LoginRequest, MeResponse, Task, TaskStatus, TodoList,
    UpdateTaskRequest,
};

/// Convenience alias for API results
pub type Result<T> = std::result::Result<T, ApiError>;

/// Remote todolists API.
///
/// Every method performs exactly one request and never retries. Envelope
/// checks (`resultCode`, the tasks `error` field) are applied by the
/// implementation, so callers only see the unwrapped payload or an
/// [`ApiError`].
pub trait TodoApi: Send + Sync {
    /// `GET /todo-lists`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body cannot be decoded.
    fn fetch_lists(&self) -> impl Future<Output = Result<Vec<TodoList>>> + Send;

    /// `POST /todo-lists`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects the title.
    fn create_list(&self, title: &str) -> impl Future<Output = Result<TodoList>> + Send;

    /// `DELETE /todo-lists/{id}`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects it.
    fn delete_list(&self, list_id: &str) -> impl Future<Output = Result<()>> + Send;

    /// `PUT /todo-lists/{id}`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects it.
    fn rename_list(&self, list_id: &str, title: &str) -> impl Future<Output = Result<()>> + Send;

    /// `GET /todo-lists/{id}/tasks`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the envelope carries an error.
    fn fetch_tasks(&self, list_id: &str) -> impl Future<Output = Result<Vec<Task>>> + Send;

    /// `POST /todo-lists/{id}/tasks`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects the title.
    fn create_task(&self, list_id: &str, title: &str)
    -> impl Future<Output = Result<Task>> + Send;

    /// `DELETE /todo-lists/{id}/tasks/{taskId}`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects it.
    fn delete_task(&self, list_id: &str, task_id: &str)
    -> impl Future<Output = Result<()>> + Send;

    /// `PUT /todo-lists/{id}/tasks/{taskId}`
    ///
    /// Only the acknowledgment matters; whatever the server echoes in `data`
    /// is not decoded.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects the patch.
    fn update_task(
        &self,
        list_id: &str,
        task_id: &str,
        patch: &UpdateTaskRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    /// `POST /auth/login`, returning the user id
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the credentials are rejected.
    fn login(&self, request: &LoginRequest) -> impl Future<Output = Result<u64>> + Send;

    /// `DELETE /auth/login`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects it.
    fn logout(&self) -> impl Future<Output = Result<()>> + Send;

    /// `GET /auth/me`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or there is no active session.
    fn me(&self) -> impl Future<Output = Result<MeResponse>> + Send;
}
