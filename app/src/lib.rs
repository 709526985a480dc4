//! # Todolists
//!
//! Client-side state layer for a todo-list service.
//!
//! The crate keeps three caches in sync with the remote API, each owned by a
//! store that publishes immutable snapshots:
//!
//! - [`lists::ListStore`]: the user's lists and their display filters
//! - [`tasks::TaskStore`]: tasks, keyed by list id
//! - [`session::SessionStore`]: authentication state
//!
//! Every remote call is a single attempt. Failures are logged, reported to the
//! [`notifications::NotificationCenter`] and leave the published snapshot
//! untouched.
//!
//! ## Example
//!
//! ```no_run
//! use todolists::{App, AppConfig};
//! use todolists_api::UpdateTaskRequest;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let app = App::new(&AppConfig::from_env()?)?;
//!
//! if app.bootstrap().await {
//!     app.tasks().list("list-1").wait().await;
//!     app.tasks()
//!         .update("list-1", "task-1", UpdateTaskRequest::title("Buy milk"))
//!         .wait()
//!         .await;
//!     println!("{:?}", app.visible_tasks("list-1"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod effects;
pub mod environment;
pub mod lists;
pub mod notifications;
pub mod session;
pub mod tasks;
pub mod telemetry;
pub mod views;

pub use app::App;
pub use config::AppConfig;
pub use environment::{AppEnvironment, Notifier};
pub use lists::Filter;
pub use notifications::{Notification, NotificationCenter, Severity};
