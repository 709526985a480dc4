//! Application wiring
//!
//! One API client, one notification center and the three feature stores,
//! sharing a single environment.

use crate::config::{AppConfig, DEFAULT_SHUTDOWN_TIMEOUT};
use crate::environment::AppEnvironment;
use crate::lists::ListStore;
use crate::notifications::NotificationCenter;
use crate::session::SessionStore;
use crate::tasks::TaskStore;
use crate::views;
use std::sync::Arc;
use std::time::Duration;
use todolists_api::{ApiError, HttpTodoApi, Task, TodoApi};
use todolists_core::environment::{Clock, SystemClock};
use todolists_runtime::{StoreError, Subscription};

/// The client state layer
///
/// Cloning is cheap; clones share every store.
pub struct App<A>
where
    A: TodoApi + 'static,
{
    lists: ListStore<A, NotificationCenter>,
    tasks: TaskStore<A, NotificationCenter>,
    session: SessionStore<A, NotificationCenter>,
    notifications: Arc<NotificationCenter>,
    shutdown_timeout: Duration,
}

impl App<HttpTodoApi> {
    /// Build the application over the HTTP API
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let api = HttpTodoApi::new(&config.api)?;
        tracing::info!(base_url = %config.api.base_url, "Todolists client initialised");

        let mut app = Self::with_api(api, SystemClock);
        app.shutdown_timeout = config.shutdown_timeout;
        Ok(app)
    }
}

impl<A> App<A>
where
    A: TodoApi + 'static,
{
    /// Build the application over any API implementation
    #[must_use]
    pub fn with_api(api: A, clock: impl Clock + 'static) -> Self {
        let notifications = Arc::new(NotificationCenter::new(Arc::new(clock)));
        let environment = AppEnvironment::new(Arc::new(api), Arc::clone(&notifications));

        Self {
            lists: ListStore::new(environment.clone()),
            tasks: TaskStore::new(environment.clone()),
            session: SessionStore::new(environment),
            notifications,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// The list store
    #[must_use]
    pub const fn lists(&self) -> &ListStore<A, NotificationCenter> {
        &self.lists
    }

    /// The task store
    #[must_use]
    pub const fn tasks(&self) -> &TaskStore<A, NotificationCenter> {
        &self.tasks
    }

    /// The session store
    #[must_use]
    pub const fn session(&self) -> &SessionStore<A, NotificationCenter> {
        &self.session
    }

    /// The notification center
    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Tasks of `list_id` that pass its filter, right now
    #[must_use]
    pub fn visible_tasks(&self, list_id: &str) -> Vec<Task> {
        views::visible_tasks(&self.lists.snapshot(), &self.tasks.snapshot(), list_id)
    }

    /// Live view of the tasks of `list_id` that pass its filter
    ///
    /// # Panics
    ///
    /// Requires a running tokio runtime.
    #[must_use]
    pub fn watch_visible_tasks(&self, list_id: impl Into<String>) -> Subscription<Vec<Task>> {
        views::watch_visible_tasks(self.lists.subscribe(), self.tasks.subscribe(), list_id)
    }

    /// Resolve the session, then load the lists when signed in
    ///
    /// Returns whether the session is authenticated.
    pub async fn bootstrap(&self) -> bool {
        let _ = self.session.me();

        if !self.session.auth_resolved().await {
            tracing::info!("Not signed in, skipping lists fetch");
            return false;
        }

        self.lists.list().wait().await;
        true
    }

    /// Stop accepting actions and wait for in-flight requests
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] from the first store that
    /// could not drain in time. Every store is shut down regardless.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        let timeout = self.shutdown_timeout;
        let (lists, tasks, session) = tokio::join!(
            self.lists.store().shutdown(timeout),
            self.tasks.store().shutdown(timeout),
            self.session.store().shutdown(timeout),
        );
        lists.and(tasks).and(session)
    }
}

impl<A> Clone for App<A>
where
    A: TodoApi + 'static,
{
    fn clone(&self) -> Self {
        Self {
            lists: self.lists.clone(),
            tasks: self.tasks.clone(),
            session: self.session.clone(),
            notifications: Arc::clone(&self.notifications),
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

impl<A> std::fmt::Debug for App<A>
where
    A: TodoApi + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("lists", &self.lists)
            .field("tasks", &self.tasks)
            .field("session", &self.session)
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}
