//! Public facade of the task store.

use super::reducer::{FEATURE, TaskReducer};
use super::types::{TaskAction, TaskState};
use crate::environment::{AppEnvironment, Notifier};
use std::sync::Arc;
use todolists_api::{TodoApi, UpdateTaskRequest};
use todolists_runtime::{EffectHandle, Store, Subscription};

/// Runtime store specialised for tasks
pub type TaskRuntime<A, N> = Store<TaskState, TaskAction, AppEnvironment<A, N>, TaskReducer<A, N>>;

/// Cache of tasks, keyed by list id
///
/// Every method returns as soon as the request is started. Failures are
/// logged and notified; nothing is returned to the caller.
pub struct TaskStore<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    store: TaskRuntime<A, N>,
}

impl<A, N> TaskStore<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    /// Create an empty store
    #[must_use]
    pub fn new(environment: AppEnvironment<A, N>) -> Self {
        Self {
            store: Store::new(TaskState::new(), TaskReducer::new(), environment),
        }
    }

    /// Fetch the tasks of a list, replacing its cached sequence
    #[tracing::instrument(skip(self, list_id), fields(feature = FEATURE))]
    pub fn list(&self, list_id: impl Into<String>) -> EffectHandle {
        tracing::info!("Tasks data requested");
        self.dispatch(TaskAction::Fetch {
            list_id: list_id.into(),
        })
    }

    /// Create a task and prepend it to its list
    #[tracing::instrument(skip(self, list_id, title), fields(feature = FEATURE))]
    pub fn create(&self, list_id: impl Into<String>, title: impl Into<String>) -> EffectHandle {
        tracing::info!("Add task request initialised");
        self.dispatch(TaskAction::Create {
            list_id: list_id.into(),
            title: title.into(),
        })
    }

    /// Delete a task
    #[tracing::instrument(skip(self, list_id, task_id), fields(feature = FEATURE))]
    pub fn delete(&self, list_id: impl Into<String>, task_id: impl Into<String>) -> EffectHandle {
        tracing::info!("Delete task request initialised");
        self.dispatch(TaskAction::Delete {
            list_id: list_id.into(),
            task_id: task_id.into(),
        })
    }

    /// Update some fields of a task
    #[tracing::instrument(skip(self, list_id, task_id), fields(feature = FEATURE))]
    pub fn update(
        &self,
        list_id: impl Into<String>,
        task_id: impl Into<String>,
        patch: UpdateTaskRequest,
    ) -> EffectHandle {
        tracing::info!("Update task request initialised");
        self.dispatch(TaskAction::Update {
            list_id: list_id.into(),
            task_id: task_id.into(),
            patch,
        })
    }

    /// The currently published snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<TaskState> {
        self.store.snapshot()
    }

    /// Observe the cache (replays the current snapshot first)
    #[must_use]
    pub fn subscribe(&self) -> Subscription<Arc<TaskState>> {
        self.store.subscribe()
    }

    /// The underlying runtime store
    #[must_use]
    pub const fn store(&self) -> &TaskRuntime<A, N> {
        &self.store
    }

    fn dispatch(&self, action: TaskAction) -> EffectHandle {
        let name = action.name();
        self.store.send(action).unwrap_or_else(|error| {
            tracing::warn!(action = name, %error, "Task action rejected");
            EffectHandle::completed()
        })
    }
}

impl<A, N> Clone for TaskStore<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<A, N> std::fmt::Debug for TaskStore<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("lists", &self.snapshot().tasks.len())
            .finish_non_exhaustive()
    }
}
