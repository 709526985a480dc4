//! Public facade of the list store.

use super::reducer::{FEATURE, ListReducer};
use super::types::{Filter, ListAction, ListState};
use crate::environment::{AppEnvironment, Notifier};
use std::sync::Arc;
use todolists_api::TodoApi;
use todolists_runtime::{EffectHandle, Store, Subscription};

/// Runtime store specialised for lists
pub type ListRuntime<A, N> = Store<ListState, ListAction, AppEnvironment<A, N>, ListReducer<A, N>>;

/// Cache of the user's lists
///
/// Every method returns as soon as the request is started. The returned
/// handle resolves once the result has been applied (or discarded); callers
/// are free to drop it.
pub struct ListStore<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    store: ListRuntime<A, N>,
}

impl<A, N> ListStore<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    /// Create an empty store
    #[must_use]
    pub fn new(environment: AppEnvironment<A, N>) -> Self {
        Self {
            store: Store::new(ListState::new(), ListReducer::new(), environment),
        }
    }

    /// Fetch every list, replacing the cache
    #[tracing::instrument(skip(self), fields(feature = FEATURE))]
    pub fn list(&self) -> EffectHandle {
        tracing::info!("Lists data requested");
        self.dispatch(ListAction::Fetch)
    }

    /// Create a list and prepend it
    #[tracing::instrument(skip(self, title), fields(feature = FEATURE))]
    pub fn create(&self, title: impl Into<String>) -> EffectHandle {
        tracing::info!("Add list request initialised");
        self.dispatch(ListAction::Create {
            title: title.into(),
        })
    }

    /// Delete a list
    #[tracing::instrument(skip(self, id), fields(feature = FEATURE))]
    pub fn delete(&self, id: impl Into<String>) -> EffectHandle {
        tracing::info!("Delete list request initialised");
        self.dispatch(ListAction::Delete { id: id.into() })
    }

    /// Rename a list
    #[tracing::instrument(skip(self, id, title), fields(feature = FEATURE))]
    pub fn rename(&self, id: impl Into<String>, title: impl Into<String>) -> EffectHandle {
        tracing::info!("Update list title request initialised");
        self.dispatch(ListAction::Rename {
            id: id.into(),
            title: title.into(),
        })
    }

    /// Change the display filter of a list
    ///
    /// Applied synchronously; no request is made.
    #[tracing::instrument(skip(self, id), fields(feature = FEATURE))]
    pub fn set_filter(&self, id: impl Into<String>, filter: Filter) {
        let _ = self.dispatch(ListAction::SetFilter {
            id: id.into(),
            filter,
        });
    }

    /// The currently published snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<ListState> {
        self.store.snapshot()
    }

    /// Observe the cache (replays the current snapshot first)
    #[must_use]
    pub fn subscribe(&self) -> Subscription<Arc<ListState>> {
        self.store.subscribe()
    }

    /// The underlying runtime store
    #[must_use]
    pub const fn store(&self) -> &ListRuntime<A, N> {
        &self.store
    }

    fn dispatch(&self, action: ListAction) -> EffectHandle {
        let name = action.name();
        self.store.send(action).unwrap_or_else(|error| {
            tracing::warn!(action = name, %error, "List action rejected");
            EffectHandle::completed()
        })
    }
}

impl<A, N> Clone for ListStore<A, N>
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

impl<A, N> std::fmt::Debug for ListStore<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListStore")
            .field("lists", &self.snapshot().lists.len())
            .finish_non_exhaustive()
    }
}
