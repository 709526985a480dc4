//! Public facade of the session store.

use super::reducer::{FEATURE, SessionReducer};
use super::types::{SessionAction, SessionState};
use crate::environment::{AppEnvironment, Notifier};
use std::sync::Arc;
use todolists_api::{LoginRequest, TodoApi};
use todolists_runtime::{EffectHandle, Store, Subscription};

/// Runtime store specialised for the session
pub type SessionRuntime<A, N> =
    Store<SessionState, SessionAction, AppEnvironment<A, N>, SessionReducer<A, N>>;

/// Authentication state of the client
pub struct SessionStore<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    store: SessionRuntime<A, N>,
}

impl<A, N> SessionStore<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    /// Create an unresolved session
    #[must_use]
    pub fn new(environment: AppEnvironment<A, N>) -> Self {
        Self {
            store: Store::new(SessionState::new(), SessionReducer::new(), environment),
        }
    }

    /// Sign in
    #[tracing::instrument(skip(self), fields(feature = FEATURE))]
    pub fn login(&self, request: LoginRequest) -> EffectHandle {
        tracing::info!("Login request sent");
        self.dispatch(SessionAction::Login { request })
    }

    /// Sign out
    #[tracing::instrument(skip(self), fields(feature = FEATURE))]
    pub fn logout(&self) -> EffectHandle {
        tracing::info!("Logout request sent");
        self.dispatch(SessionAction::Logout)
    }

    /// Check the current session with the server
    ///
    /// Resolves [`SessionStore::auth_resolved`] whatever the answer.
    #[tracing::instrument(skip(self), fields(feature = FEATURE))]
    pub fn me(&self) -> EffectHandle {
        tracing::info!("me request sent");
        self.dispatch(SessionAction::Me)
    }

    /// Whether the session is currently authenticated
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.state(|state| state.is_authenticated)
    }

    /// Wait until the first `me` check has finished
    ///
    /// Returns immediately once resolved. The result is whether the session
    /// is authenticated at that point.
    pub async fn auth_resolved(&self) -> bool {
        let mut subscription = self.store.subscribe();
        match subscription.wait_for(|state| state.auth_resolved).await {
            Ok(state) => state.is_authenticated,
            // The store owns the sender, so it outlives this borrow
            Err(_) => self.is_authenticated(),
        }
    }

    /// The currently published snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<SessionState> {
        self.store.snapshot()
    }

    /// Observe the session (replays the current snapshot first)
    #[must_use]
    pub fn subscribe(&self) -> Subscription<Arc<SessionState>> {
        self.store.subscribe()
    }

    /// The underlying runtime store
    #[must_use]
    pub const fn store(&self) -> &SessionRuntime<A, N> {
        &self.store
    }

    fn dispatch(&self, action: SessionAction) -> EffectHandle {
        let name = action.name();
        self.store.send(action).unwrap_or_else(|error| {
            tracing::warn!(action = name, %error, "Session action rejected");
            EffectHandle::completed()
        })
    }
}

impl<A, N> Clone for SessionStore<A, N>
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

impl<A, N> std::fmt::Debug for SessionStore<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.snapshot())
            .finish_non_exhaustive()
    }
}
