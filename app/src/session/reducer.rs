//! Reducer logic for the session store.

use super::types::{SessionAction, SessionState};
use crate::effects::Request;
use crate::environment::{AppEnvironment, Notifier};
use std::marker::PhantomData;
use std::sync::Arc;
use todolists_api::TodoApi;
use todolists_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Tag carried by every log line of the session store
pub const FEATURE: &str = "session";

/// Reducer for the session store
pub struct SessionReducer<A, N> {
    _environment: PhantomData<fn() -> (A, N)>,
}

impl<A, N> SessionReducer<A, N> {
    /// Creates a new `SessionReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _environment: PhantomData,
        }
    }
}

impl<A, N> Default for SessionReducer<A, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, N> Clone for SessionReducer<A, N> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<A, N> std::fmt::Debug for SessionReducer<A, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionReducer")
    }
}

impl<A, N> Reducer for SessionReducer<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    type State = SessionState;
    type Action = SessionAction;
    type Environment = AppEnvironment<A, N>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let notifier = Arc::clone(&env.notifier);
        let api = Arc::clone(&env.api);

        match action {
            // ========== Intents ==========
            SessionAction::Login { request } => {
                let span = tracing::info_span!(
                    "request",
                    feature = FEATURE,
                    operation = "login",
                    email = %request.email
                );

                smallvec![Request::new(span, notifier).run(
                    async move { api.login(&request).await },
                    |user_id| SessionAction::LoggedIn { user_id },
                    |error| SessionAction::LoginFailed { error },
                )]
            },

            // A rejected logout keeps the session without bothering the user
            SessionAction::Logout => {
                let span = tracing::info_span!("request", feature = FEATURE, operation = "logout");

                smallvec![Request::new(span, notifier).quiet_rejections().run(
                    async move { api.logout().await },
                    |()| SessionAction::LoggedOut,
                    |error| SessionAction::LogoutFailed { error },
                )]
            },

            // Being signed out is an expected answer, not an error to show
            SessionAction::Me => {
                let span = tracing::info_span!("request", feature = FEATURE, operation = "me");

                smallvec![Request::new(span, notifier).quiet_rejections().run(
                    async move { api.me().await },
                    |user| SessionAction::MeLoaded { user },
                    |error| SessionAction::MeFailed { error },
                )]
            },

            // ========== Outcomes ==========
            SessionAction::LoggedIn { user_id } => {
                state.is_authenticated = true;
                tracing::info!(feature = FEATURE, user_id, "Login successful");
                SmallVec::new()
            },

            SessionAction::LoggedOut => {
                state.is_authenticated = false;
                state.user = None;
                tracing::info!(feature = FEATURE, "Logout successful");
                SmallVec::new()
            },

            SessionAction::MeLoaded { user } => {
                tracing::info!(feature = FEATURE, login = %user.login, "Session confirmed");
                state.is_authenticated = true;
                state.user = Some(user);
                state.auth_resolved = true;
                SmallVec::new()
            },

            SessionAction::MeFailed { .. } => {
                state.auth_resolved = true;
                SmallVec::new()
            },

            SessionAction::LoginFailed { .. } | SessionAction::LogoutFailed { .. } => SmallVec::new(),
        }
    }
}
