//! Domain types for the session store.

use todolists_api::{ApiError, LoginRequest, MeResponse};
use todolists_macros::Action;

/// State of the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Whether the server accepted the current session
    pub is_authenticated: bool,
    /// Whether the first `me` check has finished, whatever its outcome
    pub auth_resolved: bool,
    /// Profile of the signed-in user, known after a successful `me`
    pub user: Option<MeResponse>,
}

impl SessionState {
    /// Creates an unresolved, unauthenticated session
    #[must_use]
    pub const fn new() -> Self {
        Self {
            is_authenticated: false,
            auth_resolved: false,
            user: None,
        }
    }
}

/// Actions for the session store
#[derive(Action, Clone, Debug, PartialEq)]
pub enum SessionAction {
    // Login
    /// Sign in
    Login {
        /// Credentials
        request: LoginRequest,
    },

    /// Signed in
    LoggedIn {
        /// Id of the signed-in user
        user_id: u64,
    },

    /// Sign-in failed or was rejected
    LoginFailed {
        /// Cause
        error: ApiError,
    },

    // Logout
    /// Sign out
    Logout,

    /// Signed out
    LoggedOut,

    /// Sign-out failed; the session is kept
    LogoutFailed {
        /// Cause
        error: ApiError,
    },

    // Me
    /// Ask the server who is signed in
    Me,

    /// Session confirmed
    MeLoaded {
        /// Profile of the signed-in user
        user: MeResponse,
    },

    /// No session, or the server could not be reached
    MeFailed {
        /// Cause
        error: ApiError,
    },
}
