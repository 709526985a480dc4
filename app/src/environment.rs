//! Shared environment for the feature reducers.
//!
//! Every store is built over the same environment: one API client, one
//! notifier and one fetch sequencer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use todolists_api::TodoApi;

/// User-facing notification sink.
///
/// Stores report failed requests here; the presentation layer decides how to
/// show them.
pub trait Notifier: Send + Sync {
    /// Report a failure
    fn error(&self, message: &str);

    /// Report a success
    ///
    /// The stores never call this; it is there for presentation code that
    /// confirms an action to the user.
    fn success(&self, message: &str);
}

/// Environment injected into the list, task and session reducers.
///
/// # Type Parameters
///
/// - `A`: Remote API
/// - `N`: Notifier
pub struct AppEnvironment<A, N>
where
    A: TodoApi,
    N: Notifier,
{
    /// Remote API.
    pub api: Arc<A>,

    /// Notification sink for failed requests.
    pub notifier: Arc<N>,

    /// Source of fetch request numbers, shared by every store.
    fetch_sequence: Arc<AtomicU64>,
}

impl<A, N> AppEnvironment<A, N>
where
    A: TodoApi,
    N: Notifier,
{
    /// Create an environment
    #[must_use]
    pub fn new(api: Arc<A>, notifier: Arc<N>) -> Self {
        Self {
            api,
            notifier,
            fetch_sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Allocate the next fetch request number.
    ///
    /// Numbers start at 1 and increase strictly, across every store sharing
    /// this environment.
    #[must_use]
    pub fn next_request(&self) -> u64 {
        self.fetch_sequence.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl<A, N> Clone for AppEnvironment<A, N>
where
    A: TodoApi,
    N: Notifier,
{
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            notifier: Arc::clone(&self.notifier),
            fetch_sequence: Arc::clone(&self.fetch_sequence),
        }
    }
}
