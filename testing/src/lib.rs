//! # Todolists Testing
//!
//! Testing utilities for the todolists client.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`MockTodoApi`]: in-memory stand-in for the remote server, with failure
//!   and latency injection and call recording
//! - [`FixedClock`]: deterministic time
//!
//! ## Example
//!
//! ```ignore
//! use todolists_testing::{MockTodoApi, test_clock};
//!
//! #[tokio::test]
//! async fn test_fetch_lists() {
//!     let api = MockTodoApi::new().with_list("1", "Groceries");
//!     let app = App::with_api(api.clone(), test_clock());
//!
//!     app.lists().list().wait().await;
//!
//!     assert_eq!(app.lists().snapshot().lists.len(), 1);
//!     assert_eq!(api.calls(), vec![ApiCall::FetchLists]);
//! }
//! ```

use chrono::{DateTime, Utc};
use todolists_core::environment::Clock;

pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todolists_testing::mocks::FixedClock;
    /// use todolists_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

pub mod api;

/// Install a test subscriber so `RUST_LOG=debug cargo test` shows store logs
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use api::{ApiCall, ApiOperation, MockTodoApi};
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
