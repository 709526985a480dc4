//! User-facing notifications.
//!
//! The center holds at most one notification: a new one replaces the
//! previous one, there is no queue.

use crate::environment::Notifier;
use serde::Serialize;
use std::sync::Arc;
use todolists_core::{DateTime, Utc, environment::Clock};
use todolists_runtime::Subscription;
use tokio::sync::watch;

const FEATURE: &str = "notifications";

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something worked
    Success,
    /// Something failed
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Severity
    pub severity: Severity,
    /// Text to show
    pub message: String,
    /// When it was raised
    pub raised_at: DateTime<Utc>,
}

/// Holder of the current notification
pub struct NotificationCenter {
    current: watch::Sender<Option<Notification>>,
    clock: Arc<dyn Clock>,
}

impl NotificationCenter {
    /// Create an empty center
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (current, _) = watch::channel(None);
        tracing::info!(feature = FEATURE, "Notification center initialised");
        Self { current, clock }
    }

    /// Replace the current notification with an error
    pub fn handle_error(&self, message: impl Into<String>) {
        self.raise(Severity::Error, message.into());
        tracing::error!(feature = FEATURE, "Error message added");
    }

    /// Replace the current notification with a success message
    pub fn handle_success(&self, message: impl Into<String>) {
        self.raise(Severity::Success, message.into());
        tracing::info!(feature = FEATURE, "Success message added");
    }

    /// Remove the current notification
    pub fn clear(&self) {
        self.current.send_replace(None);
        tracing::warn!(feature = FEATURE, "Notification cleared");
    }

    /// The current notification, if any
    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.current.borrow().clone()
    }

    /// Observe the current notification (replays the latest value first)
    #[must_use]
    pub fn subscribe(&self) -> Subscription<Option<Notification>> {
        Subscription::new(self.current.subscribe())
    }

    fn raise(&self, severity: Severity, message: String) {
        self.current.send_replace(Some(Notification {
            severity,
            message,
            raised_at: self.clock.now(),
        }));
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("current", &*self.current.borrow())
            .finish_non_exhaustive()
    }
}

impl Notifier for NotificationCenter {
    fn error(&self, message: &str) {
        self.handle_error(message);
    }

    fn success(&self, message: &str) {
        self.handle_success(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todolists_testing::test_clock;

    fn center() -> NotificationCenter {
        NotificationCenter::new(Arc::new(test_clock()))
    }

    #[test]
    fn test_starts_empty() {
        assert_eq!(center().current(), None);
    }

    #[test]
    fn test_keeps_only_most_recent() {
        let center = center();
        center.handle_error("first");
        center.handle_success("second");

        let current = center.current().unwrap();
        assert_eq!(current.severity, Severity::Success);
        assert_eq!(current.message, "second");
        assert_eq!(current.raised_at, test_clock().now());
    }

    #[test]
    fn test_clear() {
        let center = center();
        center.handle_error("boom");
        center.clear();
        assert_eq!(center.current(), None);
    }

    #[test]
    fn test_notifier_capability() {
        let center = center();
        Notifier::error(&center, "Network down");
        assert_eq!(center.current().unwrap().severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_subscription_replays_latest() {
        let center = center();
        center.handle_error("boom");

        let mut subscription = center.subscribe();
        assert_eq!(subscription.next().await.unwrap().unwrap().message, "boom");

        center.clear();
        assert_eq!(subscription.next().await.unwrap(), None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let center = center();
        center.handle_success("saved");
        let json = serde_json::to_value(center.current().unwrap()).unwrap();
        assert_eq!(json["severity"], "success");
        assert!(json.get("raisedAt").is_some());
    }
}
