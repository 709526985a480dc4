//! Request effects.
//!
//! Every remote call made by a store goes through [`Request`]: it logs the
//! start and the result inside one tracing span, reports failures to the
//! notifier, and turns the result into an action for the reducer. Stores never
//! see a raw `Result`; a failure arrives as a failure action that leaves state
//! untouched.

use crate::environment::Notifier;
use std::future::Future;
use std::sync::Arc;
use todolists_api::ApiError;
use todolists_core::effect::Effect;
use tracing::Instrument;

/// A single remote call, described as an effect.
///
/// ```ignore
/// let span = tracing::info_span!("request", feature = "lists", operation = "create", %title);
/// Request::new(span, Arc::clone(&env.notifier)).run(
///     async move { api.create_list(&title).await },
///     |list| ListAction::Created { list },
///     move |error| ListAction::CreateFailed { title, error },
/// )
/// ```
pub struct Request<N: Notifier> {
    span: tracing::Span,
    notifier: Arc<N>,
    notify_rejections: bool,
}

impl<N: Notifier + 'static> Request<N> {
    /// Describe a request logged under `span`
    #[must_use]
    pub const fn new(span: tracing::Span, notifier: Arc<N>) -> Self {
        Self {
            span,
            notifier,
            notify_rejections: true,
        }
    }

    /// Only notify transport failures
    ///
    /// Application rejections are still logged. Used for calls whose
    /// rejection is an expected answer, such as `me` without a session.
    #[must_use]
    pub const fn quiet_rejections(mut self) -> Self {
        self.notify_rejections = false;
        self
    }

    /// Build the effect
    ///
    /// The effect resolves to `on_success(value)` or `on_error(error)`; it
    /// never retries.
    pub fn run<A, T, Fut, S, F>(self, call: Fut, on_success: S, on_error: F) -> Effect<A>
    where
        A: Send + 'static,
        T: Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
        S: FnOnce(T) -> A + Send + 'static,
        F: FnOnce(ApiError) -> A + Send + 'static,
    {
        let Self {
            span,
            notifier,
            notify_rejections,
        } = self;

        span.in_scope(|| tracing::info!("Request sent"));

        Effect::future(
            async move {
                match call.await {
                    Ok(value) => {
                        tracing::info!("Request succeeded");
                        Some(on_success(value))
                    },
                    Err(error) => {
                        report_failure(&error, notifier.as_ref(), notify_rejections);
                        Some(on_error(error))
                    },
                }
            }
            .instrument(span),
        )
    }
}

fn report_failure<N: Notifier>(error: &ApiError, notifier: &N, notify_rejections: bool) {
    if error.is_transport() {
        tracing::error!(%error, "Request failed");
        notifier.error(&error.user_message());
    } else {
        tracing::error!(%error, "Request rejected");
        if notify_rejections {
            notifier.error(&error.user_message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{NotificationCenter, Severity};
    use todolists_testing::test_clock;

    #[derive(Debug, PartialEq)]
    enum Outcome {
        Done(u32),
        Failed(ApiError),
    }

    fn center() -> Arc<NotificationCenter> {
        Arc::new(NotificationCenter::new(Arc::new(test_clock())))
    }

    #[allow(clippy::panic)] // Test helper
    async fn resolve(effect: Effect<Outcome>) -> Option<Outcome> {
        match effect {
            Effect::Future(fut) => fut.await,
            other => panic!("expected a future effect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_maps_value_without_notifying() {
        let notifications = center();
        let effect = Request::new(tracing::info_span!("test"), Arc::clone(&notifications)).run(
            async { Ok(7) },
            Outcome::Done,
            Outcome::Failed,
        );

        assert_eq!(resolve(effect).await, Some(Outcome::Done(7)));
        assert_eq!(notifications.current(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_is_notified() {
        let notifications = center();
        let error = ApiError::Transport("connection refused".to_string());
        let effect = Request::new(tracing::info_span!("test"), Arc::clone(&notifications))
            .quiet_rejections()
            .run(
                {
                    let error = error.clone();
                    async move { Err::<u32, _>(error) }
                },
                Outcome::Done,
                Outcome::Failed,
            );

        assert_eq!(resolve(effect).await, Some(Outcome::Failed(error.clone())));

        let notification = notifications.current().unwrap();
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.message, error.user_message());
    }

    #[tokio::test]
    async fn test_rejection_notifies_first_server_message() {
        let notifications = center();
        let effect = Request::new(tracing::info_span!("test"), Arc::clone(&notifications)).run(
            async {
                Err::<u32, _>(ApiError::Rejected {
                    result_code: 1,
                    messages: vec!["Title is too long".to_string()],
                })
            },
            Outcome::Done,
            Outcome::Failed,
        );

        let _ = resolve(effect).await;
        assert_eq!(notifications.current().unwrap().message, "Title is too long");
    }

    #[tokio::test]
    async fn test_quiet_rejection_is_not_notified() {
        let notifications = center();
        let effect = Request::new(tracing::info_span!("test"), Arc::clone(&notifications))
            .quiet_rejections()
            .run(
                async {
                    Err::<u32, _>(ApiError::Rejected {
                        result_code: 1,
                        messages: vec!["You are not authorized".to_string()],
                    })
                },
                Outcome::Done,
                Outcome::Failed,
            );

        assert!(matches!(resolve(effect).await, Some(Outcome::Failed(_))));
        assert_eq!(notifications.current(), None);
    }
}
