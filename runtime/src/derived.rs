//! Derived views computed from two published sources

use crate::Subscription;
use tokio::sync::watch;

/// Combine two sources into a derived subscription
///
/// `project` runs once immediately and again whenever either source
/// publishes. The derived value is republished only when it changed, so
/// observers are not woken by unrelated updates. The background task stops
/// when both sources are gone or every derived subscriber is dropped.
///
/// # Panics
///
/// Requires a running tokio runtime.
pub fn combine<L, R, T, F>(
    mut left: watch::Receiver<L>,
    mut right: watch::Receiver<R>,
    project: F,
) -> Subscription<T>
where
    L: Send + Sync + 'static,
    R: Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(&L, &R) -> T + Send + 'static,
{
    let initial = project(&left.borrow_and_update(), &right.borrow_and_update());
    let (tx, rx) = watch::channel(initial);

    tokio::spawn(async move {
        let mut left_open = true;
        let mut right_open = true;

        while left_open || right_open {
            tokio::select! {
                changed = left.changed(), if left_open => {
                    if changed.is_err() {
                        left_open = false;
                        continue;
                    }
                },
                changed = right.changed(), if right_open => {
                    if changed.is_err() {
                        right_open = false;
                        continue;
                    }
                },
                () = tx.closed() => break,
            }

            let next = project(&left.borrow_and_update(), &right.borrow_and_update());
            let republished = tx.send_if_modified(|current| {
                if *current == next {
                    false
                } else {
                    *current = next;
                    true
                }
            });

            if republished {
                tracing::trace!("Derived view recomputed");
            }
        }

        tracing::trace!("Derived view task finished");
    });

    Subscription::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_combine_recomputes_on_either_source() {
        let (left_tx, left_rx) = watch::channel(1);
        let (right_tx, right_rx) = watch::channel(10);

        let mut sum = combine(left_rx, right_rx, |l: &i32, r: &i32| l + r);
        assert_eq!(sum.next().await, Some(11));

        left_tx.send_replace(2);
        assert_eq!(sum.next().await, Some(12));

        right_tx.send_replace(20);
        assert_eq!(sum.next().await, Some(22));
    }

    #[tokio::test]
    async fn test_combine_skips_unchanged_projection() {
        let (left_tx, left_rx) = watch::channel(1);
        let (_right_tx, right_rx) = watch::channel(0);

        let mut parity = combine(left_rx, right_rx, |l: &i32, _: &i32| l % 2);
        assert_eq!(parity.next().await, Some(1));

        // 3 has the same parity as 1, nothing is republished
        left_tx.send_replace(3);
        let waited = tokio::time::timeout(Duration::from_millis(50), parity.next()).await;
        assert!(waited.is_err());

        left_tx.send_replace(4);
        assert_eq!(parity.next().await, Some(0));
    }
}
