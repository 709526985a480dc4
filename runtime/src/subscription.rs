//! Read-only subscriptions with last-value replay

use tokio::sync::watch;

/// A read-only view over a published value
///
/// The first call to [`Subscription::next`] yields the value current at
/// subscription time, so late subscribers never miss the latest snapshot.
/// Later calls wait for the next published value. Intermediate values
/// published between two calls are skipped; only the latest is observed.
#[derive(Debug, Clone)]
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
    replayed: bool,
}

impl<T: Clone> Subscription<T> {
    /// Wrap a watch receiver
    #[must_use]
    pub const fn new(rx: watch::Receiver<T>) -> Self {
        Self {
            rx,
            replayed: false,
        }
    }

    /// The latest published value, without waiting
    #[must_use]
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next value
    ///
    /// Returns `None` once the publisher is gone and no unseen value remains.
    pub async fn next(&mut self) -> Option<T> {
        if !self.replayed {
            self.replayed = true;
            return Some(self.rx.borrow_and_update().clone());
        }

        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the published value satisfies `predicate`
    ///
    /// Checks the current value first.
    ///
    /// # Errors
    ///
    /// Returns the channel error if the publisher is dropped first.
    pub async fn wait_for<F>(&mut self, predicate: F) -> Result<T, watch::error::RecvError>
    where
        F: FnMut(&T) -> bool,
    {
        self.replayed = true;
        let value = self.rx.wait_for(predicate).await?;
        Ok(value.clone())
    }

    /// Give back the underlying receiver
    #[must_use]
    pub fn into_receiver(self) -> watch::Receiver<T> {
        self.rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_next_replays_then_waits() {
        let (tx, rx) = watch::channel(1);
        let mut subscription = Subscription::new(rx);

        assert_eq!(subscription.next().await, Some(1));

        tx.send_replace(2);
        assert_eq!(subscription.next().await, Some(2));
    }

    #[tokio::test]
    async fn test_next_ends_when_publisher_dropped() {
        let (tx, rx) = watch::channel(1);
        let mut subscription = Subscription::new(rx);
        assert_eq!(subscription.next().await, Some(1));

        drop(tx);
        assert_eq!(subscription.next().await, None);
    }

    #[tokio::test]
    async fn test_only_latest_value_is_observed() {
        let (tx, rx) = watch::channel(0);
        let mut subscription = Subscription::new(rx);
        let _ = subscription.next().await;

        tx.send_replace(1);
        tx.send_replace(2);
        assert_eq!(subscription.next().await, Some(2));
        assert_eq!(subscription.current(), 2);
    }

    #[tokio::test]
    async fn test_wait_for_checks_current_value() {
        let (_tx, rx) = watch::channel(5);
        let mut subscription = Subscription::new(rx);

        assert_eq!(subscription.wait_for(|v| *v == 5).await.unwrap(), 5);
    }
}
