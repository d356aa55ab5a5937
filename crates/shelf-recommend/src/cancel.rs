//! Cooperative cancellation for the fallback cascade.
//!
//! A caller that abandons a request (navigated away, disconnected) cancels
//! via the handle; every in-flight attempt observes the token at its await
//! points and stops without updating state or advancing tiers.

use tokio::sync::watch;

/// Sending half: cancels all associated tokens.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Receiving half: observed by cascade attempts.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Creates a connected handle/token pair.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelHandle {
    /// Signals cancellation to every associated token.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl CancelToken {
    /// Returns a token that is never cancelled (the handle side does not
    /// exist). For callers that have no abandonment signal to propagate.
    #[must_use]
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        // Closed channel reads as "never cancelled" in `cancelled`.
        drop(tx);
        Self { rx }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when cancellation is signalled; pends forever if the handle
    /// is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Handle dropped without cancelling: never resolves.
                std::future::pending::<()>().await;
            }
        }
    }
}
