//! Cooperative cancellation of an in-flight invocation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Stop signal shared between the caller (e.g. a Ctrl-C handler) and the
/// pending call. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    token: CancellationToken,
    fired: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call any number of times; only the
    /// first call cancels, and only that call returns `true`.
    pub fn stop(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        tracing::debug!("stop requested");
        self.token.cancel();
        true
    }

    pub fn is_stopped(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Resolves once [`StopSignal::stop`] has been called.
    pub async fn stopped(&self) {
        self.token.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn stop_is_idempotent() {
        let stop = StopSignal::new();
        assert!(!stop.is_stopped());
        assert!(stop.stop());
        assert!(!stop.stop());
        assert!(stop.is_stopped());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let stop = StopSignal::new();
        let remote = stop.clone();
        let waiter = tokio::spawn(async move { remote.stopped().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(stop.stop());
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
