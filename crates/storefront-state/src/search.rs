//! # Debounced Search
//!
//! Search boxes push every keystroke here; a query is emitted only after
//! the input has been quiet for the configured interval.
//!
//! ## Timeline
//! ```text
//! input:   s──sh──sho──shoe·····························
//!          │   │   │    │
//! timer:   ✗   ✗   ✗    └──────── 1000 ms ────────► emit("shoe")
//!
//! Each push aborts the pending timer task and spawns a fresh one.
//! ```

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::config::StorefrontConfig;
use crate::error::{StateError, StateResult};

/// Receiving end for settled queries.
pub type SearchReceiver = mpsc::UnboundedReceiver<String>;

/// A cancellable timer that forwards the last input after a quiet interval.
///
/// Dropping the debouncer cancels any pending emission.
pub struct DebouncedSearch {
    delay: Duration,
    runtime: Handle,
    tx: mpsc::UnboundedSender<String>,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedSearch {
    /// Creates a debouncer and the receiver its queries arrive on.
    ///
    /// ## Errors
    /// `NoRuntime` when called outside a tokio runtime.
    pub fn new(delay: Duration) -> StateResult<(Self, SearchReceiver)> {
        let runtime = Handle::try_current().map_err(|e| StateError::NoRuntime(e.to_string()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok((
            DebouncedSearch {
                delay,
                runtime,
                tx,
                pending: None,
            },
            rx,
        ))
    }

    pub fn from_config(config: &StorefrontConfig) -> StateResult<(Self, SearchReceiver)> {
        Self::new(config.search_debounce())
    }

    /// Records a new input value, restarting the quiet interval.
    pub fn push(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.cancel();

        trace!(%value, "search input");
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(query = %value, "search settled");
            // Receiver gone means the page is gone; nothing to do.
            let _ = tx.send(value);
        }));
    }

    /// Drops the pending input without emitting it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while an input is waiting out the quiet interval.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    const DELAY: Duration = Duration::from_millis(1000);

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_last_value() {
        let (mut search, mut rx) = DebouncedSearch::new(DELAY).unwrap();

        search.push("s");
        sleep(Duration::from_millis(300)).await;
        search.push("sh");
        sleep(Duration::from_millis(300)).await;
        search.push("shoe");

        sleep(Duration::from_millis(999)).await;
        assert!(rx.try_recv().is_err());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await.as_deref(), Some("shoe"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_inputs_each_emit() {
        let (mut search, mut rx) = DebouncedSearch::new(DELAY).unwrap();

        search.push("hat");
        sleep(Duration::from_millis(1500)).await;
        search.push("scarf");
        sleep(Duration::from_millis(1500)).await;

        assert_eq!(rx.try_recv().as_deref(), Ok("hat"));
        assert_eq!(rx.try_recv().as_deref(), Ok("scarf"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_suppress_emission() {
        let (mut search, mut rx) = DebouncedSearch::new(DELAY).unwrap();

        search.push("mug");
        assert!(search.is_pending());
        search.cancel();
        assert!(!search.is_pending());
        sleep(Duration::from_millis(2000)).await;
        assert!(rx.try_recv().is_err());

        search.push("cup");
        drop(search);
        sleep(Duration::from_millis(2000)).await;
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_requires_runtime() {
        let err = DebouncedSearch::new(DELAY).err().unwrap();
        assert!(matches!(err, StateError::NoRuntime(_)));
    }
}
