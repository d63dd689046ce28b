//! Fetch Orchestration
//!
//! Bridges the async provider call and the synchronous event loop. One
//! spawned task per acquisition attempt; its settlement comes back over an
//! mpsc channel and is drained non-blocking each frame. The state machine in
//! [`crate::state`] guarantees at most one task is ever in flight.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::provider::{FetchOutcome, TimelineProvider};

/// Drives acquisition attempts against the injected provider
pub struct Fetcher {
    provider: Arc<dyn TimelineProvider>,
    tx: mpsc::Sender<FetchOutcome>,
    rx: mpsc::Receiver<FetchOutcome>,
}

impl Fetcher {
    /// Create a fetcher for the given provider
    pub fn new(provider: Arc<dyn TimelineProvider>) -> Self {
        let (tx, rx) = mpsc::channel(4);
        Self { provider, tx, rx }
    }

    /// Spawn one acquisition attempt.
    ///
    /// The task always runs to completion; the settlement (success or
    /// failure) is delivered through the channel. Callers gate this behind
    /// `AppState::begin_load` so attempts are never concurrent.
    pub fn spawn(&self) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            tracing::info!(provider = provider.name(), "acquisition started");
            let outcome = provider.request_timeline().await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(outcome).await;
        });
    }

    /// Take a settled outcome if one is pending (non-blocking)
    pub fn try_settle(&mut self) -> Option<FetchOutcome> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next settlement (used by tests)
    pub async fn settled(&mut self) -> Option<FetchOutcome> {
        self.rx.recv().await
    }
}
