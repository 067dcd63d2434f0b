use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{store::StateChange, transport::DreamTransport, ViewStateStore};

/// Keeps the view's history list aligned with the history store.
pub struct HistorySynchronizer {
    transport: Arc<dyn DreamTransport>,
    store: Arc<ViewStateStore>,
    issued: AtomicU64,
    applied: Mutex<u64>,
}

impl HistorySynchronizer {
    pub fn new(transport: Arc<dyn DreamTransport>, store: Arc<ViewStateStore>) -> Self {
        Self {
            transport,
            store,
            issued: AtomicU64::new(0),
            applied: Mutex::new(0),
        }
    }

    /// Fetches the full history and republishes it most-recent-first.
    ///
    /// A failed fetch is logged and leaves the prior list in place; nothing
    /// is surfaced in UI-visible state. When refreshes overlap, a response
    /// for an older fetch never overwrites one for a newer fetch: results
    /// apply only while their issue number exceeds the highest applied.
    pub async fn refresh(&self) {
        let seq = self.issued.fetch_add(1, Ordering::Relaxed) + 1;

        let mut records = match self.transport.fetch_history().await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "history: fetch failed; keeping previous list");
                return;
            }
        };

        let mut applied = self.applied.lock().await;
        if seq <= *applied {
            debug!(seq, applied = *applied, "history: discarding stale response");
            return;
        }
        *applied = seq;

        // The service stores oldest-first; the view wants the latest on top.
        records.reverse();
        self.store.apply(StateChange::HistoryLoaded(records)).await;
    }
}

#[cfg(test)]
#[path = "tests/history_tests.rs"]
mod tests;
