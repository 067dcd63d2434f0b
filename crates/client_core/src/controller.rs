use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    history::HistorySynchronizer,
    store::{ErrorOutcome, StateChange, ViewStateStore},
    transport::DreamTransport,
};

/// Fixed user-facing message for any submission failure. The underlying
/// cause goes to the log and is never distinguished to the user.
pub const SUBMISSION_FAILURE_MESSAGE: &str = "Failed to fetch interpretation. Try again.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    AlreadyInFlight,
}

/// Drives one submission lifecycle: Idle -> Submitting -> Settled.
///
/// Settled is not a retained state; the next call re-enters Submitting
/// directly, overwriting the previous result.
pub struct SubmissionController {
    transport: Arc<dyn DreamTransport>,
    store: Arc<ViewStateStore>,
    history: Arc<HistorySynchronizer>,
    in_flight: AtomicBool,
}

impl SubmissionController {
    pub fn new(
        transport: Arc<dyn DreamTransport>,
        store: Arc<ViewStateStore>,
        history: Arc<HistorySynchronizer>,
    ) -> Self {
        Self {
            transport,
            store,
            history,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submits the text exactly as given (no trimming, no validation; empty
    /// text is submitted too). Settlement lands in the store as
    /// `last_result`; on success a history refresh is triggered without
    /// being awaited.
    ///
    /// At most one submission may be in flight: a call while one is
    /// outstanding is rejected without touching state.
    pub async fn submit_dream(&self, text: &str) -> Result<(), SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::AlreadyInFlight);
        }

        self.store.apply(StateChange::SubmissionStarted).await;

        match self.transport.submit(text).await {
            Ok(outcome) => {
                info!(
                    emotion = %outcome.emotion,
                    confidence = outcome.confidence,
                    "submit: interpretation received"
                );
                self.store
                    .apply(StateChange::SubmissionSucceeded(outcome))
                    .await;

                // The result write above strictly precedes the trigger;
                // submission does not wait for the refresh to settle.
                let history = Arc::clone(&self.history);
                tokio::spawn(async move {
                    history.refresh().await;
                });
            }
            Err(err) => {
                warn!(error = %err, "submit: request failed");
                self.store
                    .apply(StateChange::SubmissionFailed(ErrorOutcome {
                        message: SUBMISSION_FAILURE_MESSAGE.to_string(),
                    }))
                    .await;
            }
        }

        self.in_flight.store(false, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
