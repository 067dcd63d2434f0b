use std::sync::Arc;

use tokio::sync::broadcast;

pub mod controller;
pub mod history;
pub mod store;
pub mod transport;

pub use controller::{SubmissionController, SubmitError, SUBMISSION_FAILURE_MESSAGE};
pub use history::HistorySynchronizer;
pub use store::{ErrorOutcome, StateChange, SubmissionResult, ViewState, ViewStateStore};
pub use transport::{DreamTransport, HttpDreamTransport};

/// Client facade wiring the transport, the view state store, the history
/// synchronizer, and the submission controller together.
///
/// The rendering layer reads state through [`DreamClient::state`] and
/// observes committed changes through [`DreamClient::subscribe`]; it never
/// mutates state itself.
pub struct DreamClient {
    store: Arc<ViewStateStore>,
    history: Arc<HistorySynchronizer>,
    controller: SubmissionController,
}

impl DreamClient {
    /// Builds a client talking HTTP to the interpretation service at
    /// `server_url`.
    pub fn new(server_url: impl Into<String>) -> Arc<Self> {
        Self::with_transport(Arc::new(HttpDreamTransport::new(server_url)))
    }

    /// Builds a client over an injected transport.
    pub fn with_transport(transport: Arc<dyn DreamTransport>) -> Arc<Self> {
        let store = Arc::new(ViewStateStore::new());
        let history = Arc::new(HistorySynchronizer::new(
            Arc::clone(&transport),
            Arc::clone(&store),
        ));
        let controller =
            SubmissionController::new(transport, Arc::clone(&store), Arc::clone(&history));
        Arc::new(Self {
            store,
            history,
            controller,
        })
    }

    /// Submits a dream and awaits its settlement. The result is observable
    /// via [`DreamClient::state`] once this returns.
    pub async fn submit_dream(&self, text: &str) -> Result<(), SubmitError> {
        self.controller.submit_dream(text).await
    }

    /// Resynchronizes the history list. Called on mount and usable for
    /// manual refreshes; also triggered after each successful submission.
    pub async fn refresh_history(&self) {
        self.history.refresh().await;
    }

    pub async fn edit_draft(&self, text: impl Into<String>) {
        self.store.edit_draft(text).await;
    }

    pub async fn state(&self) -> ViewState {
        self.store.snapshot().await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.store.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
