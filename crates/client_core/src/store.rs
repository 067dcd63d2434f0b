//! Observable view state and the closed set of mutations that may touch it.

use shared::{domain::DreamRecord, protocol::InterpretationOutcome};
use tokio::sync::{broadcast, Mutex};

const STATE_CHANGE_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorOutcome {
    pub message: String,
}

/// Terminal result of one submission lifecycle. Exactly one side is ever
/// populated.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    Interpreted(InterpretationOutcome),
    Failed(ErrorOutcome),
}

/// Everything the rendering layer can observe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Current draft text, user-controlled.
    pub draft: String,
    /// Settlement of the most recent submission, if any.
    pub last_result: Option<SubmissionResult>,
    /// True strictly between submission start and settlement.
    pub busy: bool,
    /// Recorded dreams, most recently created first.
    pub history: Vec<DreamRecord>,
}

/// The only messages that mutate [`ViewState`]. All writes flow through
/// [`reduce`]; there are no ad-hoc writers.
#[derive(Debug, Clone)]
pub enum StateChange {
    DraftEdited(String),
    SubmissionStarted,
    SubmissionSucceeded(InterpretationOutcome),
    SubmissionFailed(ErrorOutcome),
    HistoryLoaded(Vec<DreamRecord>),
}

fn reduce(state: &mut ViewState, change: &StateChange) {
    match change {
        StateChange::DraftEdited(text) => {
            state.draft = text.clone();
        }
        StateChange::SubmissionStarted => {
            state.busy = true;
            state.last_result = None;
        }
        StateChange::SubmissionSucceeded(outcome) => {
            state.last_result = Some(SubmissionResult::Interpreted(outcome.clone()));
            state.busy = false;
        }
        StateChange::SubmissionFailed(error) => {
            state.last_result = Some(SubmissionResult::Failed(error.clone()));
            state.busy = false;
        }
        StateChange::HistoryLoaded(records) => {
            state.history = records.clone();
        }
    }
}

/// Holder for the single shared [`ViewState`].
///
/// Writers are the submission controller and the history synchronizer,
/// plus [`ViewStateStore::edit_draft`] on behalf of the user. Subscribers
/// (the rendering layer) receive every committed change in commit order.
pub struct ViewStateStore {
    state: Mutex<ViewState>,
    changes: broadcast::Sender<StateChange>,
}

impl ViewStateStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(STATE_CHANGE_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(ViewState::default()),
            changes,
        }
    }

    pub(crate) async fn apply(&self, change: StateChange) {
        let mut state = self.state.lock().await;
        reduce(&mut state, &change);
        // Notified under the lock so subscribers observe changes in commit
        // order. Send failure means no receivers; state is already committed.
        let _ = self.changes.send(change);
    }

    pub async fn edit_draft(&self, text: impl Into<String>) {
        self.apply(StateChange::DraftEdited(text.into())).await;
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }
}

impl Default for ViewStateStore {
    fn default() -> Self {
        Self::new()
    }
}
