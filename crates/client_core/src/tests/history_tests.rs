use super::*;
use std::collections::VecDeque;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{domain::DreamRecord, protocol::InterpretationOutcome};
use tokio::sync::{oneshot, Mutex as ResponseMutex};

/// Transport whose history responses resolve only when the test says so,
/// in whatever order the test chooses.
struct ScriptedHistoryTransport {
    responses: ResponseMutex<VecDeque<oneshot::Receiver<Result<Vec<DreamRecord>>>>>,
}

impl ScriptedHistoryTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: ResponseMutex::new(VecDeque::new()),
        })
    }

    async fn script(&self) -> oneshot::Sender<Result<Vec<DreamRecord>>> {
        let (tx, rx) = oneshot::channel();
        self.responses.lock().await.push_back(rx);
        tx
    }
}

#[async_trait]
impl DreamTransport for ScriptedHistoryTransport {
    async fn submit(&self, _dream_text: &str) -> Result<InterpretationOutcome> {
        Err(anyhow!("submission is not under test"))
    }

    async fn fetch_history(&self) -> Result<Vec<DreamRecord>> {
        let response = self.responses.lock().await.pop_front();
        match response {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(anyhow!("scripted response dropped"))),
            None => Err(anyhow!("no scripted response")),
        }
    }
}

fn record(text: &str) -> DreamRecord {
    DreamRecord {
        dream_text: text.to_string(),
        interpretation: format!("meaning of {text}"),
        emotion: "calm".to_string(),
        confidence: 0.42,
    }
}

fn synchronizer_with(
    transport: &Arc<ScriptedHistoryTransport>,
) -> (Arc<HistorySynchronizer>, Arc<ViewStateStore>) {
    let transport: Arc<dyn DreamTransport> = Arc::clone(transport);
    let store = Arc::new(ViewStateStore::new());
    let synchronizer = Arc::new(HistorySynchronizer::new(transport, Arc::clone(&store)));
    (synchronizer, store)
}

#[tokio::test]
async fn publishes_history_reversed_to_most_recent_first() {
    let transport = ScriptedHistoryTransport::new();
    let (synchronizer, store) = synchronizer_with(&transport);

    let response = transport.script().await;
    let _ = response.send(Ok(vec![record("A"), record("B")]));
    synchronizer.refresh().await;

    let history = store.snapshot().await.history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].dream_text, "B");
    assert_eq!(history[1].dream_text, "A");

    // Same backing list again: the published value is identical.
    let response = transport.script().await;
    let _ = response.send(Ok(vec![record("A"), record("B")]));
    synchronizer.refresh().await;
    assert_eq!(store.snapshot().await.history, history);
}

#[tokio::test]
async fn failed_fetch_keeps_the_previous_list() {
    let transport = ScriptedHistoryTransport::new();
    let (synchronizer, store) = synchronizer_with(&transport);

    let response = transport.script().await;
    let _ = response.send(Ok(vec![record("A"), record("B")]));
    synchronizer.refresh().await;

    let before = store.snapshot().await;

    let response = transport.script().await;
    let _ = response.send(Err(anyhow!("service down")));
    synchronizer.refresh().await;

    assert_eq!(store.snapshot().await, before);
}

#[tokio::test]
async fn stale_response_is_discarded_once_a_newer_refresh_applied() {
    let transport = ScriptedHistoryTransport::new();
    let (synchronizer, store) = synchronizer_with(&transport);

    let first = transport.script().await;
    let second = transport.script().await;

    let task1 = tokio::spawn({
        let synchronizer = Arc::clone(&synchronizer);
        async move { synchronizer.refresh().await }
    });
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    let task2 = tokio::spawn({
        let synchronizer = Arc::clone(&synchronizer);
        async move { synchronizer.refresh().await }
    });
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    // The newer refresh resolves first and publishes.
    let _ = second.send(Ok(vec![record("old"), record("new")]));
    task2.await.expect("join newer refresh");

    // The older one resolves afterwards and must be discarded.
    let _ = first.send(Ok(vec![record("stale")]));
    task1.await.expect("join older refresh");

    let history = store.snapshot().await.history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].dream_text, "new");
}

#[tokio::test]
async fn later_issued_refresh_overwrites_an_earlier_one_in_order() {
    let transport = ScriptedHistoryTransport::new();
    let (synchronizer, store) = synchronizer_with(&transport);

    let first = transport.script().await;
    let second = transport.script().await;

    let task1 = tokio::spawn({
        let synchronizer = Arc::clone(&synchronizer);
        async move { synchronizer.refresh().await }
    });
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    let task2 = tokio::spawn({
        let synchronizer = Arc::clone(&synchronizer);
        async move { synchronizer.refresh().await }
    });
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    let _ = first.send(Ok(vec![record("early")]));
    task1.await.expect("join first refresh");

    let _ = second.send(Ok(vec![record("late")]));
    task2.await.expect("join second refresh");

    let history = store.snapshot().await.history;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].dream_text, "late");
}
