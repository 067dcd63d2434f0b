use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::{domain::DreamRecord, protocol::InterpretationOutcome};

#[derive(Debug, Serialize)]
struct AnalyzeDreamHttpRequest<'a> {
    dream_text: &'a str,
}

/// Seam between the interaction core and the interpretation service.
///
/// Implementations perform exactly one request per call: no retries, no
/// timeouts, no cancellation. Those are caller-level concerns.
#[async_trait]
pub trait DreamTransport: Send + Sync {
    /// Submits the text verbatim and returns the service's interpretation.
    async fn submit(&self, dream_text: &str) -> Result<InterpretationOutcome>;
    /// Returns all recorded dreams in the service's native storage order.
    async fn fetch_history(&self) -> Result<Vec<DreamRecord>>;
}

pub struct HttpDreamTransport {
    http: Client,
    server_url: String,
}

impl HttpDreamTransport {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }
}

#[async_trait]
impl DreamTransport for HttpDreamTransport {
    async fn submit(&self, dream_text: &str) -> Result<InterpretationOutcome> {
        let outcome = self
            .http
            .post(format!("{}/analyze_dream", self.server_url))
            .json(&AnalyzeDreamHttpRequest { dream_text })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(outcome)
    }

    async fn fetch_history(&self) -> Result<Vec<DreamRecord>> {
        let records = self
            .http
            .get(format!("{}/dream_history", self.server_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(records)
    }
}
