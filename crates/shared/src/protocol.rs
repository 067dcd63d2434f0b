use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeDreamRequest {
    pub dream_text: String,
}

/// Body of a successful analyze response.
///
/// The service echoes the submitted `dream_text` alongside these fields;
/// extra fields are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationOutcome {
    pub interpretation: String,
    pub emotion: String,
    pub confidence: f64,
}
