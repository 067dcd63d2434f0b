use serde::{Deserialize, Serialize};

/// One persisted dream submission, as the history store returns it.
///
/// Records are created server-side; the client never edits or deletes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamRecord {
    pub dream_text: String,
    pub interpretation: String,
    /// Label from the service's own vocabulary; not enumerated client-side.
    pub emotion: String,
    /// In [0.0, 1.0]. Kept raw; rounding is a display concern.
    pub confidence: f64,
}
