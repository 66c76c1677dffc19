//! Usage record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One symbol tapped as part of a completed utterance.
///
/// Written once per symbol per utterance; `position_in_utterance` is always
/// below `utterance_length`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub symbol_id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub category: Option<String>,
    pub position_in_utterance: usize,
    pub utterance_length: usize,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl UsageEvent {
    /// First symbol of its utterance; carries the utterance-level fields
    pub fn is_utterance_start(&self) -> bool {
        self.position_in_utterance == 0
    }

    pub fn is_well_formed(&self) -> bool {
        self.position_in_utterance < self.utterance_length && !self.label.trim().is_empty()
    }
}
