//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Confidence assigned to each prediction tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// History suggestions without a computable share
    pub history_fallback: f64,

    /// Shared bigram model
    pub language_model: f64,

    /// Static per-language n-gram table
    pub ngram: f64,

    /// Global frequency, noun-like categories
    pub frequency_noun: f64,

    /// Global frequency, everything else
    pub frequency_other: f64,

    /// Standard vocabulary (no user history, or board cold start)
    pub standard_vocabulary: f64,

    /// User's own top symbols on the board
    pub board_personal: f64,

    /// Board-wide popularity across users
    pub board_popular: f64,

    /// Raw layout order of the board
    pub board_layout: f64,

    pub punctuation: f64,

    /// Punctuation slots reserved at offset 0 (never more than half the limit)
    pub punctuation_slots: usize,

    /// Category shortcut, closed word list hit
    pub category_closed_list: f64,

    /// Category shortcut, category heuristic hit
    pub category_heuristic: f64,
}

impl PredictionConfig {
    pub fn new() -> Self {
        Self {
            history_fallback: 0.5,
            language_model: 0.5,
            ngram: 0.4,
            frequency_noun: 0.15,
            frequency_other: 0.10,
            standard_vocabulary: 0.25,
            board_personal: 0.35,
            board_popular: 0.22,
            board_layout: 0.18,
            punctuation: 1.0,
            punctuation_slots: 2,
            category_closed_list: 0.8,
            category_heuristic: 0.6,
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Usage analytics tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Inactivity gap that splits two utterances
    pub session_gap_minutes: i64,

    /// Number of most-used symbols in usage stats
    pub top_symbols: usize,
}

impl AnalyticsConfig {
    pub fn new() -> Self {
        Self {
            session_gap_minutes: 5,
            top_symbols: 10,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Grammar expansion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpanderConfig {
    /// Maximum cached expansions before the oldest is evicted
    pub cache_capacity: usize,
}

impl ExpanderConfig {
    pub fn new() -> Self {
        Self {
            cache_capacity: 1024,
        }
    }
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub prediction: PredictionConfig,
    pub analytics: AnalyticsConfig,
    pub expander: ExpanderConfig,

    /// Directory of `<lang>.json` bigram resources; `None` disables the model tier
    pub models_dir: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config; unknown or missing fields fall back to defaults
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::new();
        assert_eq!(config.prediction.language_model, 0.5);
        assert_eq!(config.prediction.ngram, 0.4);
        assert_eq!(config.prediction.board_layout, 0.18);
        assert_eq!(config.analytics.session_gap_minutes, 5);
        assert_eq!(config.expander.cache_capacity, 1024);
        assert!(config.models_dir.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            Config::from_json(r#"{"prediction":{"punctuation_slots":1},"models_dir":"/m"}"#)
                .unwrap();
        assert_eq!(config.prediction.punctuation_slots, 1);
        assert_eq!(config.prediction.history_fallback, 0.5);
        assert_eq!(config.analytics.top_symbols, 10);
        assert_eq!(config.models_dir, Some(PathBuf::from("/m")));
    }
}
