pub mod analytics;
pub mod model;
pub mod predictor;
pub mod tiers;
pub mod vocabulary;

pub use analytics::{
    CategoryPreference, FrequentSequence, LabelCount, NextSymbol, UsageAnalytics, UsageStats,
    UtteranceContext,
};
pub use model::{LanguageModel, ModelCache};
pub use predictor::{PredictionEngine, PredictionRequest, DEFAULT_LIMIT};
pub use tiers::{
    default_sources, BoardScope, SourceTier, Suggestion, SuggestionMerger, SuggestionSource,
    TierContext,
};
pub use vocabulary::CategoryIntent;
