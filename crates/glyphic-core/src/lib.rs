//! Shared symbol types, configuration and collaborator traits

mod config;
mod error;
mod store;
mod types;

pub use config::{AnalyticsConfig, Config, ExpanderConfig, PredictionConfig};
pub use error::{StoreError, StoreResult};
pub use glyphic_telemetry::UsageEvent;
pub use store::{
    validate_batch, InMemoryCatalog, InMemoryUsageLog, SymbolCatalog, UsageLog,
};
pub use types::{
    language_preferences, normalize_label, primary_language, BoardCell, CatalogSymbol,
    SymbolRef, DEFAULT_LANGUAGE,
};
