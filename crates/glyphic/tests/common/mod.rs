#![allow(dead_code)]

use glyphic_core::{
    AnalyticsConfig, CatalogSymbol, InMemoryCatalog, InMemoryUsageLog, PredictionConfig,
    SymbolRef,
};
use glyphic_learn::{ModelCache, PredictionEngine, UsageAnalytics};
use std::sync::Arc;

pub fn seq(specs: &[&str]) -> Vec<SymbolRef> {
    specs.iter().map(|s| SymbolRef::parse(s)).collect()
}

pub fn sample_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    for (id, label, category) in [
        ("s-i", "I", "pronouns"),
        ("s-want", "want", "actions"),
        ("s-more", "more", "descriptors"),
        ("s-juice", "juice", "drinks"),
        ("s-cookie", "cookie", "food"),
        ("s-apple", "apple", "food"),
        ("s-park", "park", "places"),
        ("s-ball", "ball", "toys"),
    ] {
        catalog.insert_symbol(CatalogSymbol::new(id, label, category));
    }
    for symbol_id in ["s-want", "s-juice", "s-cookie"] {
        catalog.place("snack", symbol_id, false);
    }
    catalog.place("snack", "s-ball", true);
    catalog
}

pub struct Harness {
    pub log: Arc<InMemoryUsageLog>,
    pub analytics: UsageAnalytics,
    pub engine: PredictionEngine,
}

pub fn harness() -> Harness {
    let log = Arc::new(InMemoryUsageLog::new());
    let analytics = UsageAnalytics::new(log.clone(), AnalyticsConfig::default());
    let engine = PredictionEngine::new(
        Arc::new(sample_catalog()),
        analytics.clone(),
        ModelCache::new(None),
        PredictionConfig::default(),
    );
    Harness {
        log,
        analytics,
        engine,
    }
}
