use chrono::{Duration, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use glyphic_core::{
    AnalyticsConfig, CatalogSymbol, InMemoryCatalog, InMemoryUsageLog, PredictionConfig,
    SymbolRef,
};
use glyphic_learn::{
    ModelCache, PredictionEngine, PredictionRequest, UsageAnalytics, UtteranceContext,
};
use std::hint::black_box;
use std::sync::Arc;

const LABELS: [(&str, &str); 8] = [
    ("I", "pronouns"),
    ("want", "actions"),
    ("more", "descriptors"),
    ("juice", "drinks"),
    ("cookie", "food"),
    ("apple", "food"),
    ("park", "places"),
    ("go", "actions"),
];

fn engine_with_history(utterances: usize) -> PredictionEngine {
    let mut catalog = InMemoryCatalog::new();
    for (label, category) in LABELS {
        let id = format!("s-{label}");
        catalog.insert_symbol(CatalogSymbol::new(&id, label, category));
        catalog.place("home", &id, false);
    }

    let log = Arc::new(InMemoryUsageLog::new());
    let analytics = UsageAnalytics::new(log, AnalyticsConfig::default());
    let start = Utc::now() - Duration::days(20);
    for i in 0..utterances {
        let sequence: Vec<SymbolRef> = (0..3)
            .map(|j| {
                let (label, category) = LABELS[(i + j) % LABELS.len()];
                SymbolRef::new(label, Some(category))
            })
            .collect();
        let context = UtteranceContext {
            session_id: Some(format!("s{}", i / 10)),
            timestamp: Some(start + Duration::minutes(10 * i as i64)),
            ..Default::default()
        };
        analytics.log("bench-user", &sequence, &context);
    }

    PredictionEngine::new(
        Arc::new(catalog),
        analytics,
        ModelCache::new(None),
        PredictionConfig::default(),
    )
}

fn bench_predict_history(c: &mut Criterion) {
    let engine = engine_with_history(500);
    let request = PredictionRequest::new("bench-user", vec![SymbolRef::new("want", None)]);

    c.bench_function("predict_next_500_utterances", |b| {
        b.iter(|| engine.predict_next(black_box(&request)));
    });
}

fn bench_predict_board(c: &mut Criterion) {
    let engine = engine_with_history(500);
    let request = PredictionRequest::new("bench-user", Vec::new()).with_board("home");

    c.bench_function("predict_next_board_scoped", |b| {
        b.iter(|| engine.predict_next(black_box(&request)));
    });
}

criterion_group!(benches, bench_predict_history, bench_predict_board);
criterion_main!(benches);
