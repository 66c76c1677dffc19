use criterion::{Criterion, criterion_group, criterion_main};
use glyphic_core::{ExpanderConfig, SymbolRef};
use glyphic_language::{ExpansionCache, GrammarExpander, SemanticAnalyzer};
use std::hint::black_box;

fn sequence() -> Vec<SymbolRef> {
    ["me", "go:actions", "park:places", "yesterday:time"]
        .iter()
        .map(|s| SymbolRef::parse(s))
        .collect()
}

fn bench_expand_uncached(c: &mut Criterion) {
    let symbols = sequence();
    let analysis = SemanticAnalyzer::new().analyze(&symbols);

    // zero capacity keeps every call on the rule pipeline
    let expander = GrammarExpander::with_cache(ExpansionCache::new(0));

    c.bench_function("expand_uncached_4_symbols", |b| {
        b.iter(|| {
            expander.expand(
                black_box(&symbols),
                black_box("me go park yesterday"),
                Some(&analysis),
            )
        });
    });
}

fn bench_expand_cached(c: &mut Criterion) {
    let symbols = sequence();
    let expander = GrammarExpander::new(&ExpanderConfig::default());
    expander.expand(&symbols, "me go park yesterday", None);

    c.bench_function("expand_cached_4_symbols", |b| {
        b.iter(|| expander.expand(black_box(&symbols), "me go park yesterday", None));
    });
}

criterion_group!(benches, bench_expand_uncached, bench_expand_cached);
criterion_main!(benches);
