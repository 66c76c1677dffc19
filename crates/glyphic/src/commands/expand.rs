use crate::engine::{print_json, Engine};
use glyphic_language::ExpansionResult;
use glyphic_telemetry::Paths;

/// Analyze, then expand with the analysis. Raw text defaults to the labels
/// as entered.
pub fn expand(
    engine: &Engine,
    symbols: &[String],
    text: Option<&str>,
    language: &str,
) -> ExpansionResult {
    let sequence = engine.resolve(symbols, language);
    let raw_text = match text {
        Some(text) => text.to_string(),
        None => sequence
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    };
    let analysis = engine.analyzer().analyze(&sequence);
    engine
        .expander()
        .expand(&sequence, &raw_text, Some(&analysis))
}

pub fn run(symbols: &[String], text: Option<&str>, language: &str) -> anyhow::Result<()> {
    let engine = Engine::open(Paths::new()?)?;
    print_json(&expand(&engine, symbols, text, language))
}
