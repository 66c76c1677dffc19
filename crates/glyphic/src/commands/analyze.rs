use crate::engine::{print_json, Engine};
use glyphic_language::SemanticAnalysis;
use glyphic_telemetry::Paths;

pub fn analyze(engine: &Engine, symbols: &[String], language: &str) -> SemanticAnalysis {
    let sequence = engine.resolve(symbols, language);
    engine.analyzer().analyze(&sequence)
}

pub fn run(symbols: &[String], language: &str) -> anyhow::Result<()> {
    let engine = Engine::open(Paths::new()?)?;
    print_json(&analyze(&engine, symbols, language))
}
