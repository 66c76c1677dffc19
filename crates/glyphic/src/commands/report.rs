use crate::engine::{print_json, Engine};
use glyphic_telemetry::Paths;

pub fn run_stats(user: &str, days: i64) -> anyhow::Result<()> {
    let engine = Engine::open(Paths::new()?)?;
    print_json(&engine.analytics().get_usage_stats(user, days))
}

pub fn run_sequences(user: &str, min: usize, limit: usize) -> anyhow::Result<()> {
    let engine = Engine::open(Paths::new()?)?;
    print_json(&engine.analytics().get_frequent_sequences(user, min, limit))
}

pub fn run_preferences(user: &str, days: i64) -> anyhow::Result<()> {
    let engine = Engine::open(Paths::new()?)?;
    print_json(&engine.analytics().get_category_preferences(user, days))
}
