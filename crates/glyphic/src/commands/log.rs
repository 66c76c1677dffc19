use crate::engine::{print_json, Engine};
use glyphic_learn::UtteranceContext;
use glyphic_telemetry::Paths;
use serde::Serialize;

pub struct LogArgs<'a> {
    pub user: &'a str,
    pub symbols: &'a [String],
    pub session: Option<&'a str>,
    pub intent: Option<&'a str>,
    pub topic: Option<&'a str>,
    /// Preference list used to match catalog symbols
    pub language: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LogOutcome {
    pub logged: bool,
    pub symbols: usize,
    pub intent: String,
}

/// Record one utterance. Without an explicit intent the analyzed one is stored.
pub fn log(engine: &Engine, args: &LogArgs<'_>) -> LogOutcome {
    let sequence = engine.resolve(args.symbols, args.language);
    let intent = match args.intent {
        Some(intent) => intent.to_string(),
        None => engine.analyzer().analyze(&sequence).intent.as_str().to_string(),
    };
    let context = UtteranceContext {
        session_id: args.session.map(str::to_string),
        intent: Some(intent.clone()),
        topic: args.topic.map(str::to_string),
        timestamp: None,
    };
    let logged = engine.analytics().log(args.user, &sequence, &context);
    LogOutcome {
        logged,
        symbols: sequence.len(),
        intent,
    }
}

pub fn run(args: &LogArgs<'_>) -> anyhow::Result<()> {
    let engine = Engine::open(Paths::new()?)?;
    let outcome = log(&engine, args);
    print_json(&outcome)?;
    if !outcome.logged {
        anyhow::bail!("utterance was not recorded");
    }
    Ok(())
}
