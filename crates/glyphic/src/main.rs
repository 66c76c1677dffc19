mod cli;
mod commands;
mod engine;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{log::LogArgs, predict::PredictArgs};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the JSON results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { catalog } => commands::init::run(catalog.as_deref()),
        Commands::Analyze { symbols, language } => commands::analyze::run(&symbols, &language),
        Commands::Expand {
            symbols,
            text,
            language,
        } => commands::expand::run(&symbols, text.as_deref(), &language),
        Commands::Predict {
            user,
            symbols,
            limit,
            offset,
            language,
            board,
            category,
        } => commands::predict::run(&PredictArgs {
            user: &user,
            symbols: &symbols,
            limit,
            offset,
            language: &language,
            board: board.as_deref(),
            category: category.as_deref(),
        }),
        Commands::Log {
            user,
            symbols,
            session,
            intent,
            topic,
            language,
        } => commands::log::run(&LogArgs {
            user: &user,
            symbols: &symbols,
            session: session.as_deref(),
            intent: intent.as_deref(),
            topic: topic.as_deref(),
            language: &language,
        }),
        Commands::Stats { user, days } => commands::report::run_stats(&user, days),
        Commands::Sequences { user, min, limit } => {
            commands::report::run_sequences(&user, min, limit)
        }
        Commands::Preferences { user, days } => commands::report::run_preferences(&user, days),
        Commands::Version => commands::version::run(),
    }
}
