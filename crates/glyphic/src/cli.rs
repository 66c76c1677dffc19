use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "glyphic")]
#[command(version)]
#[command(about = "Symbol-to-sentence expansion and next-symbol prediction for AAC boards")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database, import catalog.json and write a default config
    Init {
        /// Catalog file to import (defaults to catalog.json in the data directory)
        #[arg(short, long)]
        catalog: Option<String>,
    },

    /// Classify the intent of a symbol sequence
    Analyze {
        /// Symbols as label[:category]
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Language preference list for catalog lookups, e.g. "es,en"
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// Expand a symbol sequence into a sentence
    Expand {
        /// Symbols as label[:category]
        symbols: Vec<String>,

        /// Raw text as typed (defaults to the labels joined by spaces)
        #[arg(short, long)]
        text: Option<String>,

        /// Language preference list for catalog lookups, e.g. "es,en"
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// Suggest the next symbols
    Predict {
        #[arg(short, long)]
        user: String,

        /// Symbols selected so far, as label[:category]
        symbols: Vec<String>,

        #[arg(short, long, default_value_t = glyphic_learn::DEFAULT_LIMIT)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Language preference list, e.g. "es,en"
        #[arg(long, default_value = "en")]
        language: String,

        /// Restrict suggestions to a board's visible symbols
        #[arg(short, long)]
        board: Option<String>,

        /// Word-class shortcut: pronouns, verbs, articles, nouns or places
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Record a completed utterance
    Log {
        #[arg(short, long)]
        user: String,

        /// Symbols as label[:category]
        #[arg(required = true)]
        symbols: Vec<String>,

        #[arg(short, long)]
        session: Option<String>,

        /// Utterance intent (defaults to the analyzed intent)
        #[arg(long)]
        intent: Option<String>,

        #[arg(long)]
        topic: Option<String>,

        /// Language preference list for catalog lookups, e.g. "es,en"
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// Usage statistics for a user
    Stats {
        #[arg(short, long)]
        user: String,

        #[arg(short, long, default_value_t = 30)]
        days: i64,
    },

    /// Repeated utterances of a user
    Sequences {
        #[arg(short, long)]
        user: String,

        #[arg(short, long, default_value_t = 2)]
        min: usize,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Category usage shares of a user
    Preferences {
        #[arg(short, long)]
        user: String,

        #[arg(short, long, default_value_t = 30)]
        days: i64,
    },

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::try_parse_from(["glyphic", "version"]);
        assert!(cli.is_ok());
        assert!(matches!(cli.unwrap().command, Commands::Version));
    }

    #[test]
    fn test_cli_parse_expand_with_text() {
        let cli =
            Cli::try_parse_from(["glyphic", "expand", "me", "want:actions", "--text", "me want"]);
        if let Commands::Expand {
            symbols,
            text,
            language,
        } = cli.unwrap().command
        {
            assert_eq!(symbols, vec!["me", "want:actions"]);
            assert_eq!(text.as_deref(), Some("me want"));
            assert_eq!(language, "en");
        } else {
            panic!("Expected Expand command");
        }
    }

    #[test]
    fn test_cli_parse_predict_defaults() {
        let cli = Cli::try_parse_from(["glyphic", "predict", "--user", "u1", "I"]);
        if let Commands::Predict {
            user,
            symbols,
            limit,
            offset,
            language,
            board,
            category,
        } = cli.unwrap().command
        {
            assert_eq!(user, "u1");
            assert_eq!(symbols, vec!["I"]);
            assert_eq!(limit, 10);
            assert_eq!(offset, 0);
            assert_eq!(language, "en");
            assert!(board.is_none() && category.is_none());
        } else {
            panic!("Expected Predict command");
        }
    }

    #[test]
    fn test_cli_parse_language_for_analyze_and_log() {
        let cli = Cli::try_parse_from(["glyphic", "analyze", "galleta", "--language", "es"]);
        if let Commands::Analyze { language, .. } = cli.unwrap().command {
            assert_eq!(language, "es");
        } else {
            panic!("Expected Analyze command");
        }

        let cli =
            Cli::try_parse_from(["glyphic", "log", "-u", "u1", "quiero", "--language", "es,en"]);
        if let Commands::Log { language, .. } = cli.unwrap().command {
            assert_eq!(language, "es,en");
        } else {
            panic!("Expected Log command");
        }
    }

    #[test]
    fn test_cli_requires_symbols_for_log() {
        assert!(Cli::try_parse_from(["glyphic", "log", "--user", "u1"]).is_err());
        assert!(Cli::try_parse_from(["glyphic", "analyze"]).is_err());
    }

    #[test]
    fn test_cli_parse_reports() {
        for command in ["stats", "sequences", "preferences"] {
            let cli = Cli::try_parse_from(["glyphic", command, "-u", "u1"]);
            assert!(cli.is_ok(), "Failed to parse {}", command);
        }
    }
}
