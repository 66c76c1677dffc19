//! Wires the data directory to the engine components

use glyphic_core::{
    language_preferences, Config, InMemoryCatalog, SymbolCatalog, SymbolRef, UsageLog,
};
use glyphic_language::{GrammarExpander, SemanticAnalyzer};
use glyphic_learn::{ModelCache, PredictionEngine, UsageAnalytics};
use glyphic_store::{load_catalog, JsonlUsageLog, SqliteStore};
use glyphic_telemetry::Paths;
use serde::Serialize;
use std::sync::Arc;

/// Collaborators resolved from one data directory.
///
/// An initialized database backs both the catalog and the usage log.
/// Without one, `catalog.json` (if present) is loaded into memory and usage
/// goes to `usage.jsonl`.
pub struct Engine {
    pub paths: Paths,
    pub config: Config,
    pub catalog: Arc<dyn SymbolCatalog>,
    pub log: Arc<dyn UsageLog>,
}

impl Engine {
    pub fn open(paths: Paths) -> anyhow::Result<Self> {
        let config = load_config(&paths);

        let db_path = paths.database_path();
        let (catalog, log): (Arc<dyn SymbolCatalog>, Arc<dyn UsageLog>) = if db_path.exists() {
            let store = Arc::new(SqliteStore::open(&db_path)?);
            tracing::debug!(path = %db_path.display(), "using database");
            let catalog: Arc<dyn SymbolCatalog> = store.clone();
            let log: Arc<dyn UsageLog> = store;
            (catalog, log)
        } else {
            let catalog_path = paths.catalog_path();
            let catalog = if catalog_path.exists() {
                load_catalog(&catalog_path)?
            } else {
                tracing::debug!("no catalog; predictions use built-in vocabulary only");
                InMemoryCatalog::new()
            };
            let catalog: Arc<dyn SymbolCatalog> = Arc::new(catalog);
            let log: Arc<dyn UsageLog> = Arc::new(JsonlUsageLog::new(paths.usage_log_file()));
            (catalog, log)
        };

        Ok(Self {
            paths,
            config,
            catalog,
            log,
        })
    }

    pub fn analyzer(&self) -> SemanticAnalyzer {
        SemanticAnalyzer::new()
    }

    pub fn expander(&self) -> GrammarExpander {
        GrammarExpander::new(&self.config.expander)
    }

    pub fn analytics(&self) -> UsageAnalytics {
        UsageAnalytics::new(Arc::clone(&self.log), self.config.analytics.clone())
    }

    pub fn predictor(&self) -> PredictionEngine {
        let models_dir = self
            .config
            .models_dir
            .clone()
            .unwrap_or_else(|| self.paths.models_dir());
        PredictionEngine::new(
            Arc::clone(&self.catalog),
            self.analytics(),
            ModelCache::new(Some(models_dir)),
            self.config.prediction.clone(),
        )
    }

    /// Parse `label[:category]` words and attach catalog identities where the
    /// label is known. Lookup failures keep the bare symbol.
    pub fn resolve(&self, words: &[String], language: &str) -> Vec<SymbolRef> {
        let languages = language_preferences(language);
        words
            .iter()
            .map(|word| SymbolRef::parse(word))
            .filter(|symbol| !symbol.label.is_empty())
            .map(|symbol| self.attach_catalog_identity(symbol, &languages))
            .collect()
    }

    fn attach_catalog_identity(&self, symbol: SymbolRef, languages: &[String]) -> SymbolRef {
        for language in languages {
            match self.catalog.find_by_label(&symbol.label, language) {
                Ok(Some(found)) => {
                    let category = symbol.category.clone().unwrap_or(found.category);
                    return SymbolRef::new(symbol.label, Some(&category))
                        .with_id(found.id)
                        .with_language(found.language);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(label = %symbol.label, error = %e, "catalog lookup failed");
                    break;
                }
            }
        }
        match languages.first() {
            Some(language) => symbol.with_language(language.clone()),
            None => symbol,
        }
    }
}

/// Read `glyphic.json`; a missing or malformed file gives the defaults
pub fn load_config(paths: &Paths) -> Config {
    let path = paths.config_path();
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    Config::from_json(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "malformed config, using defaults");
        Config::default()
    })
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "symbols": [{"id": "s-cookie", "label": "cookie", "category": "food"}],
        "boards": {"snack": [{"symbol_id": "s-cookie"}]}
    }"#;

    #[test]
    fn test_config_defaults_when_missing_or_malformed() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::with_home(temp.path());
        assert_eq!(load_config(&paths).analytics.session_gap_minutes, 5);

        std::fs::write(paths.config_path(), "{oops").unwrap();
        assert_eq!(load_config(&paths).expander.cache_capacity, 1024);

        std::fs::write(paths.config_path(), r#"{"analytics": {"top_symbols": 3}}"#).unwrap();
        let config = load_config(&paths);
        assert_eq!(config.analytics.top_symbols, 3);
        assert_eq!(config.analytics.session_gap_minutes, 5);
    }

    #[test]
    fn test_open_without_catalog() {
        let temp = TempDir::new().unwrap();
        let engine = Engine::open(Paths::with_home(temp.path())).unwrap();
        assert!(engine.catalog.all_symbols("en", 10).unwrap().is_empty());
        assert!(engine.log.events_since(None).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_attaches_catalog_identity() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::with_home(temp.path());
        std::fs::write(paths.catalog_path(), CATALOG).unwrap();
        let engine = Engine::open(paths).unwrap();

        let symbols = engine.resolve(
            &["want:actions".to_string(), "Cookie".to_string(), ":".to_string()],
            "en",
        );
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].category.as_deref(), Some("actions"));
        assert!(symbols[0].id.is_none());
        assert_eq!(symbols[1].id.as_deref(), Some("s-cookie"));
        assert_eq!(symbols[1].category.as_deref(), Some("food"));
        assert_eq!(symbols[1].label, "Cookie");
    }
}
