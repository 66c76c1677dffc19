use crate::engine::print_json;
use glyphic_core::{Config, UsageLog};
use glyphic_store::{read_catalog_file, JsonlUsageLog, SqliteStore};
use glyphic_telemetry::Paths;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct InitOutcome {
    pub database: PathBuf,
    pub symbols_imported: usize,
    pub events_migrated: usize,
    pub config_written: bool,
}

/// Create (or reopen) the database and bring existing data into it.
///
/// The catalog is re-imported on every run. Usage recorded in `usage.jsonl`
/// is copied only when the database is first created, so repeated runs never
/// duplicate events.
pub fn init(paths: &Paths, catalog: Option<&Path>) -> anyhow::Result<InitOutcome> {
    std::fs::create_dir_all(&paths.home)?;

    let db_path = paths.database_path();
    let fresh = !db_path.exists();
    let store = SqliteStore::open(&db_path)?;

    let catalog_path = match catalog {
        Some(path) if !path.exists() => anyhow::bail!("catalog not found: {}", path.display()),
        Some(path) => path.to_path_buf(),
        None => paths.catalog_path(),
    };
    let symbols_imported = if catalog_path.exists() {
        store.import(&read_catalog_file(&catalog_path)?)?
    } else {
        0
    };

    let mut events_migrated = 0;
    let usage_file = paths.usage_log_file();
    if fresh && usage_file.exists() {
        let events = JsonlUsageLog::new(usage_file).events_since(None)?;
        if !events.is_empty() {
            store.append_batch(&events)?;
            events_migrated = events.len();
        }
    }

    let config_path = paths.config_path();
    let config_written = !config_path.exists();
    if config_written {
        let json = serde_json::to_string_pretty(&Config::default())?;
        glyphic_telemetry::atomic_write(&config_path, json.as_bytes())?;
    }

    tracing::info!(
        database = %db_path.display(),
        symbols = symbols_imported,
        events = events_migrated,
        "initialized data directory"
    );

    Ok(InitOutcome {
        database: db_path,
        symbols_imported,
        events_migrated,
        config_written,
    })
}

pub fn run(catalog: Option<&str>) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let outcome = init(&paths, catalog.map(Path::new))?;
    print_json(&outcome)
}
