//! Path resolution for the glyphic data directory

use std::path::PathBuf;

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "GLYPHIC_HOME";

/// Resolves standard paths for usage logs, catalogs and model resources
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
}

impl Paths {
    /// Resolve the data directory from `GLYPHIC_HOME`, else `~/.glyphic`
    pub fn new() -> std::io::Result<Self> {
        if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_home(dir));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self::with_home(home.join(".glyphic")))
    }

    /// Use an explicit data directory
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Get usage.jsonl path
    pub fn usage_log_file(&self) -> PathBuf {
        self.home.join("usage.jsonl")
    }

    /// Get the SQLite database path
    pub fn database_path(&self) -> PathBuf {
        self.home.join("glyphic.db")
    }

    /// Get the JSON symbol catalog path
    pub fn catalog_path(&self) -> PathBuf {
        self.home.join("catalog.json")
    }

    /// Directory holding `<lang>.json` bigram resources
    pub fn models_dir(&self) -> PathBuf {
        self.home.join("models")
    }

    /// Get glyphic.json config path
    pub fn config_path(&self) -> PathBuf {
        self.home.join("glyphic.json")
    }
}
