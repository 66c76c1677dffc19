//! Shared bigram language model and its per-language cache

use glyphic_core::{normalize_label, primary_language};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Bigram weights: label -> next label -> weight. Immutable once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageModel {
    #[serde(default)]
    bigrams: HashMap<String, HashMap<String, f64>>,
}

impl LanguageModel {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a `{"bigrams": {...}}` resource; keys are normalized on load
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let raw: LanguageModel = serde_json::from_str(content)?;
        let mut bigrams: HashMap<String, HashMap<String, f64>> = HashMap::new();
        for (label, followers) in raw.bigrams {
            let entry = bigrams.entry(normalize_label(&label)).or_default();
            for (next, weight) in followers {
                if weight.is_finite() && weight > 0.0 {
                    *entry.entry(normalize_label(&next)).or_insert(0.0) += weight;
                }
            }
        }
        Ok(Self { bigrams })
    }

    /// Load a resource file. Missing or malformed resources give an empty model.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no language model resource");
                return Self::empty();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable language model");
                return Self::empty();
            }
        };
        match Self::from_json(&content) {
            Ok(model) => {
                tracing::debug!(
                    path = %path.display(),
                    labels = model.len(),
                    "loaded language model"
                );
                model
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed language model");
                Self::empty()
            }
        }
    }

    /// Labels following `label`, heaviest first (ties by label)
    pub fn next_labels(&self, label: &str, limit: usize) -> Vec<(String, f64)> {
        let Some(followers) = self.bigrams.get(&normalize_label(label)) else {
            return Vec::new();
        };
        let mut ranked: Vec<(String, f64)> =
            followers.iter().map(|(l, w)| (l.clone(), *w)).collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(limit);
        ranked
    }

    /// Number of labels with at least one follower
    pub fn len(&self) -> usize {
        self.bigrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bigrams.is_empty()
    }
}

/// Loads each language's model at most once per cache.
///
/// Concurrent first loads of one language may both read the resource; the
/// last insert wins and both results are identical. A poisoned lock loads
/// without caching.
#[derive(Debug, Default)]
pub struct ModelCache {
    models_dir: Option<PathBuf>,
    models: RwLock<HashMap<String, Arc<LanguageModel>>>,
}

impl ModelCache {
    /// `None` serves empty models for every language
    pub fn new(models_dir: Option<PathBuf>) -> Self {
        Self {
            models_dir,
            models: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_or_load(&self, language: &str) -> Arc<LanguageModel> {
        let code = primary_language(language);
        if let Ok(models) = self.models.read() {
            if let Some(model) = models.get(&code) {
                return Arc::clone(model);
            }
        }

        let model = Arc::new(match &self.models_dir {
            Some(dir) => LanguageModel::load(&dir.join(format!("{code}.json"))),
            None => LanguageModel::empty(),
        });
        if let Ok(mut models) = self.models.write() {
            models.insert(code, Arc::clone(&model));
        }
        model
    }

    /// Install a model directly, replacing any cached one
    pub fn insert(&self, language: &str, model: LanguageModel) {
        if let Ok(mut models) = self.models.write() {
            models.insert(primary_language(language), Arc::new(model));
        }
    }

    pub fn evict(&self, language: &str) -> bool {
        match self.models.write() {
            Ok(mut models) => models.remove(&primary_language(language)).is_some(),
            Err(_) => false,
        }
    }

    pub fn clear(&self) {
        if let Ok(mut models) = self.models.write() {
            models.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.models.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EN_MODEL: &str = r#"{"bigrams": {
        "I": {"want": 0.6, "need": 0.3, "Like": 0.3},
        "want": {"more": 1.0}
    }}"#;

    #[test]
    fn test_next_labels_ranked() {
        let model = LanguageModel::from_json(EN_MODEL).unwrap();
        let next = model.next_labels("i", 10);
        let labels: Vec<_> = next.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["want", "like", "need"]);
        assert_eq!(model.next_labels("unknown", 10), Vec::new());
        assert_eq!(model.next_labels("I", 1).len(), 1);
    }

    #[test]
    fn test_missing_resource_is_empty() {
        let dir = TempDir::new().unwrap();
        let model = LanguageModel::load(&dir.path().join("xx.json"));
        assert!(model.is_empty());
    }

    #[test]
    fn test_malformed_resource_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("en.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(LanguageModel::load(&path).is_empty());
    }

    #[test]
    fn test_cache_loads_once_per_language() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("en.json"), EN_MODEL).unwrap();
        let cache = ModelCache::new(Some(dir.path().to_path_buf()));

        let first = cache.get_or_load("en-US");
        // a later change on disk is not picked up until eviction
        std::fs::write(dir.path().join("en.json"), r#"{"bigrams": {}}"#).unwrap();
        let second = cache.get_or_load("en");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        assert!(cache.evict("en"));
        assert!(cache.get_or_load("en").is_empty());
    }

    #[test]
    fn test_cache_without_directory_serves_empty_models() {
        let cache = ModelCache::new(None);
        assert!(cache.get_or_load("es").is_empty());
        let spanish = LanguageModel::from_json(r#"{"bigrams": {"yo": {"quiero": 1}}}"#).unwrap();
        cache.insert("es", spanish);
        assert_eq!(cache.get_or_load("es").next_labels("yo", 5)[0].0, "quiero");
        cache.clear();
        assert!(cache.is_empty());
    }
}
