//! Bounded memo of expansion results keyed by normalized label sequence

use crate::expander::ExpansionResult;
use glyphic_core::normalize_label;
use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, ExpansionResult>,
    order: VecDeque<String>,
}

/// Expansion cache owned by a [`crate::GrammarExpander`].
///
/// Oldest entries are evicted first once `capacity` is reached; a capacity of
/// zero disables caching. A poisoned lock behaves as a miss.
#[derive(Debug)]
pub struct ExpansionCache {
    capacity: usize,
    inner: RwLock<CacheInner>,
}

impl ExpansionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RwLock::new(CacheInner::default()),
        }
    }

    /// Cache key for a label sequence; free text is not part of it
    pub fn key_for<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
        labels
            .into_iter()
            .map(normalize_label)
            .collect::<Vec<_>>()
            .join("\u{1f}")
    }

    pub fn get(&self, key: &str) -> Option<ExpansionResult> {
        self.inner.read().ok()?.entries.get(key).cloned()
    }

    pub fn insert(&self, key: String, result: ExpansionResult) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut inner) = self.inner.write() else {
            return;
        };
        if inner.entries.contains_key(&key) {
            inner.entries.insert(key, result);
            return;
        }
        while inner.entries.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(key, result);
    }

    /// Drop one entry; returns whether it was present
    pub fn evict(&self, key: &str) -> bool {
        let Ok(mut inner) = self.inner.write() else {
            return false;
        };
        inner.order.retain(|k| k != key);
        inner.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.entries.clear();
            inner.order.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ExpansionCache {
    fn default() -> Self {
        Self::new(glyphic_core::ExpanderConfig::default().cache_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expander::ExpansionMethod;

    fn result(text: &str) -> ExpansionResult {
        ExpansionResult {
            expanded_text: text.to_string(),
            confidence: 0.6,
            transformations: Vec::new(),
            method: ExpansionMethod::Passthrough,
        }
    }

    #[test]
    fn test_key_normalizes_labels() {
        assert_eq!(
            ExpansionCache::key_for(["Me", " want ", "COOKIE"]),
            ExpansionCache::key_for(["me", "want", "cookie"])
        );
        assert_ne!(
            ExpansionCache::key_for(["ice cream"]),
            ExpansionCache::key_for(["ice", "cream"])
        );
    }

    #[test]
    fn test_evicts_oldest_at_capacity() {
        let cache = ExpansionCache::new(2);
        cache.insert("a".to_string(), result("A."));
        cache.insert("b".to_string(), result("B."));
        cache.insert("c".to_string(), result("C."));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("c").unwrap().expanded_text, "C.");
    }

    #[test]
    fn test_overwrite_keeps_single_slot() {
        let cache = ExpansionCache::new(2);
        cache.insert("a".to_string(), result("A."));
        cache.insert("a".to_string(), result("A!"));
        cache.insert("b".to_string(), result("B."));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().expanded_text, "A!");
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = ExpansionCache::new(0);
        cache.insert("a".to_string(), result("A."));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_evict_and_clear() {
        let cache = ExpansionCache::new(4);
        cache.insert("a".to_string(), result("A."));
        cache.insert("b".to_string(), result("B."));
        assert!(cache.evict("a"));
        assert!(!cache.evict("a"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
