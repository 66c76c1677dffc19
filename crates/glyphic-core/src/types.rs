//! Core symbol types shared by analysis, expansion and prediction

use serde::{Deserialize, Serialize};

/// Language used when a caller passes an empty language preference
pub const DEFAULT_LANGUAGE: &str = "en";

/// Lightweight snapshot of a catalog symbol.
///
/// Decoupled from storage so analysis can run on sequences that were never
/// saved: `id` and `category` are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRef {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl SymbolRef {
    pub fn new(label: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            id: None,
            label: label.into(),
            category: category.map(str::to_string),
            language: default_language(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn normalized_label(&self) -> String {
        normalize_label(&self.label)
    }

    /// Parse `label[:category]` shorthand, e.g. `want:actions`
    pub fn parse(shorthand: &str) -> Self {
        match shorthand.split_once(':') {
            Some((label, category)) if !category.trim().is_empty() => {
                Self::new(label.trim(), Some(category.trim()))
            }
            Some((label, _)) => Self::new(label.trim(), None),
            None => Self::new(shorthand.trim(), None),
        }
    }
}

impl From<&CatalogSymbol> for SymbolRef {
    fn from(symbol: &CatalogSymbol) -> Self {
        Self {
            id: Some(symbol.id.clone()),
            label: symbol.label.clone(),
            category: Some(symbol.category.clone()),
            language: symbol.language.clone(),
        }
    }
}

/// Canonical symbol identity as held by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSymbol {
    pub id: String,
    pub label: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl CatalogSymbol {
    pub fn new(id: &str, label: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            category: category.to_string(),
            keywords: Vec::new(),
            language: default_language(),
            image_ref: None,
        }
    }

    /// Label or any keyword matches after normalization
    pub fn answers_to(&self, label: &str) -> bool {
        let wanted = normalize_label(label);
        normalize_label(&self.label) == wanted
            || self.keywords.iter().any(|k| normalize_label(k) == wanted)
    }

    /// Catalog languages may be regional (`en-GB`); compare primary codes
    pub fn speaks(&self, language: &str) -> bool {
        primary_language(&self.language) == primary_language(language)
    }
}

/// A symbol placed on a communication board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCell {
    pub symbol: CatalogSymbol,
    /// Layout order on the board (row-major)
    pub position: usize,
    #[serde(default)]
    pub hidden: bool,
}

/// Lowercase and collapse internal whitespace
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Two-letter primary code of a language tag (`en-US` -> `en`)
pub fn primary_language(tag: &str) -> String {
    let code: String = tag
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .take(2)
        .collect::<String>()
        .to_lowercase();
    if code.len() == 2 {
        code
    } else {
        DEFAULT_LANGUAGE.to_string()
    }
}

/// Ordered, de-duplicated primary codes from a `es,en`-style preference list
pub fn language_preferences(preference: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for tag in preference.split(',').filter(|t| !t.trim().is_empty()) {
        let code = primary_language(tag);
        if !languages.contains(&code) {
            languages.push(code);
        }
    }
    if languages.is_empty() {
        languages.push(DEFAULT_LANGUAGE.to_string());
    }
    languages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Thank   You "), "thank you");
        assert_eq!(normalize_label("COOKIE"), "cookie");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_primary_language() {
        assert_eq!(primary_language("en-US"), "en");
        assert_eq!(primary_language("ES"), "es");
        assert_eq!(primary_language(""), "en");
        assert_eq!(primary_language("x"), "en");
    }

    #[test]
    fn test_language_preferences_dedup() {
        assert_eq!(language_preferences("es-MX, en, es"), vec!["es", "en"]);
        assert_eq!(language_preferences(""), vec!["en"]);
    }

    #[test]
    fn test_symbol_ref_parse() {
        let s = SymbolRef::parse("want:actions");
        assert_eq!(s.label, "want");
        assert_eq!(s.category.as_deref(), Some("actions"));

        let bare = SymbolRef::parse("cookie");
        assert_eq!(bare.category, None);
        assert_eq!(bare.language, "en");
    }

    #[test]
    fn test_catalog_symbol_answers_to_keywords() {
        let mut symbol = CatalogSymbol::new("s1", "Toilet", "places");
        symbol.keywords = vec!["bathroom".to_string()];
        assert!(symbol.answers_to("toilet"));
        assert!(symbol.answers_to("Bathroom"));
        assert!(!symbol.answers_to("kitchen"));
    }

    #[test]
    fn test_symbol_ref_from_catalog() {
        let symbol = CatalogSymbol::new("s9", "park", "places");
        let snapshot = SymbolRef::from(&symbol);
        assert_eq!(snapshot.id.as_deref(), Some("s9"));
        assert_eq!(snapshot.category.as_deref(), Some("places"));
    }
}
