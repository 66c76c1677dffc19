//! Static per-language word tables used when a user has little or no history

use glyphic_core::{normalize_label, primary_language};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A word and the catalog category it usually lives in
pub type VocabularyEntry = (&'static str, &'static str);

const EN_STANDARD: &[VocabularyEntry] = &[
    ("I", "pronouns"),
    ("want", "actions"),
    ("more", "descriptors"),
    ("go", "actions"),
    ("stop", "actions"),
    ("help", "actions"),
    ("yes", "social"),
    ("no", "social"),
    ("eat", "actions"),
    ("drink", "actions"),
    ("like", "actions"),
    ("you", "pronouns"),
    ("play", "actions"),
    ("finished", "descriptors"),
    ("please", "social"),
    ("bathroom", "places"),
];

const ES_STANDARD: &[VocabularyEntry] = &[
    ("yo", "pronouns"),
    ("quiero", "actions"),
    ("más", "descriptors"),
    ("ir", "actions"),
    ("parar", "actions"),
    ("ayuda", "actions"),
    ("sí", "social"),
    ("no", "social"),
    ("comer", "actions"),
    ("beber", "actions"),
    ("gusta", "actions"),
    ("tú", "pronouns"),
    ("jugar", "actions"),
    ("terminado", "descriptors"),
    ("por favor", "social"),
    ("baño", "places"),
];

/// Context (one or two trailing labels) -> likely next labels
type NgramTable = &'static [(&'static str, &'static [&'static str])];

const EN_NGRAMS: NgramTable = &[
    ("i want", &["more", "to", "that", "help"]),
    ("i need", &["help", "bathroom", "break"]),
    ("want to", &["go", "play", "eat", "watch"]),
    ("go to", &["the", "school", "bed", "bathroom"]),
    ("i", &["want", "need", "like", "feel", "am", "can"]),
    ("you", &["want", "like", "are", "can"]),
    ("want", &["more", "to", "eat", "drink", "play", "help"]),
    ("need", &["help", "bathroom", "water", "break"]),
    ("like", &["to", "that", "it", "music"]),
    ("go", &["to", "home", "outside", "now"]),
    ("to", &["go", "eat", "play", "the"]),
    ("the", &["park", "bathroom", "store", "car"]),
    ("more", &["please", "food", "water", "music"]),
    ("feel", &["happy", "sad", "tired", "sick"]),
    ("am", &["hungry", "tired", "happy", "done"]),
    ("eat", &["now", "more", "lunch", "snack"]),
    ("drink", &["water", "juice", "milk", "more"]),
    ("play", &["outside", "with", "game", "ball"]),
    ("can", &["i", "you", "we", "go"]),
    ("what", &["is", "do", "time", "that"]),
    ("where", &["is", "are", "go", "mom"]),
];

const ES_NGRAMS: NgramTable = &[
    ("yo quiero", &["más", "comer", "jugar", "agua"]),
    ("quiero ir", &["a", "casa", "afuera", "baño"]),
    ("yo", &["quiero", "necesito", "tengo", "estoy"]),
    ("quiero", &["más", "comer", "jugar", "agua", "ir"]),
    ("necesito", &["ayuda", "baño", "agua"]),
    ("me", &["gusta", "duele", "siento"]),
    ("gusta", &["eso", "jugar", "música"]),
    ("ir", &["a", "casa", "afuera"]),
    ("a", &["la", "casa", "jugar"]),
    ("la", &["escuela", "casa", "tienda"]),
    ("más", &["por favor", "agua", "comida"]),
    ("estoy", &["cansado", "feliz", "triste", "listo"]),
    ("tengo", &["hambre", "sed", "frío", "sueño"]),
    ("dónde", &["está", "están", "vamos"]),
    ("qué", &["es", "hora", "quieres"]),
];

/// Word-class shortcuts a caller can request instead of a full prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryIntent {
    Pronouns,
    Verbs,
    Articles,
    Nouns,
    Places,
}

impl CategoryIntent {
    pub const ALL: [CategoryIntent; 5] = [
        CategoryIntent::Pronouns,
        CategoryIntent::Verbs,
        CategoryIntent::Articles,
        CategoryIntent::Nouns,
        CategoryIntent::Places,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryIntent::Pronouns => "pronouns",
            CategoryIntent::Verbs => "verbs",
            CategoryIntent::Articles => "articles",
            CategoryIntent::Nouns => "nouns",
            CategoryIntent::Places => "places",
        }
    }

    /// Catalog categories that heuristically belong to this word class
    pub fn catalog_categories(&self) -> &'static [&'static str] {
        match self {
            CategoryIntent::Pronouns => &["pronouns", "people"],
            CategoryIntent::Verbs => &["actions", "verbs"],
            CategoryIntent::Articles => &["articles", "determiners"],
            CategoryIntent::Nouns => NOUN_CATEGORIES,
            CategoryIntent::Places => &["places", "locations"],
        }
    }

    /// Fixed closed word list for this class in a language
    pub fn closed_list(&self, language: &str) -> &'static [&'static str] {
        let spanish = primary_language(language) == "es";
        match (self, spanish) {
            (CategoryIntent::Pronouns, false) => &[
                "i", "you", "he", "she", "it", "we", "they", "me", "my", "your",
            ],
            (CategoryIntent::Pronouns, true) => &[
                "yo", "tú", "él", "ella", "nosotros", "ellos", "ellas", "me", "mi", "tu",
            ],
            (CategoryIntent::Verbs, false) => &[
                "want", "go", "like", "need", "eat", "drink", "play", "help", "see", "have",
            ],
            (CategoryIntent::Verbs, true) => &[
                "quiero", "ir", "gusta", "necesito", "comer", "beber", "jugar", "ayuda", "ver",
                "tengo",
            ],
            (CategoryIntent::Articles, false) => &["a", "an", "the", "this", "that", "some"],
            (CategoryIntent::Articles, true) => &[
                "el", "la", "los", "las", "un", "una", "unos", "unas",
            ],
            (CategoryIntent::Nouns, false) => &[
                "food", "water", "toy", "ball", "book", "music", "juice", "snack",
            ],
            (CategoryIntent::Nouns, true) => &[
                "comida", "agua", "juguete", "pelota", "libro", "música", "jugo",
            ],
            (CategoryIntent::Places, false) => &[
                "home", "school", "park", "store", "bathroom", "outside",
            ],
            (CategoryIntent::Places, true) => &[
                "casa", "escuela", "parque", "tienda", "baño", "afuera",
            ],
        }
    }
}

impl fmt::Display for CategoryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        CategoryIntent::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown category intent '{s}'"))
    }
}

/// Categories whose symbols behave like nouns
const NOUN_CATEGORIES: &[&str] = &[
    "food", "drinks", "objects", "animals", "toys", "nouns", "clothing", "body", "people",
    "places", "vehicles",
];

pub fn is_noun_like(category: Option<&str>) -> bool {
    category.is_some_and(|c| NOUN_CATEGORIES.contains(&normalize_label(c).as_str()))
}

/// Core words for a language; unknown languages get English
pub fn standard_vocabulary(language: &str) -> &'static [VocabularyEntry] {
    match primary_language(language).as_str() {
        "es" => ES_STANDARD,
        _ => EN_STANDARD,
    }
}

/// Static continuations for the trailing labels of `context`.
///
/// The two-label context is tried before the one-label context and both
/// contribute, longest first. Languages without a table contribute nothing.
pub fn ngram_next(language: &str, context: &[String]) -> Vec<&'static str> {
    let table = match primary_language(language).as_str() {
        "en" => EN_NGRAMS,
        "es" => ES_NGRAMS,
        _ => return Vec::new(),
    };

    let normalized: Vec<String> = context.iter().map(|l| normalize_label(l)).collect();
    let mut keys = Vec::new();
    if let [.., a, b] = normalized.as_slice() {
        keys.push(format!("{a} {b}"));
    }
    if let Some(last) = normalized.last() {
        keys.push(last.clone());
    }

    let mut next: Vec<&'static str> = Vec::new();
    for key in keys {
        if let Some((_, labels)) = table.iter().find(|(k, _)| *k == key) {
            for &label in labels.iter() {
                if !next.contains(&label) {
                    next.push(label);
                }
            }
        }
    }
    next
}

/// Terminal punctuation offered at the first page of every prediction
pub const PUNCTUATION: &[&str] = &[".", "?", "!"];

#[cfg(test)]
mod tests {
    use super::*;

    fn context(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_ngram_longest_context_first() {
        let next = ngram_next("en", &context(&["I", "want"]));
        assert_eq!(&next[..4], &["more", "to", "that", "help"]);
        // one-label continuations follow without duplicates
        assert!(next.contains(&"eat"));
        assert_eq!(next.iter().filter(|l| **l == "more").count(), 1);
    }

    #[test]
    fn test_ngram_unknown_language_or_context() {
        assert!(ngram_next("fr", &context(&["je"])).is_empty());
        assert!(ngram_next("en", &context(&["zebra"])).is_empty());
        assert!(ngram_next("en", &[]).is_empty());
    }

    #[test]
    fn test_standard_vocabulary_by_language() {
        assert_eq!(standard_vocabulary("es-MX")[0].0, "yo");
        assert_eq!(standard_vocabulary("de")[0].0, "I");
    }

    #[test]
    fn test_category_intent_parse() {
        assert_eq!("Verbs".parse::<CategoryIntent>(), Ok(CategoryIntent::Verbs));
        assert!("adverbs".parse::<CategoryIntent>().is_err());
    }

    #[test]
    fn test_closed_lists_per_language() {
        assert!(CategoryIntent::Articles.closed_list("en").contains(&"the"));
        assert!(CategoryIntent::Articles.closed_list("es").contains(&"la"));
    }

    #[test]
    fn test_noun_like_categories() {
        assert!(is_noun_like(Some("Food")));
        assert!(!is_noun_like(Some("actions")));
        assert!(!is_noun_like(None));
    }
}
