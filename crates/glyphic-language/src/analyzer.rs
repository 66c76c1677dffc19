//! Intent classification and semantic role labelling for symbol sequences

use glyphic_core::{normalize_label, SymbolRef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

const KEYWORD_CONFIDENCE: f64 = 0.85;
const PATTERN_CONFIDENCE: f64 = 0.65;
const FALLBACK_CONFIDENCE: f64 = 0.4;

/// Communicative intent of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Request,
    Question,
    Refusal,
    Greeting,
    Feeling,
    Description,
    Statement,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Request => "request",
            Intent::Question => "question",
            Intent::Refusal => "refusal",
            Intent::Greeting => "greeting",
            Intent::Feeling => "feeling",
            Intent::Description => "description",
            Intent::Statement => "statement",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic role a symbol plays in its sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticRole {
    Agent,
    Action,
    Object,
    Place,
    Descriptor,
    Time,
    Question,
    Social,
    Feeling,
    Negation,
    Quantity,
    /// Category missing or not in the role table
    #[serde(rename = "general")]
    Unclassified,
}

struct CategoryRoles {
    role: SemanticRole,
    categories: &'static [&'static str],
}

const CATEGORY_ROLE_MAP: &[CategoryRoles] = &[
    CategoryRoles {
        role: SemanticRole::Agent,
        categories: &["people", "person", "pronouns", "pronoun", "family", "names"],
    },
    CategoryRoles {
        role: SemanticRole::Action,
        categories: &["actions", "action", "verbs", "verb"],
    },
    CategoryRoles {
        role: SemanticRole::Object,
        categories: &[
            "objects", "object", "food", "drinks", "toys", "nouns", "noun", "animals", "clothing",
            "body", "things",
        ],
    },
    CategoryRoles {
        role: SemanticRole::Place,
        categories: &["places", "place", "locations", "location"],
    },
    CategoryRoles {
        role: SemanticRole::Descriptor,
        categories: &[
            "descriptors",
            "descriptor",
            "adjectives",
            "adjective",
            "colors",
            "colours",
            "size",
        ],
    },
    CategoryRoles {
        role: SemanticRole::Time,
        categories: &["time", "days", "schedule"],
    },
    CategoryRoles {
        role: SemanticRole::Question,
        categories: &["questions", "question"],
    },
    CategoryRoles {
        role: SemanticRole::Social,
        categories: &["social", "greetings", "manners"],
    },
    CategoryRoles {
        role: SemanticRole::Feeling,
        categories: &["feelings", "feeling", "emotions"],
    },
    CategoryRoles {
        role: SemanticRole::Negation,
        categories: &["negation", "negatives"],
    },
    CategoryRoles {
        role: SemanticRole::Quantity,
        categories: &["numbers", "quantity", "quantities"],
    },
];

impl SemanticRole {
    pub fn from_category(category: Option<&str>) -> Self {
        let Some(category) = category.map(normalize_label) else {
            return SemanticRole::Unclassified;
        };
        CATEGORY_ROLE_MAP
            .iter()
            .find(|entry| entry.categories.contains(&category.as_str()))
            .map(|entry| entry.role)
            .unwrap_or(SemanticRole::Unclassified)
    }
}

struct IntentKeywords {
    intent: Intent,
    keywords: &'static [&'static str],
}

/// Keyword table in priority order; the first intent with a hit wins
const INTENT_KEYWORD_MAP: &[IntentKeywords] = &[
    IntentKeywords {
        intent: Intent::Question,
        keywords: &["what", "where", "who", "when", "why", "how", "which"],
    },
    IntentKeywords {
        intent: Intent::Request,
        keywords: &["want", "need", "give", "more", "help", "please", "can i"],
    },
    IntentKeywords {
        intent: Intent::Refusal,
        keywords: &["no", "stop", "don't", "dont", "not", "all done", "finished"],
    },
    IntentKeywords {
        intent: Intent::Greeting,
        keywords: &[
            "hello",
            "hi",
            "hey",
            "bye",
            "goodbye",
            "good morning",
            "good night",
            "thanks",
            "thank you",
        ],
    },
    IntentKeywords {
        intent: Intent::Feeling,
        keywords: &[
            "feel", "happy", "sad", "angry", "mad", "tired", "scared", "sick", "hurt", "excited",
            "bored", "hungry", "thirsty",
        ],
    },
];

struct IntentPattern {
    intent: Intent,
    roles: &'static [SemanticRole],
}

/// Role patterns, longer first; matched against the sequence prefix
const INTENT_PATTERNS: &[IntentPattern] = &[
    IntentPattern {
        intent: Intent::Request,
        roles: &[SemanticRole::Agent, SemanticRole::Action, SemanticRole::Object],
    },
    IntentPattern {
        intent: Intent::Question,
        roles: &[SemanticRole::Question, SemanticRole::Agent, SemanticRole::Action],
    },
    IntentPattern {
        intent: Intent::Feeling,
        roles: &[SemanticRole::Agent, SemanticRole::Feeling],
    },
    IntentPattern {
        intent: Intent::Greeting,
        roles: &[SemanticRole::Social, SemanticRole::Agent],
    },
    IntentPattern {
        intent: Intent::Description,
        roles: &[SemanticRole::Object, SemanticRole::Descriptor],
    },
    IntentPattern {
        intent: Intent::Request,
        roles: &[SemanticRole::Action, SemanticRole::Object],
    },
];

/// Role assigned to one symbol of the analyzed sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub label: String,
    pub category: Option<String>,
    pub role: SemanticRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticAnalysis {
    pub intent: Intent,
    pub confidence: f64,
    /// One entry per input symbol, in input order
    pub roles: Vec<RoleAssignment>,
    pub summary: String,
    pub symbol_count: usize,
    /// Distinct non-empty categories
    pub unique_categories: usize,
}

impl SemanticAnalysis {
    fn empty() -> Self {
        Self {
            intent: Intent::Unknown,
            confidence: 0.0,
            roles: Vec::new(),
            summary: "empty sequence".to_string(),
            symbol_count: 0,
            unique_categories: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SemanticAnalyzer;

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, sequence: &[SymbolRef]) -> SemanticAnalysis {
        if sequence.is_empty() {
            return SemanticAnalysis::empty();
        }

        let roles: Vec<RoleAssignment> = sequence
            .iter()
            .map(|symbol| RoleAssignment {
                label: symbol.label.clone(),
                category: symbol.category.clone(),
                role: SemanticRole::from_category(symbol.category.as_deref()),
            })
            .collect();

        let labels: Vec<String> = sequence.iter().map(SymbolRef::normalized_label).collect();
        let role_sequence: Vec<SemanticRole> = roles.iter().map(|r| r.role).collect();

        let (intent, confidence) = match_keywords(&labels)
            .map(|intent| (intent, KEYWORD_CONFIDENCE))
            .or_else(|| match_patterns(&role_sequence).map(|intent| (intent, PATTERN_CONFIDENCE)))
            .unwrap_or((Intent::Statement, FALLBACK_CONFIDENCE));

        let unique_categories = sequence
            .iter()
            .filter_map(|s| s.category.as_deref().map(normalize_label))
            .filter(|c| !c.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let summary = format!(
            "{}: {} ({} symbols, {} categories)",
            intent,
            labels.join(" "),
            sequence.len(),
            unique_categories
        );

        SemanticAnalysis {
            intent,
            confidence,
            roles,
            summary,
            symbol_count: sequence.len(),
            unique_categories,
        }
    }
}

fn match_keywords(labels: &[String]) -> Option<Intent> {
    INTENT_KEYWORD_MAP
        .iter()
        .find(|entry| labels.iter().any(|l| entry.keywords.contains(&l.as_str())))
        .map(|entry| entry.intent)
}

fn match_patterns(roles: &[SemanticRole]) -> Option<Intent> {
    INTENT_PATTERNS
        .iter()
        .find(|pattern| pattern_matches(pattern.roles, roles))
        .map(|pattern| pattern.intent)
}

/// Positional prefix comparison tolerating a single mismatch
fn pattern_matches(pattern: &[SemanticRole], roles: &[SemanticRole]) -> bool {
    if pattern.len() > roles.len() {
        return false;
    }
    let mismatches = pattern
        .iter()
        .zip(roles)
        .filter(|(expected, actual)| expected != actual)
        .count();
    mismatches <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(items: &[(&str, &str)]) -> Vec<SymbolRef> {
        items
            .iter()
            .map(|(label, category)| SymbolRef::new(*label, Some(category)))
            .collect()
    }

    #[test]
    fn test_empty_sequence_is_unknown() {
        let analysis = SemanticAnalyzer::new().analyze(&[]);
        assert_eq!(analysis.intent, Intent::Unknown);
        assert_eq!(analysis.confidence, 0.0);
        assert!(analysis.roles.is_empty());
        assert_eq!(analysis.symbol_count, 0);
    }

    #[test]
    fn test_keyword_request() {
        let analysis =
            SemanticAnalyzer::new().analyze(&seq(&[("want", "actions"), ("cookie", "food")]));
        assert_eq!(analysis.intent, Intent::Request);
        assert_eq!(analysis.confidence, 0.85);
        assert_eq!(analysis.roles[0].role, SemanticRole::Action);
        assert_eq!(analysis.roles[1].role, SemanticRole::Object);
        assert_eq!(analysis.unique_categories, 2);
    }

    #[test]
    fn test_keyword_priority_question_over_request() {
        let analysis = SemanticAnalyzer::new().analyze(&seq(&[
            ("what", "questions"),
            ("want", "actions"),
        ]));
        assert_eq!(analysis.intent, Intent::Question);
    }

    #[test]
    fn test_keyword_match_ignores_case() {
        let analysis = SemanticAnalyzer::new().analyze(&seq(&[("Hello", "social")]));
        assert_eq!(analysis.intent, Intent::Greeting);
    }

    #[test]
    fn test_pattern_with_one_mismatch() {
        // agent, action, place vs request pattern agent, action, object
        let analysis = SemanticAnalyzer::new().analyze(&seq(&[
            ("mom", "people"),
            ("go", "actions"),
            ("park", "places"),
        ]));
        assert_eq!(analysis.intent, Intent::Request);
        assert_eq!(analysis.confidence, 0.65);
    }

    #[test]
    fn test_pattern_never_longer_than_sequence() {
        assert!(!pattern_matches(
            &[SemanticRole::Agent, SemanticRole::Action, SemanticRole::Object],
            &[SemanticRole::Agent, SemanticRole::Action],
        ));
    }

    #[test]
    fn test_fallback_statement() {
        let analysis =
            SemanticAnalyzer::new().analyze(&seq(&[("today", "time"), ("morning", "time")]));
        assert_eq!(analysis.intent, Intent::Statement);
        assert_eq!(analysis.confidence, 0.4);

        let single = SemanticAnalyzer::new().analyze(&seq(&[("zebra", "spaceships")]));
        assert_eq!(single.intent, Intent::Statement);
    }

    #[test]
    fn test_unmapped_category_is_general() {
        assert_eq!(
            SemanticRole::from_category(Some("spaceships")),
            SemanticRole::Unclassified
        );
        assert_eq!(SemanticRole::from_category(None), SemanticRole::Unclassified);
        assert_eq!(
            serde_json::to_string(&SemanticRole::Unclassified).unwrap(),
            "\"general\""
        );
    }

    #[test]
    fn test_summary_mentions_intent_and_labels() {
        let analysis =
            SemanticAnalyzer::new().analyze(&seq(&[("want", "actions"), ("cookie", "food")]));
        assert_eq!(
            analysis.summary,
            "request: want cookie (2 symbols, 2 categories)"
        );
    }
}
