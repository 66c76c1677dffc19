//! Telegraphic gloss to grammatical sentence expansion

use crate::analyzer::{Intent, SemanticAnalysis};
use crate::cache::ExpansionCache;
use crate::lexicon;
use crate::stages::{Clause, PIPELINE};
use glyphic_core::{ExpanderConfig, SymbolRef};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static WORD_RE: OnceLock<Regex> = OnceLock::new();

const SHORTCUT_CONFIDENCE: f64 = 0.95;
const PASSTHROUGH_CONFIDENCE: f64 = 0.6;
const BASE_CONFIDENCE: f64 = 0.7;
const PER_STAGE_BONUS: f64 = 0.05;
const MAX_STAGE_BONUS: f64 = 0.2;
const MAX_CONFIDENCE: f64 = 0.95;

/// How an expansion was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionMethod {
    /// Single-symbol phrase table
    Phrase,
    /// At least one rewrite stage fired
    Rules,
    /// Only polishing applied
    Passthrough,
    /// Nothing to expand
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionResult {
    pub expanded_text: String,
    pub confidence: f64,
    /// Names of the stages that fired, in pipeline order
    pub transformations: Vec<String>,
    pub method: ExpansionMethod,
}

impl ExpansionResult {
    fn empty() -> Self {
        Self {
            expanded_text: String::new(),
            confidence: 0.0,
            transformations: Vec::new(),
            method: ExpansionMethod::Empty,
        }
    }
}

/// Confidence for a rule-based expansion that fired `stages` stages
pub fn rule_confidence(stages: usize) -> f64 {
    if stages == 0 {
        return PASSTHROUGH_CONFIDENCE;
    }
    let bonus = (PER_STAGE_BONUS * stages as f64).min(MAX_STAGE_BONUS);
    (BASE_CONFIDENCE + bonus).min(MAX_CONFIDENCE)
}

fn tokenize(text: &str) -> Vec<String> {
    let re = WORD_RE.get_or_init(|| {
        Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}]+)?").expect("word pattern is valid")
    });
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Collapse whitespace, capitalize, and close with punctuation
fn polish(words: &[String], terminal: Option<char>) -> String {
    let mut text = words
        .iter()
        .map(|w| {
            let lower = w.to_lowercase();
            if lower == "i" || lower.starts_with("i'") {
                format!("I{}", &w[1..])
            } else {
                w.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if let Some(first) = text.chars().next() {
        let upper: String = first.to_uppercase().collect();
        text.replace_range(..first.len_utf8(), &upper);
    }

    match terminal {
        Some(mark) => {
            text = text.trim_end_matches(['.', '!', '?']).to_string();
            text.push(mark);
        }
        None if !text.ends_with(['.', '!', '?']) => text.push('.'),
        None => {}
    }
    text
}

/// Expands symbol gloss through a fixed stage pipeline, memoizing results
#[derive(Debug, Default)]
pub struct GrammarExpander {
    cache: ExpansionCache,
}

impl GrammarExpander {
    pub fn new(config: &ExpanderConfig) -> Self {
        Self::with_cache(ExpansionCache::new(config.cache_capacity))
    }

    pub fn with_cache(cache: ExpansionCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ExpansionCache {
        &self.cache
    }

    /// Expand a sequence. The cache key is the normalized label sequence
    /// alone, so `raw_text` and `analysis` do not distinguish cache entries.
    pub fn expand(
        &self,
        sequence: &[SymbolRef],
        raw_text: &str,
        analysis: Option<&SemanticAnalysis>,
    ) -> ExpansionResult {
        if sequence.is_empty() {
            // nothing to key on; never cached
            return if raw_text.trim().is_empty() {
                ExpansionResult::empty()
            } else {
                run_pipeline(tokenize(raw_text), analysis)
            };
        }

        let key = ExpansionCache::key_for(sequence.iter().map(|s| s.label.as_str()));
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(key = %key, "expansion cache hit");
            return hit;
        }

        let result = expand_uncached(sequence, raw_text, analysis);
        self.cache.insert(key, result.clone());
        result
    }
}

fn expand_uncached(
    sequence: &[SymbolRef],
    raw_text: &str,
    analysis: Option<&SemanticAnalysis>,
) -> ExpansionResult {
    if let [only] = sequence {
        if let Some(phrase) = lexicon::single_symbol_phrase(&only.normalized_label()) {
            return ExpansionResult {
                expanded_text: polish(&tokenize_phrase(phrase), None),
                confidence: SHORTCUT_CONFIDENCE,
                transformations: vec!["single_symbol".to_string()],
                method: ExpansionMethod::Phrase,
            };
        }
    }

    // raw text without any word (blank, or only punctuation) falls back to the labels
    let mut words = tokenize(raw_text);
    if words.is_empty() {
        let labels: Vec<&str> = sequence.iter().map(|s| s.label.as_str()).collect();
        words = tokenize(&labels.join(" "));
    }
    run_pipeline(words, analysis)
}

/// Phrase table entries keep their own punctuation
fn tokenize_phrase(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(str::to_string).collect()
}

fn run_pipeline(words: Vec<String>, analysis: Option<&SemanticAnalysis>) -> ExpansionResult {
    if words.is_empty() {
        return ExpansionResult::empty();
    }

    let intent = analysis.map(|a| a.intent).unwrap_or(Intent::Unknown);
    let mut clause = Clause::new(words, intent);
    let mut transformations = Vec::new();

    for stage in PIPELINE {
        if let Some(rewritten) = (stage.apply)(&clause) {
            clause = rewritten;
            transformations.push(stage.name.to_string());
        }
    }

    let method = if transformations.is_empty() {
        ExpansionMethod::Passthrough
    } else {
        ExpansionMethod::Rules
    };

    ExpansionResult {
        expanded_text: polish(&clause.words, clause.terminal),
        confidence: rule_confidence(transformations.len()),
        transformations,
        method,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SemanticAnalyzer;

    fn seq(labels: &[&str]) -> Vec<SymbolRef> {
        labels.iter().map(|l| SymbolRef::new(*l, None)).collect()
    }

    #[test]
    fn test_single_symbol_shortcut() {
        let expander = GrammarExpander::default();
        let result = expander.expand(&seq(&["happy"]), "happy", None);
        assert_eq!(result.expanded_text, "I feel happy.");
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.method, ExpansionMethod::Phrase);
    }

    #[test]
    fn test_shortcut_keeps_phrase_punctuation() {
        let expander = GrammarExpander::default();
        let result = expander.expand(&seq(&["Hello"]), "", None);
        assert_eq!(result.expanded_text, "Hello!");
    }

    #[test]
    fn test_pronoun_and_article() {
        let expander = GrammarExpander::default();
        let result = expander.expand(&seq(&["me", "want", "cookie"]), "me want cookie", None);
        assert_eq!(result.expanded_text, "I want a cookie.");
        assert_eq!(result.transformations, vec!["pronoun", "article"]);
        assert!((result.confidence - 0.8).abs() < 1e-9);
        assert_eq!(result.method, ExpansionMethod::Rules);
    }

    #[test]
    fn test_past_tense_with_motion_article() {
        let expander = GrammarExpander::default();
        let result = expander.expand(
            &seq(&["yesterday", "me", "go", "park"]),
            "yesterday me go park",
            None,
        );
        assert_eq!(result.expanded_text, "Yesterday I went to the park.");
        assert_eq!(result.transformations, vec!["tense", "pronoun", "article"]);
    }

    #[test]
    fn test_third_person_conjugation() {
        let expander = GrammarExpander::default();
        let result = expander.expand(&seq(&["mom", "go", "store"]), "", None);
        assert_eq!(result.expanded_text, "Mom goes to the store.");
        assert_eq!(result.transformations, vec!["article", "conjugation"]);
    }

    #[test]
    fn test_question_from_analysis() {
        let analyzer = SemanticAnalyzer::new();
        let sequence = vec![
            SymbolRef::new("where", Some("questions")),
            SymbolRef::new("dog", Some("animals")),
        ];
        let analysis = analyzer.analyze(&sequence);
        let result = GrammarExpander::default().expand(&sequence, "where dog", Some(&analysis));
        assert_eq!(result.expanded_text, "Where is dog?");
        assert_eq!(result.transformations, vec!["question"]);
    }

    #[test]
    fn test_passthrough_confidence() {
        let result = GrammarExpander::default().expand(&seq(&["red", "ball"]), "", None);
        assert_eq!(result.expanded_text, "Red ball.");
        assert_eq!(result.confidence, 0.6);
        assert!(result.transformations.is_empty());
        assert_eq!(result.method, ExpansionMethod::Passthrough);
    }

    #[test]
    fn test_empty_input() {
        let result = GrammarExpander::default().expand(&[], "  ", None);
        assert_eq!(result.expanded_text, "");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.method, ExpansionMethod::Empty);
    }

    #[test]
    fn test_rule_confidence_caps() {
        assert_eq!(rule_confidence(0), 0.6);
        assert!((rule_confidence(1) - 0.75).abs() < 1e-9);
        assert!((rule_confidence(4) - 0.9).abs() < 1e-9);
        assert!((rule_confidence(5) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_call_hits_cache() {
        let expander = GrammarExpander::default();
        let sequence = seq(&["me", "want", "cookie"]);
        let first = expander.expand(&sequence, "me want cookie", None);
        let second = expander.expand(&sequence, "me want cookie", None);
        assert_eq!(first, second);
        assert_eq!(expander.cache().len(), 1);
    }

    #[test]
    fn test_cache_key_ignores_raw_text() {
        let expander = GrammarExpander::default();
        let sequence = seq(&["me", "want", "cookie"]);
        let first = expander.expand(&sequence, "me want cookie", None);
        let stale = expander.expand(&sequence, "me want big cookie", None);
        assert_eq!(first, stale);
    }

    #[test]
    fn test_punctuation_only_text_uses_labels() {
        let expander = GrammarExpander::default();
        let sequence = seq(&["want", "cookie"]);
        let result = expander.expand(&sequence, "?", None);
        assert_ne!(result.method, ExpansionMethod::Empty);
        assert!(result.expanded_text.starts_with("Want"), "{}", result.expanded_text);
        assert!(result.confidence > 0.0);
        assert_eq!(expander.expand(&sequence, "want cookie", None), result);
    }

    #[test]
    fn test_doubled_multibyte_letter_does_not_panic() {
        let expander = GrammarExpander::default();
        let result = expander.expand(&seq(&["ññed", "ball"]), "", None);
        assert!((0.0..=1.0).contains(&result.confidence));
        assert!(result.expanded_text.starts_with("Ññed"), "{}", result.expanded_text);
    }

    #[test]
    fn test_polish_capitalizes_standalone_i() {
        let words: Vec<String> = ["yes", "i", "can"].iter().map(|w| w.to_string()).collect();
        assert_eq!(polish(&words, None), "Yes I can.");
        assert_eq!(polish(&words, Some('?')), "Yes I can?");
    }
}
