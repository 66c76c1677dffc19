//! Prediction tiers and the combinator that merges their output.
//!
//! Each tier is a [`SuggestionSource`]. The engine walks them in order,
//! feeding results through one [`SuggestionMerger`] that drops duplicate
//! normalized labels and stops at its capacity.

use crate::analytics::{LabelCount, NextSymbol, UsageAnalytics};
use crate::model::ModelCache;
use crate::vocabulary::{self, is_noun_like};
use glyphic_core::{
    normalize_label, BoardCell, CatalogSymbol, PredictionConfig, StoreResult, SymbolCatalog,
    SymbolRef, DEFAULT_LANGUAGE,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Which tier produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    History,
    LanguageModel,
    Ngram,
    Frequency,
    Board,
    ColdStart,
    Punctuation,
    /// Category-intent shortcut, outside the waterfall
    Category,
}

impl SourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTier::History => "history",
            SourceTier::LanguageModel => "language_model",
            SourceTier::Ngram => "ngram",
            SourceTier::Frequency => "frequency",
            SourceTier::Board => "board",
            SourceTier::ColdStart => "cold_start",
            SourceTier::Punctuation => "punctuation",
            SourceTier::Category => "category",
        }
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked next-symbol candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub symbol_id: Option<String>,
    pub label: String,
    pub category: Option<String>,
    pub image_ref: Option<String>,
    pub confidence: f64,
    pub source_tier: SourceTier,
}

impl Suggestion {
    pub fn from_symbol(symbol: &CatalogSymbol, confidence: f64, tier: SourceTier) -> Self {
        Self {
            symbol_id: Some(symbol.id.clone()),
            label: symbol.label.clone(),
            category: Some(symbol.category.clone()),
            image_ref: symbol.image_ref.clone(),
            confidence: confidence.clamp(0.0, 1.0),
            source_tier: tier,
        }
    }

    /// A suggestion with no catalog identity
    pub fn bare(label: &str, category: Option<&str>, confidence: f64, tier: SourceTier) -> Self {
        Self {
            symbol_id: None,
            label: label.to_string(),
            category: category.map(str::to_string),
            image_ref: None,
            confidence: confidence.clamp(0.0, 1.0),
            source_tier: tier,
        }
    }

    fn from_count(entry: LabelCount, confidence: f64, tier: SourceTier) -> Self {
        Self {
            symbol_id: entry.symbol_id,
            label: entry.label,
            category: entry.category,
            image_ref: None,
            confidence: confidence.clamp(0.0, 1.0),
            source_tier: tier,
        }
    }

    pub fn normalized_label(&self) -> String {
        normalize_label(&self.label)
    }
}

/// Dedup-and-cap combinator shared by every tier of one prediction
#[derive(Debug)]
pub struct SuggestionMerger {
    capacity: usize,
    seen: HashSet<String>,
    items: Vec<Suggestion>,
}

impl SuggestionMerger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    /// Add one suggestion; false when full, blank or already present
    pub fn push(&mut self, suggestion: Suggestion) -> bool {
        if self.is_full() {
            return false;
        }
        let key = suggestion.normalized_label();
        if key.is_empty() || !self.seen.insert(key) {
            return false;
        }
        self.items.push(suggestion);
        true
    }

    /// Add suggestions in order until full; returns how many were kept
    pub fn extend(&mut self, suggestions: impl IntoIterator<Item = Suggestion>) -> usize {
        let mut added = 0;
        for suggestion in suggestions {
            if self.is_full() {
                break;
            }
            if self.push(suggestion) {
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, label: &str) -> bool {
        self.seen.contains(&normalize_label(label))
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Suggestion> {
        self.items
    }
}

/// Visible cells of one board in layout order
#[derive(Debug, Clone, Default)]
pub struct BoardScope {
    board_id: String,
    cells: Vec<BoardCell>,
}

impl BoardScope {
    pub fn new(board_id: &str, cells: Vec<BoardCell>) -> Self {
        let mut cells: Vec<BoardCell> = cells.into_iter().filter(|c| !c.hidden).collect();
        cells.sort_by_key(|c| c.position);
        Self {
            board_id: board_id.to_string(),
            cells,
        }
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    pub fn symbols(&self) -> impl Iterator<Item = &CatalogSymbol> {
        self.cells.iter().map(|c| &c.symbol)
    }

    /// Visible symbol matching by id first, normalized label second
    pub fn find(&self, symbol_id: Option<&str>, label: &str) -> Option<&CatalogSymbol> {
        let by_id = symbol_id.and_then(|id| self.symbols().find(|s| s.id == id));
        by_id.or_else(|| {
            let wanted = normalize_label(label);
            self.symbols().find(|s| normalize_label(&s.label) == wanted)
        })
    }

    /// Re-anchor a suggestion on its board symbol; None when not visible here
    pub fn scope(&self, suggestion: Suggestion) -> Option<Suggestion> {
        let symbol = self.find(suggestion.symbol_id.as_deref(), &suggestion.label)?;
        Some(Suggestion::from_symbol(
            symbol,
            suggestion.confidence,
            suggestion.source_tier,
        ))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Everything a tier may read while producing suggestions
pub struct TierContext<'a> {
    pub user_id: &'a str,
    pub sequence: &'a [SymbolRef],
    /// Preference-ordered primary language codes, never empty
    pub languages: &'a [String],
    pub board: Option<&'a BoardScope>,
    pub has_history: bool,
    pub catalog: &'a dyn SymbolCatalog,
    pub analytics: &'a UsageAnalytics,
    pub models: &'a ModelCache,
    pub config: &'a PredictionConfig,
}

impl TierContext<'_> {
    pub fn primary_language(&self) -> &str {
        self.languages
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn trailing_label(&self) -> Option<&str> {
        self.sequence.last().map(|s| s.label.as_str())
    }

    /// How many candidates to request from a store. Board scoping filters
    /// after the fact, so a scoped tier reads everything.
    pub fn fetch_size(&self, remaining: usize) -> usize {
        if self.board.is_some() {
            usize::MAX
        } else {
            remaining
        }
    }

    /// Attach catalog identity to a label when the catalog knows it
    fn resolve(
        &self,
        label: &str,
        category: Option<&str>,
        language: &str,
        confidence: f64,
        tier: SourceTier,
    ) -> StoreResult<Suggestion> {
        Ok(match self.catalog.find_by_label(label, language)? {
            Some(symbol) => Suggestion::from_symbol(&symbol, confidence, tier),
            None => Suggestion::bare(label, category, confidence, tier),
        })
    }
}

/// One tier of the prediction waterfall
pub trait SuggestionSource: Send + Sync {
    fn tier(&self) -> SourceTier;

    /// Whether the tier has anything to offer for this request
    fn applies(&self, _ctx: &TierContext<'_>) -> bool {
        true
    }

    /// Candidates in the tier's natural order; `remaining` is a hint
    fn suggest(&self, ctx: &TierContext<'_>, remaining: usize) -> StoreResult<Vec<Suggestion>>;
}

/// What this user historically tapped next (or most, for an empty sequence)
pub struct HistorySource;

impl SuggestionSource for HistorySource {
    fn tier(&self) -> SourceTier {
        SourceTier::History
    }

    fn applies(&self, ctx: &TierContext<'_>) -> bool {
        ctx.has_history
    }

    fn suggest(&self, ctx: &TierContext<'_>, remaining: usize) -> StoreResult<Vec<Suggestion>> {
        let next = ctx.analytics.try_suggest_next_symbol(
            ctx.user_id,
            ctx.sequence,
            ctx.fetch_size(remaining),
        )?;
        Ok(next
            .into_iter()
            .map(|n: NextSymbol| {
                let confidence = if n.share > 0.0 {
                    n.share
                } else {
                    ctx.config.history_fallback
                };
                Suggestion {
                    symbol_id: n.symbol_id,
                    label: n.label,
                    category: n.category,
                    image_ref: None,
                    confidence: confidence.clamp(0.0, 1.0),
                    source_tier: SourceTier::History,
                }
            })
            .collect())
    }
}

/// Shared bigram model of the primary language
pub struct LanguageModelSource;

impl SuggestionSource for LanguageModelSource {
    fn tier(&self) -> SourceTier {
        SourceTier::LanguageModel
    }

    fn applies(&self, ctx: &TierContext<'_>) -> bool {
        ctx.trailing_label().is_some()
    }

    fn suggest(&self, ctx: &TierContext<'_>, remaining: usize) -> StoreResult<Vec<Suggestion>> {
        let Some(trailing) = ctx.trailing_label() else {
            return Ok(Vec::new());
        };
        let language = ctx.primary_language();
        let model = ctx.models.get_or_load(language);
        model
            .next_labels(trailing, ctx.fetch_size(remaining))
            .into_iter()
            .map(|(label, _)| {
                ctx.resolve(
                    &label,
                    None,
                    language,
                    ctx.config.language_model,
                    SourceTier::LanguageModel,
                )
            })
            .collect()
    }
}

/// Static n-gram tables, one language at a time in preference order
pub struct NgramSource;

impl SuggestionSource for NgramSource {
    fn tier(&self) -> SourceTier {
        SourceTier::Ngram
    }

    fn applies(&self, ctx: &TierContext<'_>) -> bool {
        !ctx.sequence.is_empty()
    }

    fn suggest(&self, ctx: &TierContext<'_>, _remaining: usize) -> StoreResult<Vec<Suggestion>> {
        let context: Vec<String> = ctx.sequence.iter().map(|s| s.label.clone()).collect();
        let mut suggestions = Vec::new();
        for language in ctx.languages {
            for label in vocabulary::ngram_next(language, &context) {
                suggestions.push(ctx.resolve(
                    label,
                    None,
                    language,
                    ctx.config.ngram,
                    SourceTier::Ngram,
                )?);
            }
        }
        Ok(suggestions)
    }
}

/// Global frequency, or the standard vocabulary for a user with no history
pub struct FrequencySource;

impl SuggestionSource for FrequencySource {
    fn tier(&self) -> SourceTier {
        SourceTier::Frequency
    }

    fn suggest(&self, ctx: &TierContext<'_>, remaining: usize) -> StoreResult<Vec<Suggestion>> {
        if !ctx.has_history {
            return standard_vocabulary(ctx, SourceTier::Frequency);
        }

        // read twice the need so interleaving has both kinds to draw from
        let fetch = ctx.fetch_size(remaining).saturating_mul(2);
        let counts = ctx.analytics.try_most_used(None, fetch, None)?;
        let (nouns, others): (Vec<LabelCount>, Vec<LabelCount>) = counts
            .into_iter()
            .partition(|c| is_noun_like(c.category.as_deref()));

        let mut nouns = nouns.into_iter();
        let mut others = others.into_iter();
        let mut suggestions = Vec::new();
        loop {
            let noun = nouns.next();
            let other = others.next();
            if noun.is_none() && other.is_none() {
                break;
            }
            if let Some(noun) = noun {
                suggestions.push(Suggestion::from_count(
                    noun,
                    ctx.config.frequency_noun,
                    SourceTier::Frequency,
                ));
            }
            if let Some(other) = other {
                suggestions.push(Suggestion::from_count(
                    other,
                    ctx.config.frequency_other,
                    SourceTier::Frequency,
                ));
            }
        }
        Ok(suggestions)
    }
}

/// Board-only: personal favourites on the board, then board-wide
/// popularity, then raw layout order
pub struct BoardSource;

impl SuggestionSource for BoardSource {
    fn tier(&self) -> SourceTier {
        SourceTier::Board
    }

    fn applies(&self, ctx: &TierContext<'_>) -> bool {
        ctx.board.is_some()
    }

    fn suggest(&self, ctx: &TierContext<'_>, _remaining: usize) -> StoreResult<Vec<Suggestion>> {
        let Some(board) = ctx.board else {
            return Ok(Vec::new());
        };
        let mut suggestions = Vec::new();

        let personal = ctx.analytics.try_most_used(Some(ctx.user_id), usize::MAX, None)?;
        suggestions.extend(
            personal
                .into_iter()
                .map(|c| Suggestion::from_count(c, ctx.config.board_personal, SourceTier::Board)),
        );

        let popular = ctx.analytics.try_most_used(None, usize::MAX, None)?;
        suggestions.extend(
            popular
                .into_iter()
                .map(|c| Suggestion::from_count(c, ctx.config.board_popular, SourceTier::Board)),
        );

        suggestions.extend(
            board
                .symbols()
                .map(|s| Suggestion::from_symbol(s, ctx.config.board_layout, SourceTier::Board)),
        );
        Ok(suggestions)
    }
}

/// Board-only: standard vocabulary that happens to be on the board
pub struct ColdStartSource;

impl SuggestionSource for ColdStartSource {
    fn tier(&self) -> SourceTier {
        SourceTier::ColdStart
    }

    fn applies(&self, ctx: &TierContext<'_>) -> bool {
        ctx.board.is_some()
    }

    fn suggest(&self, ctx: &TierContext<'_>, _remaining: usize) -> StoreResult<Vec<Suggestion>> {
        standard_vocabulary(ctx, SourceTier::ColdStart)
    }
}

fn standard_vocabulary(ctx: &TierContext<'_>, tier: SourceTier) -> StoreResult<Vec<Suggestion>> {
    let mut suggestions = Vec::new();
    for language in ctx.languages {
        for &(label, category) in vocabulary::standard_vocabulary(language) {
            suggestions.push(ctx.resolve(
                label,
                Some(category),
                language,
                ctx.config.standard_vocabulary,
                tier,
            )?);
        }
    }
    Ok(suggestions)
}

/// Terminal punctuation for the reserved first-page slots
pub struct PunctuationSource;

impl SuggestionSource for PunctuationSource {
    fn tier(&self) -> SourceTier {
        SourceTier::Punctuation
    }

    fn suggest(&self, ctx: &TierContext<'_>, remaining: usize) -> StoreResult<Vec<Suggestion>> {
        Ok(vocabulary::PUNCTUATION
            .iter()
            .take(remaining)
            .map(|mark| {
                Suggestion::bare(
                    mark,
                    Some("punctuation"),
                    ctx.config.punctuation,
                    SourceTier::Punctuation,
                )
            })
            .collect())
    }
}

/// Waterfall order; punctuation is handled separately through reserved slots
pub fn default_sources() -> Vec<Box<dyn SuggestionSource>> {
    vec![
        Box::new(HistorySource),
        Box::new(LanguageModelSource),
        Box::new(NgramSource),
        Box::new(FrequencySource),
        Box::new(BoardSource),
        Box::new(ColdStartSource),
    ]
}
