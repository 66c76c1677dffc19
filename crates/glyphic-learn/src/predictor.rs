//! Next-symbol prediction waterfall

use crate::analytics::UsageAnalytics;
use crate::model::ModelCache;
use crate::tiers::{
    default_sources, BoardScope, PunctuationSource, SourceTier, Suggestion, SuggestionMerger,
    SuggestionSource, TierContext,
};
use crate::vocabulary::CategoryIntent;
use glyphic_core::{
    language_preferences, normalize_label, CatalogSymbol, PredictionConfig, StoreResult,
    SymbolCatalog, SymbolRef, DEFAULT_LANGUAGE,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_LIMIT: usize = 10;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// One next-symbol query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub user_id: String,
    #[serde(default)]
    pub sequence: Vec<SymbolRef>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Comma-separated preference list such as `es,en`
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub board_id: Option<String>,
    /// Word-class shortcut that bypasses the waterfall
    #[serde(default)]
    pub category: Option<CategoryIntent>,
}

impl PredictionRequest {
    pub fn new(user_id: impl Into<String>, sequence: Vec<SymbolRef>) -> Self {
        Self {
            user_id: user_id.into(),
            sequence,
            limit: DEFAULT_LIMIT,
            language: default_language(),
            offset: 0,
            board_id: None,
            category: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_board(mut self, board_id: impl Into<String>) -> Self {
        self.board_id = Some(board_id.into());
        self
    }

    pub fn with_category(mut self, category: CategoryIntent) -> Self {
        self.category = Some(category);
        self
    }

    /// Slots held back for punctuation: first page only, at most half the limit
    pub fn punctuation_slots(&self, configured: usize) -> usize {
        if self.offset == 0 {
            configured.min(self.limit / 2)
        } else {
            0
        }
    }
}

/// Ranks next-symbol candidates from history, models and catalog fallbacks
pub struct PredictionEngine {
    catalog: Arc<dyn SymbolCatalog>,
    analytics: UsageAnalytics,
    models: ModelCache,
    config: PredictionConfig,
    sources: Vec<Box<dyn SuggestionSource>>,
    punctuation: PunctuationSource,
}

impl PredictionEngine {
    pub fn new(
        catalog: Arc<dyn SymbolCatalog>,
        analytics: UsageAnalytics,
        models: ModelCache,
        config: PredictionConfig,
    ) -> Self {
        Self {
            catalog,
            analytics,
            models,
            config,
            sources: default_sources(),
            punctuation: PunctuationSource,
        }
    }

    /// Replace the waterfall tiers, in order
    pub fn with_sources(mut self, sources: Vec<Box<dyn SuggestionSource>>) -> Self {
        self.sources = sources;
        self
    }

    pub fn analytics(&self) -> &UsageAnalytics {
        &self.analytics
    }

    pub fn models(&self) -> &ModelCache {
        &self.models
    }

    /// Ranked suggestions with unique normalized labels, at most `limit` long.
    /// Never fails: a tier whose store read fails contributes nothing.
    pub fn predict_next(&self, request: &PredictionRequest) -> Vec<Suggestion> {
        if request.limit == 0 {
            return Vec::new();
        }
        let languages = language_preferences(&request.language);
        let board = request.board_id.as_deref().map(|id| self.load_board(id));

        if let Some(intent) = request.category {
            return self.category_shortcut(request, intent, &languages, board.as_ref());
        }

        let has_history = self.analytics.try_has_history(&request.user_id).unwrap_or_else(|e| {
            tracing::warn!(user = %request.user_id, error = %e, "history check failed");
            false
        });
        let ctx = TierContext {
            user_id: &request.user_id,
            sequence: &request.sequence,
            languages: &languages,
            board: board.as_ref(),
            has_history,
            catalog: self.catalog.as_ref(),
            analytics: &self.analytics,
            models: &self.models,
            config: &self.config,
        };

        let slots = request.punctuation_slots(self.config.punctuation_slots);
        let quota = request.limit - slots;
        let mut merger = SuggestionMerger::new(request.offset.saturating_add(quota));

        for source in &self.sources {
            if merger.is_full() {
                break;
            }
            if !source.applies(&ctx) {
                continue;
            }
            let tier = source.tier();
            match source.suggest(&ctx, merger.remaining()) {
                Ok(candidates) => {
                    let added = match ctx.board {
                        Some(scope) => {
                            merger.extend(candidates.into_iter().filter_map(|s| scope.scope(s)))
                        }
                        None => merger.extend(candidates),
                    };
                    tracing::debug!(tier = %tier, added, "prediction tier");
                }
                Err(e) => {
                    tracing::warn!(tier = %tier, error = %e, "prediction tier failed");
                }
            }
        }

        let mut page = SuggestionMerger::new(request.limit);
        page.extend(merger.into_vec().into_iter().skip(request.offset));
        if slots > 0 {
            match self.punctuation.suggest(&ctx, slots) {
                Ok(marks) => {
                    page.extend(marks);
                }
                Err(e) => tracing::warn!(error = %e, "punctuation tier failed"),
            }
        }
        page.into_vec()
    }

    /// Board cells, or an empty scope when the board cannot be read
    fn load_board(&self, board_id: &str) -> BoardScope {
        match self.catalog.board_cells(board_id) {
            Ok(cells) => BoardScope::new(board_id, cells),
            Err(e) => {
                tracing::warn!(board = board_id, error = %e, "board unavailable");
                BoardScope::new(board_id, Vec::new())
            }
        }
    }

    /// Word-class suggestions: closed-list hits first, category hits second
    fn category_shortcut(
        &self,
        request: &PredictionRequest,
        intent: CategoryIntent,
        languages: &[String],
        board: Option<&BoardScope>,
    ) -> Vec<Suggestion> {
        // a board never falls back to the catalog: only visible cells qualify
        let candidates: Vec<CatalogSymbol> = match board {
            Some(scope) => scope.symbols().cloned().collect(),
            None => match self.catalog_candidates(intent, languages) {
                Ok(symbols) => symbols,
                Err(e) => {
                    tracing::warn!(category = %intent, error = %e, "category lookup failed");
                    Vec::new()
                }
            },
        };

        let mut merger = SuggestionMerger::new(request.offset.saturating_add(request.limit));
        for language in languages {
            for word in intent.closed_list(language) {
                let hits = candidates
                    .iter()
                    .filter(|s| s.speaks(language) && normalize_label(&s.label) == *word);
                let confidence = self.config.category_closed_list;
                merger.extend(
                    hits.map(|s| Suggestion::from_symbol(s, confidence, SourceTier::Category)),
                );
            }
        }

        let categories = intent.catalog_categories();
        let heuristic_hits = candidates
            .iter()
            .filter(|s| categories.contains(&normalize_label(&s.category).as_str()));
        merger.extend(heuristic_hits.map(|s| {
            Suggestion::from_symbol(s, self.config.category_heuristic, SourceTier::Category)
        }));

        merger.into_vec().into_iter().skip(request.offset).collect()
    }

    fn catalog_candidates(
        &self,
        intent: CategoryIntent,
        languages: &[String],
    ) -> StoreResult<Vec<CatalogSymbol>> {
        let mut symbols = Vec::new();
        for language in languages {
            for word in intent.closed_list(language) {
                if let Some(symbol) = self.catalog.find_by_label(word, language)? {
                    symbols.push(symbol);
                }
            }
            symbols.extend(self.catalog.by_categories(
                intent.catalog_categories(),
                language,
                usize::MAX,
            )?);
        }
        Ok(symbols)
    }
}
