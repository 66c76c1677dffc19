//! Collaborator seams: the symbol catalog and the usage log.
//!
//! The engine never owns persistence. It reads symbols and boards through
//! [`SymbolCatalog`] and appends/queries usage through [`UsageLog`]. The
//! in-memory implementations here back tests and the JSON catalog file.

use crate::error::{StoreError, StoreResult};
use crate::types::{normalize_label, BoardCell, CatalogSymbol};
use chrono::{DateTime, Utc};
use glyphic_telemetry::UsageEvent;
use std::collections::HashMap;
use std::sync::RwLock;

/// Canonical symbol identities and board layouts
pub trait SymbolCatalog: Send + Sync {
    fn find_by_id(&self, id: &str) -> StoreResult<Option<CatalogSymbol>>;

    /// Exact label match first, keyword match second
    fn find_by_label(&self, label: &str, language: &str) -> StoreResult<Option<CatalogSymbol>>;

    /// Symbols whose category is one of `categories`, in catalog order
    fn by_categories(
        &self,
        categories: &[&str],
        language: &str,
        limit: usize,
    ) -> StoreResult<Vec<CatalogSymbol>>;

    /// Every symbol of a language, in catalog order
    fn all_symbols(&self, language: &str, limit: usize) -> StoreResult<Vec<CatalogSymbol>>;

    /// Cells of a board in layout order, hidden cells included
    fn board_cells(&self, board_id: &str) -> StoreResult<Vec<BoardCell>>;
}

/// Append-only usage event storage
pub trait UsageLog: Send + Sync {
    /// Append one utterance's events; either all are stored or none
    fn append_batch(&self, events: &[UsageEvent]) -> StoreResult<()>;

    /// A user's events at or after `since`, oldest first
    fn events_for_user(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<UsageEvent>>;

    /// All users' events at or after `since`, oldest first
    fn events_since(&self, since: Option<DateTime<Utc>>) -> StoreResult<Vec<UsageEvent>>;
}

/// Reject a batch containing any malformed event before anything is written
pub fn validate_batch(events: &[UsageEvent]) -> StoreResult<()> {
    match events.iter().find(|e| !e.is_well_formed()) {
        Some(bad) => Err(StoreError::InvalidEvent(format!(
            "'{}' at position {} of {}",
            bad.label, bad.position_in_utterance, bad.utterance_length
        ))),
        None => Ok(()),
    }
}

/// Catalog held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    symbols: Vec<CatalogSymbol>,
    boards: HashMap<String, Vec<BoardCell>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_symbol(&mut self, symbol: CatalogSymbol) {
        match self.symbols.iter_mut().find(|s| s.id == symbol.id) {
            Some(existing) => *existing = symbol,
            None => self.symbols.push(symbol),
        }
    }

    /// Append a catalog symbol to the end of a board's layout.
    /// Returns false when the symbol id is unknown.
    pub fn place(&mut self, board_id: &str, symbol_id: &str, hidden: bool) -> bool {
        let Some(symbol) = self.symbols.iter().find(|s| s.id == symbol_id).cloned() else {
            tracing::debug!(board = board_id, symbol = symbol_id, "cannot place unknown symbol");
            return false;
        };
        let cells = self.boards.entry(board_id.to_string()).or_default();
        let position = cells.len();
        cells.push(BoardCell {
            symbol,
            position,
            hidden,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolCatalog for InMemoryCatalog {
    fn find_by_id(&self, id: &str) -> StoreResult<Option<CatalogSymbol>> {
        Ok(self.symbols.iter().find(|s| s.id == id).cloned())
    }

    fn find_by_label(&self, label: &str, language: &str) -> StoreResult<Option<CatalogSymbol>> {
        let wanted = normalize_label(label);
        let in_language = || self.symbols.iter().filter(move |s| s.speaks(language));
        let exact = in_language().find(|s| normalize_label(&s.label) == wanted);
        Ok(exact
            .or_else(|| in_language().find(|s| s.answers_to(&wanted)))
            .cloned())
    }

    fn by_categories(
        &self,
        categories: &[&str],
        language: &str,
        limit: usize,
    ) -> StoreResult<Vec<CatalogSymbol>> {
        let wanted: Vec<String> = categories.iter().map(|c| normalize_label(c)).collect();
        Ok(self
            .symbols
            .iter()
            .filter(|s| s.speaks(language) && wanted.contains(&normalize_label(&s.category)))
            .take(limit)
            .cloned()
            .collect())
    }

    fn all_symbols(&self, language: &str, limit: usize) -> StoreResult<Vec<CatalogSymbol>> {
        Ok(self
            .symbols
            .iter()
            .filter(|s| s.speaks(language))
            .take(limit)
            .cloned()
            .collect())
    }

    fn board_cells(&self, board_id: &str) -> StoreResult<Vec<BoardCell>> {
        let mut cells = self.boards.get(board_id).cloned().unwrap_or_default();
        cells.sort_by_key(|c| c.position);
        Ok(cells)
    }
}

/// Usage log held in memory
#[derive(Debug, Default)]
pub struct InMemoryUsageLog {
    events: RwLock<Vec<UsageEvent>>,
}

impl InMemoryUsageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(
        &self,
        since: Option<DateTime<Utc>>,
        keep: impl Fn(&UsageEvent) -> bool,
    ) -> StoreResult<Vec<UsageEvent>> {
        let events = self
            .events
            .read()
            .map_err(|_| StoreError::Poisoned("usage log"))?;
        let mut selected: Vec<UsageEvent> = events
            .iter()
            .filter(|e| since.map_or(true, |cutoff| e.timestamp >= cutoff))
            .filter(|e| keep(e))
            .cloned()
            .collect();
        selected.sort_by_key(|e| e.timestamp);
        Ok(selected)
    }
}

impl UsageLog for InMemoryUsageLog {
    fn append_batch(&self, events: &[UsageEvent]) -> StoreResult<()> {
        validate_batch(events)?;
        let mut stored = self
            .events
            .write()
            .map_err(|_| StoreError::Poisoned("usage log"))?;
        stored.extend_from_slice(events);
        Ok(())
    }

    fn events_for_user(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<UsageEvent>> {
        self.select(since, |e| e.user_id == user_id)
    }

    fn events_since(&self, since: Option<DateTime<Utc>>) -> StoreResult<Vec<UsageEvent>> {
        self.select(since, |_| true)
    }
}
