//! Usage logging and the reports derived from it.
//!
//! Events are regrouped into utterances on read: a new utterance starts on a
//! session change, on a gap longer than the configured session gap, or on a
//! position-0 event.

use chrono::{DateTime, Duration, Utc};
use glyphic_core::{
    normalize_label, AnalyticsConfig, StoreResult, SymbolRef, UsageEvent, UsageLog,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Utterance-level fields recorded with every event of a logged sequence
#[derive(Debug, Clone, Default)]
pub struct UtteranceContext {
    pub session_id: Option<String>,
    pub intent: Option<String>,
    pub topic: Option<String>,
    /// Defaults to now
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentSequence {
    pub labels: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub symbol_id: Option<String>,
    pub category: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub period_days: i64,
    pub total_symbols_used: usize,
    pub total_utterances: usize,
    pub unique_symbols: usize,
    pub most_used: Vec<LabelCount>,
    pub intent_distribution: BTreeMap<String, usize>,
    pub average_utterance_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPreference {
    pub category: String,
    pub count: usize,
    pub share: f64,
}

/// A symbol that historically came next, with its share of all followers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextSymbol {
    pub symbol_id: Option<String>,
    pub label: String,
    pub category: Option<String>,
    pub count: usize,
    pub share: f64,
}

/// Reads and writes usage through a [`UsageLog`].
///
/// The plain methods never fail: store errors are logged and reported as
/// empty results. The `try_` variants surface them for callers that handle
/// failures themselves.
#[derive(Clone)]
pub struct UsageAnalytics {
    log: Arc<dyn UsageLog>,
    config: AnalyticsConfig,
}

impl UsageAnalytics {
    pub fn new(log: Arc<dyn UsageLog>, config: AnalyticsConfig) -> Self {
        Self { log, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Record one completed utterance as a single batch.
    /// Returns false for an empty sequence or when the store rejects the batch.
    pub fn log(&self, user_id: &str, sequence: &[SymbolRef], context: &UtteranceContext) -> bool {
        if sequence.is_empty() {
            return false;
        }
        let timestamp = context.timestamp.unwrap_or_else(Utc::now);
        let events: Vec<UsageEvent> = sequence
            .iter()
            .enumerate()
            .map(|(position, symbol)| UsageEvent {
                user_id: user_id.to_string(),
                session_id: context.session_id.clone(),
                symbol_id: symbol.id.clone(),
                label: symbol.label.clone(),
                category: symbol.category.clone(),
                position_in_utterance: position,
                utterance_length: sequence.len(),
                intent: context.intent.clone(),
                topic: context.topic.clone(),
                timestamp,
            })
            .collect();

        match self.log.append_batch(&events) {
            Ok(()) => {
                tracing::debug!(user = user_id, symbols = events.len(), "logged utterance");
                true
            }
            Err(e) => {
                tracing::error!(user = user_id, error = %e, "failed to log utterance");
                false
            }
        }
    }

    pub fn get_frequent_sequences(
        &self,
        user_id: &str,
        min_occurrences: usize,
        limit: usize,
    ) -> Vec<FrequentSequence> {
        self.try_frequent_sequences(user_id, min_occurrences, limit)
            .unwrap_or_else(|e| {
                tracing::warn!(user = user_id, error = %e, "frequent sequences unavailable");
                Vec::new()
            })
    }

    /// Repeated label sequences of two or more symbols, most frequent first
    pub fn try_frequent_sequences(
        &self,
        user_id: &str,
        min_occurrences: usize,
        limit: usize,
    ) -> StoreResult<Vec<FrequentSequence>> {
        let events = self.log.events_for_user(user_id, None)?;
        let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
        for utterance in self.utterances(&events) {
            if utterance.len() < 2 {
                continue;
            }
            let labels = utterance.iter().map(|e| normalize_label(&e.label)).collect();
            *counts.entry(labels).or_insert(0) += 1;
        }

        let min_occurrences = min_occurrences.max(1);
        let mut sequences: Vec<FrequentSequence> = counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(labels, count)| FrequentSequence { labels, count })
            .collect();
        sequences.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.labels.cmp(&b.labels)));
        sequences.truncate(limit);
        Ok(sequences)
    }

    pub fn get_usage_stats(&self, user_id: &str, days: i64) -> UsageStats {
        self.try_usage_stats(user_id, days).unwrap_or_else(|e| {
            tracing::warn!(user = user_id, error = %e, "usage stats unavailable");
            UsageStats::empty(days)
        })
    }

    pub fn try_usage_stats(&self, user_id: &str, days: i64) -> StoreResult<UsageStats> {
        let events = self.log.events_for_user(user_id, window_start(Some(days)))?;

        let unique_symbols = events
            .iter()
            .map(|e| normalize_label(&e.label))
            .collect::<HashSet<_>>()
            .len();

        // utterance-level figures come from each utterance's first event
        let starts: Vec<&UsageEvent> = events.iter().filter(|e| e.is_utterance_start()).collect();
        let mut intent_distribution = BTreeMap::new();
        for start in &starts {
            let intent = start.intent.clone().unwrap_or_else(|| "unknown".to_string());
            *intent_distribution.entry(intent).or_insert(0) += 1;
        }
        let average_utterance_length = if starts.is_empty() {
            0.0
        } else {
            starts.iter().map(|e| e.utterance_length).sum::<usize>() as f64 / starts.len() as f64
        };

        Ok(UsageStats {
            period_days: days,
            total_symbols_used: events.len(),
            total_utterances: starts.len(),
            unique_symbols,
            most_used: rank_labels(&events, self.config.top_symbols),
            intent_distribution,
            average_utterance_length,
        })
    }

    pub fn get_category_preferences(&self, user_id: &str, days: i64) -> Vec<CategoryPreference> {
        self.try_category_preferences(user_id, days)
            .unwrap_or_else(|e| {
                tracing::warn!(user = user_id, error = %e, "category preferences unavailable");
                Vec::new()
            })
    }

    pub fn try_category_preferences(
        &self,
        user_id: &str,
        days: i64,
    ) -> StoreResult<Vec<CategoryPreference>> {
        let events = self.log.events_for_user(user_id, window_start(Some(days)))?;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for category in events.iter().filter_map(|e| e.category.as_deref()) {
            let category = normalize_label(category);
            if !category.is_empty() {
                *counts.entry(category).or_insert(0) += 1;
            }
        }

        let total: usize = counts.values().sum();
        let mut preferences: Vec<CategoryPreference> = counts
            .into_iter()
            .map(|(category, count)| CategoryPreference {
                category,
                count,
                share: count as f64 / total as f64,
            })
            .collect();
        preferences.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
        Ok(preferences)
    }

    pub fn suggest_next_symbol(
        &self,
        user_id: &str,
        sequence: &[SymbolRef],
        limit: usize,
    ) -> Vec<NextSymbol> {
        self.try_suggest_next_symbol(user_id, sequence, limit)
            .unwrap_or_else(|e| {
                tracing::warn!(user = user_id, error = %e, "next-symbol history unavailable");
                Vec::new()
            })
    }

    /// What followed the trailing label inside past utterances, or the
    /// user's most-used symbols when the sequence is empty
    pub fn try_suggest_next_symbol(
        &self,
        user_id: &str,
        sequence: &[SymbolRef],
        limit: usize,
    ) -> StoreResult<Vec<NextSymbol>> {
        let events = self.log.events_for_user(user_id, None)?;

        let Some(trailing) = sequence.last().map(SymbolRef::normalized_label) else {
            let total = events.len();
            return Ok(rank_labels(&events, limit)
                .into_iter()
                .map(|entry| NextSymbol::from_count(entry, total))
                .collect());
        };

        let mut followers: Vec<&UsageEvent> = Vec::new();
        for utterance in self.utterances(&events) {
            for pair in utterance.windows(2) {
                if normalize_label(&pair[0].label) == trailing {
                    followers.push(pair[1]);
                }
            }
        }

        let total = followers.len();
        Ok(rank_labels(followers, limit)
            .into_iter()
            .map(|entry| NextSymbol::from_count(entry, total))
            .collect())
    }

    pub fn most_used(
        &self,
        user_id: Option<&str>,
        limit: usize,
        days: Option<i64>,
    ) -> Vec<LabelCount> {
        self.try_most_used(user_id, limit, days).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "most-used symbols unavailable");
            Vec::new()
        })
    }

    /// Label frequency for one user, or across all users when `user_id` is None
    pub fn try_most_used(
        &self,
        user_id: Option<&str>,
        limit: usize,
        days: Option<i64>,
    ) -> StoreResult<Vec<LabelCount>> {
        let since = window_start(days);
        let events = match user_id {
            Some(user) => self.log.events_for_user(user, since)?,
            None => self.log.events_since(since)?,
        };
        Ok(rank_labels(&events, limit))
    }

    pub fn has_history(&self, user_id: &str) -> bool {
        self.try_has_history(user_id).unwrap_or_else(|e| {
            tracing::warn!(user = user_id, error = %e, "usage history unavailable");
            false
        })
    }

    pub fn try_has_history(&self, user_id: &str) -> StoreResult<bool> {
        Ok(!self.log.events_for_user(user_id, None)?.is_empty())
    }

    /// Split time-ordered events into utterances, each in position order
    fn utterances<'a>(&self, events: &'a [UsageEvent]) -> Vec<Vec<&'a UsageEvent>> {
        let gap = Duration::minutes(self.config.session_gap_minutes.max(0));
        let mut utterances: Vec<Vec<&UsageEvent>> = Vec::new();
        let mut current: Vec<&UsageEvent> = Vec::new();

        for event in events {
            let boundary = match current.last() {
                None => false,
                Some(previous) => {
                    event.is_utterance_start()
                        || event.session_id != previous.session_id
                        || event.timestamp - previous.timestamp > gap
                }
            };
            if boundary {
                utterances.push(std::mem::take(&mut current));
            }
            current.push(event);
        }
        if !current.is_empty() {
            utterances.push(current);
        }

        for utterance in &mut utterances {
            utterance.sort_by_key(|e| e.position_in_utterance);
        }
        utterances
    }
}

impl UsageStats {
    fn empty(days: i64) -> Self {
        Self {
            period_days: days,
            total_symbols_used: 0,
            total_utterances: 0,
            unique_symbols: 0,
            most_used: Vec::new(),
            intent_distribution: BTreeMap::new(),
            average_utterance_length: 0.0,
        }
    }
}

impl NextSymbol {
    fn from_count(entry: LabelCount, total: usize) -> Self {
        let share = if total == 0 {
            0.0
        } else {
            entry.count as f64 / total as f64
        };
        Self {
            symbol_id: entry.symbol_id,
            label: entry.label,
            category: entry.category,
            count: entry.count,
            share,
        }
    }
}

/// Start of a trailing window of `days`; None or an unrepresentable window means all time
fn window_start(days: Option<i64>) -> Option<DateTime<Utc>> {
    let span = Duration::try_days(days?.max(0))?;
    Utc::now().checked_sub_signed(span)
}

/// Count events by normalized label, most frequent first (ties by label).
/// The first occurrence supplies the displayed label, id and category.
fn rank_labels<'a>(
    events: impl IntoIterator<Item = &'a UsageEvent>,
    limit: usize,
) -> Vec<LabelCount> {
    let mut counts: HashMap<String, LabelCount> = HashMap::new();
    for event in events {
        let key = normalize_label(&event.label);
        counts
            .entry(key)
            .or_insert_with(|| LabelCount {
                label: event.label.trim().to_string(),
                symbol_id: event.symbol_id.clone(),
                category: event.category.clone(),
                count: 0,
            })
            .count += 1;
    }

    let mut ranked: Vec<(String, LabelCount)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(_, entry)| entry).collect()
}
