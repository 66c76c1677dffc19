//! Usage log kept as an append-only JSONL file

use chrono::{DateTime, Utc};
use glyphic_core::{validate_batch, StoreError, StoreResult, UsageEvent, UsageLog};
use glyphic_telemetry::{append_jsonl_batch, read_jsonl};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One JSON event per line. Each batch goes out in a single write, so an
/// utterance is never split by another writer in this process.
#[derive(Debug)]
pub struct JsonlUsageLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlUsageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn select(
        &self,
        since: Option<DateTime<Utc>>,
        keep: impl Fn(&UsageEvent) -> bool,
    ) -> StoreResult<Vec<UsageEvent>> {
        let mut events: Vec<UsageEvent> = read_jsonl::<UsageEvent>(&self.path)?
            .into_iter()
            .filter(|e| e.is_well_formed())
            .filter(|e| since.map_or(true, |cutoff| e.timestamp >= cutoff))
            .filter(|e| keep(e))
            .collect();
        // stable, so events of one batch keep their order
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }
}

impl UsageLog for JsonlUsageLog {
    fn append_batch(&self, events: &[UsageEvent]) -> StoreResult<()> {
        validate_batch(events)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Poisoned("usage log file"))?;
        append_jsonl_batch(&self.path, events)?;
        tracing::trace!(path = %self.path.display(), events = events.len(), "appended usage");
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
