use crate::catalog_file::CatalogFile;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use glyphic_core::{
    primary_language, validate_batch, BoardCell, CatalogSymbol, StoreError, StoreResult,
    SymbolCatalog, UsageEvent, UsageLog,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed symbol catalog and usage log
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

const SYMBOL_COLUMNS: &str = "id, label, category, keywords, language, image_ref";

const EVENT_COLUMNS: &str = "user_id, session_id, symbol_id, label, category, \
     position_in_utterance, utterance_length, intent, topic, timestamp";

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS symbols (
                id TEXT PRIMARY KEY,
                label TEXT NOT NULL,
                category TEXT NOT NULL,
                keywords TEXT NOT NULL,
                language TEXT NOT NULL,
                image_ref TEXT
            );
            CREATE TABLE IF NOT EXISTS board_cells (
                board_id TEXT NOT NULL,
                symbol_id TEXT NOT NULL REFERENCES symbols(id),
                position INTEGER NOT NULL,
                hidden INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (board_id, position)
            );
            CREATE TABLE IF NOT EXISTS usage_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                session_id TEXT,
                symbol_id TEXT,
                label TEXT NOT NULL,
                category TEXT,
                position_in_utterance INTEGER NOT NULL,
                utterance_length INTEGER NOT NULL,
                intent TEXT,
                topic TEXT,
                timestamp TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_usage_user ON usage_events(user_id);
            CREATE INDEX IF NOT EXISTS idx_usage_timestamp ON usage_events(timestamp);
            ",
        )?;
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Poisoned("sqlite connection"))
    }

    /// Insert or update a symbol, keeping its catalog position
    pub fn upsert_symbol(&self, symbol: &CatalogSymbol) -> Result<()> {
        let conn = self.lock()?;
        Self::upsert_symbol_with(&conn, symbol)
    }

    fn upsert_symbol_with(conn: &Connection, symbol: &CatalogSymbol) -> Result<()> {
        conn.execute(
            "INSERT INTO symbols (id, label, category, keywords, language, image_ref)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                label = excluded.label,
                category = excluded.category,
                keywords = excluded.keywords,
                language = excluded.language,
                image_ref = excluded.image_ref",
            params![
                symbol.id,
                symbol.label,
                symbol.category,
                serde_json::to_string(&symbol.keywords)?,
                symbol.language,
                symbol.image_ref,
            ],
        )?;
        Ok(())
    }

    /// Put a symbol at a board position, replacing whatever was there
    pub fn place(
        &self,
        board_id: &str,
        symbol_id: &str,
        position: usize,
        hidden: bool,
    ) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO board_cells (board_id, symbol_id, position, hidden)
             VALUES (?1, ?2, ?3, ?4)",
            params![board_id, symbol_id, position as i64, hidden],
        )?;
        Ok(())
    }

    /// Import a catalog file in one transaction; returns the symbol count
    pub fn import(&self, catalog: &CatalogFile) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for symbol in &catalog.symbols {
            Self::upsert_symbol_with(&tx, symbol)?;
        }
        for (board_id, entries) in &catalog.boards {
            tx.execute("DELETE FROM board_cells WHERE board_id = ?1", params![board_id])?;
            for (position, entry) in catalog.board_layout(entries) {
                tx.execute(
                    "INSERT INTO board_cells (board_id, symbol_id, position, hidden)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![board_id, entry.symbol_id, position as i64, entry.hidden],
                )?;
            }
        }
        tx.commit()?;
        tracing::debug!(
            symbols = catalog.symbols.len(),
            boards = catalog.boards.len(),
            "imported catalog"
        );
        Ok(catalog.symbols.len())
    }

    fn query_symbols(
        &self,
        sql: &str,
        args: impl rusqlite::Params,
    ) -> StoreResult<Vec<CatalogSymbol>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(StoreError::backend)?;
        let rows = stmt
            .query_map(args, row_to_symbol)
            .map_err(StoreError::backend)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::backend)
    }

    /// Symbols of one primary language, in catalog order.
    ///
    /// SQL narrows the rows by the tag's first two letters; tags too short or
    /// malformed to match that way still reach the exact `speaks` check.
    fn symbols_speaking(&self, language: &str) -> StoreResult<Vec<CatalogSymbol>> {
        let symbols = self.query_symbols(
            &format!(
                "SELECT {SYMBOL_COLUMNS} FROM symbols
                 WHERE lower(substr(trim(language), 1, 2)) = ?1
                    OR substr(trim(language), 1, 2) NOT GLOB '[A-Za-z][A-Za-z]'
                 ORDER BY rowid"
            ),
            params![primary_language(language)],
        )?;
        Ok(symbols.into_iter().filter(|s| s.speaks(language)).collect())
    }

    fn query_events(
        &self,
        sql: &str,
        args: impl rusqlite::Params,
    ) -> StoreResult<Vec<UsageEvent>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(StoreError::backend)?;
        let rows = stmt
            .query_map(args, row_to_event)
            .map_err(StoreError::backend)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::backend)
    }
}

/// Fixed-width RFC 3339 so text order matches time order
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

fn row_to_symbol(row: &rusqlite::Row) -> rusqlite::Result<CatalogSymbol> {
    let keywords: String = row.get(3)?;
    Ok(CatalogSymbol {
        id: row.get(0)?,
        label: row.get(1)?,
        category: row.get(2)?,
        keywords: serde_json::from_str(&keywords).map_err(|e| conversion_error(3, e))?,
        language: row.get(4)?,
        image_ref: row.get(5)?,
    })
}

fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<UsageEvent> {
    let timestamp: String = row.get(9)?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| conversion_error(9, e))?
        .with_timezone(&Utc);
    Ok(UsageEvent {
        user_id: row.get(0)?,
        session_id: row.get(1)?,
        symbol_id: row.get(2)?,
        label: row.get(3)?,
        category: row.get(4)?,
        position_in_utterance: row.get::<_, i64>(5)? as usize,
        utterance_length: row.get::<_, i64>(6)? as usize,
        intent: row.get(7)?,
        topic: row.get(8)?,
        timestamp,
    })
}

impl SymbolCatalog for SqliteStore {
    fn find_by_id(&self, id: &str) -> StoreResult<Option<CatalogSymbol>> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {SYMBOL_COLUMNS} FROM symbols WHERE id = ?1"),
            params![id],
            row_to_symbol,
        )
        .optional()
        .map_err(StoreError::backend)
    }

    fn find_by_label(&self, label: &str, language: &str) -> StoreResult<Option<CatalogSymbol>> {
        let symbols = self.symbols_speaking(language)?;
        let wanted = glyphic_core::normalize_label(label);
        let exact = symbols
            .iter()
            .find(|s| glyphic_core::normalize_label(&s.label) == wanted);
        Ok(exact
            .or_else(|| symbols.iter().find(|s| s.answers_to(&wanted)))
            .cloned())
    }

    fn by_categories(
        &self,
        categories: &[&str],
        language: &str,
        limit: usize,
    ) -> StoreResult<Vec<CatalogSymbol>> {
        let wanted: Vec<String> = categories
            .iter()
            .map(|c| glyphic_core::normalize_label(c))
            .collect();
        Ok(self
            .symbols_speaking(language)?
            .into_iter()
            .filter(|s| wanted.contains(&glyphic_core::normalize_label(&s.category)))
            .take(limit)
            .collect())
    }

    fn all_symbols(&self, language: &str, limit: usize) -> StoreResult<Vec<CatalogSymbol>> {
        let mut symbols = self.symbols_speaking(language)?;
        symbols.truncate(limit);
        Ok(symbols)
    }

    fn board_cells(&self, board_id: &str) -> StoreResult<Vec<BoardCell>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT s.id, s.label, s.category, s.keywords, s.language, s.image_ref,
                        c.position, c.hidden
                 FROM board_cells c JOIN symbols s ON s.id = c.symbol_id
                 WHERE c.board_id = ?1
                 ORDER BY c.position",
            )
            .map_err(StoreError::backend)?;
        let rows = stmt
            .query_map(params![board_id], |row| {
                Ok(BoardCell {
                    symbol: row_to_symbol(row)?,
                    position: row.get::<_, i64>(6)? as usize,
                    hidden: row.get(7)?,
                })
            })
            .map_err(StoreError::backend)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::backend)
    }
}

impl UsageLog for SqliteStore {
    fn append_batch(&self, events: &[UsageEvent]) -> StoreResult<()> {
        validate_batch(events)?;
        if events.is_empty() {
            return Ok(());
        }
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::backend)?;
        for event in events {
            tx.execute(
                &format!(
                    "INSERT INTO usage_events ({EVENT_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                params![
                    event.user_id,
                    event.session_id,
                    event.symbol_id,
                    event.label,
                    event.category,
                    event.position_in_utterance as i64,
                    event.utterance_length as i64,
                    event.intent,
                    event.topic,
                    format_timestamp(&event.timestamp),
                ],
            )
            .map_err(StoreError::backend)?;
        }
        // dropping an uncommitted transaction rolls the batch back
        tx.commit().map_err(StoreError::backend)
    }

    fn events_for_user(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<UsageEvent>> {
        let since = since.as_ref().map(format_timestamp);
        self.query_events(
            &format!(
                "SELECT {EVENT_COLUMNS} FROM usage_events
                 WHERE user_id = ?1 AND (?2 IS NULL OR timestamp >= ?2)
                 ORDER BY timestamp, id"
            ),
            params![user_id, since],
        )
    }

    fn events_since(&self, since: Option<DateTime<Utc>>) -> StoreResult<Vec<UsageEvent>> {
        let since = since.as_ref().map(format_timestamp);
        self.query_events(
            &format!(
                "SELECT {EVENT_COLUMNS} FROM usage_events
                 WHERE ?1 IS NULL OR timestamp >= ?1
                 ORDER BY timestamp, id"
            ),
            params![since],
        )
    }
}
