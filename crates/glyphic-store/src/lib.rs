//! Persistent symbol catalogs and usage logs.
//!
//! [`SqliteStore`] backs both collaborator traits from one database file.
//! [`JsonlUsageLog`] and the JSON catalog file are the lightweight
//! alternative used when no database has been initialized.

pub mod catalog_file;
mod jsonl;
mod sqlite;

pub use catalog_file::{load_catalog, read_catalog_file, BoardEntry, CatalogFile};
pub use jsonl::JsonlUsageLog;
pub use sqlite::SqliteStore;
