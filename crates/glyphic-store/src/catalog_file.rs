//! JSON catalog file: symbols plus board layouts

use anyhow::{Context, Result};
use glyphic_core::{CatalogSymbol, InMemoryCatalog};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// One cell of a board as written in the catalog file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEntry {
    pub symbol_id: String,
    /// Cells without a position go after the positioned ones, in file order
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub symbols: Vec<CatalogSymbol>,
    #[serde(default)]
    pub boards: BTreeMap<String, Vec<BoardEntry>>,
}

impl CatalogFile {
    /// Resolve a board's entries into contiguous layout positions.
    ///
    /// Entries naming a symbol absent from the file are dropped with a
    /// warning. Positions are renumbered from 0 so gaps and duplicates in
    /// the file collapse into a stable row-major order.
    pub fn board_layout<'a>(&self, entries: &'a [BoardEntry]) -> Vec<(usize, &'a BoardEntry)> {
        let known: HashSet<&str> = self.symbols.iter().map(|s| s.id.as_str()).collect();
        let mut ordered: Vec<(usize, &BoardEntry)> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                let found = known.contains(entry.symbol_id.as_str());
                if !found {
                    tracing::warn!(symbol = %entry.symbol_id, "board cell names unknown symbol");
                }
                found
            })
            .collect();
        ordered.sort_by_key(|(index, entry)| (entry.position.unwrap_or(usize::MAX), *index));
        ordered
            .into_iter()
            .enumerate()
            .map(|(position, (_, entry))| (position, entry))
            .collect()
    }

    pub fn into_catalog(self) -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        for symbol in &self.symbols {
            catalog.insert_symbol(symbol.clone());
        }
        for (board_id, entries) in &self.boards {
            for (_, entry) in self.board_layout(entries) {
                catalog.place(board_id, &entry.symbol_id, entry.hidden);
            }
        }
        catalog
    }
}

pub fn read_catalog_file(path: &Path) -> Result<CatalogFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))
}

/// Load a catalog file into memory
pub fn load_catalog(path: &Path) -> Result<InMemoryCatalog> {
    let file = read_catalog_file(path)?;
    tracing::debug!(
        path = %path.display(),
        symbols = file.symbols.len(),
        boards = file.boards.len(),
        "loaded catalog file"
    );
    Ok(file.into_catalog())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphic_core::SymbolCatalog;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "symbols": [
            {"id": "s1", "label": "want", "category": "actions"},
            {"id": "s2", "label": "cookie", "category": "food", "keywords": ["biscuit"]},
            {"id": "s3", "label": "galleta", "category": "food", "language": "es"}
        ],
        "boards": {
            "snack": [
                {"symbol_id": "s2"},
                {"symbol_id": "ghost", "position": 0},
                {"symbol_id": "s1", "position": 4},
                {"symbol_id": "s3", "position": 4, "hidden": true}
            ]
        }
    }"#;

    fn entry(symbol_id: &str, position: Option<usize>) -> BoardEntry {
        BoardEntry {
            symbol_id: symbol_id.to_string(),
            position,
            hidden: false,
        }
    }

    #[test]
    fn test_board_layout_renumbers_positions() {
        let file: CatalogFile = serde_json::from_str(CATALOG).unwrap();
        let layout = file.board_layout(&file.boards["snack"]);
        let ids: Vec<(usize, &str)> = layout
            .iter()
            .map(|(p, e)| (*p, e.symbol_id.as_str()))
            .collect();
        assert_eq!(ids, vec![(0, "s1"), (1, "s3"), (2, "s2")]);
    }

    #[test]
    fn test_board_layout_drops_unknown_symbols() {
        let file = CatalogFile::default();
        assert!(file.board_layout(&[entry("s1", Some(0))]).is_empty());
    }

    #[test]
    fn test_load_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, CATALOG).unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.find_by_label("biscuit", "en").unwrap().unwrap().id,
            "s2"
        );
        let cells = catalog.board_cells("snack").unwrap();
        assert_eq!(cells.len(), 3);
        assert!(cells[1].hidden);
        assert_eq!(cells[2].symbol.label, "cookie");
    }

    #[test]
    fn test_load_catalog_errors() {
        let dir = TempDir::new().unwrap();
        assert!(load_catalog(&dir.path().join("missing.json")).is_err());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse catalog"));
    }
}
