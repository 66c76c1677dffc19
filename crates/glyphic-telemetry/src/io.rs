//! JSONL I/O and atomic file operations

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Append a batch of JSON records to a JSONL file in a single write.
///
/// Every record is serialized before the file is touched, so a record that
/// fails to serialize leaves the file unchanged.
pub fn append_jsonl_batch<T: Serialize>(path: &Path, records: &[T]) -> std::io::Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut buffer = String::new();
    for record in records {
        buffer.push_str(&serde_json::to_string(record)?);
        buffer.push('\n');
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(buffer.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Read all records from a JSONL file
pub fn read_jsonl<T: for<'de> Deserialize<'de>>(path: &Path) -> std::io::Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(_) => continue, // Skip malformed lines
        }
    }

    Ok(records)
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Tap {
        label: String,
        position: usize,
    }

    fn tap(label: &str, position: usize) -> Tap {
        Tap {
            label: label.to_string(),
            position,
        }
    }

    #[test]
    fn test_batch_append_then_read() {
        let temp = tempfile::TempDir::new().unwrap();
        let log = temp.path().join("usage.jsonl");

        append_jsonl_batch(&log, &[tap("want", 0), tap("cookie", 1)]).unwrap();
        append_jsonl_batch(&log, &[tap("hello", 0)]).unwrap();

        let taps: Vec<Tap> = read_jsonl(&log).unwrap();
        assert_eq!(taps, vec![tap("want", 0), tap("cookie", 1), tap("hello", 0)]);
    }

    #[test]
    fn test_empty_batch_creates_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        let log = temp.path().join("nested").join("usage.jsonl");

        append_jsonl_batch::<Tap>(&log, &[]).unwrap();
        assert!(!log.exists());
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let temp = tempfile::TempDir::new().unwrap();
        let log = temp.path().join("usage.jsonl");
        std::fs::write(
            &log,
            "{\"label\":\"go\",\"position\":0}\nnot json\n\n{\"label\":\"park\",\"position\":1}\n",
        )
        .unwrap();

        let taps: Vec<Tap> = read_jsonl(&log).unwrap();
        assert_eq!(taps.len(), 2);
        assert_eq!(taps[1].label, "park");
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let taps: Vec<Tap> = read_jsonl(&temp.path().join("absent.jsonl")).unwrap();
        assert!(taps.is_empty());
    }

    #[test]
    fn test_atomic_write() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("glyphic.json");

        atomic_write(&target, b"{}").unwrap();
        atomic_write(&target, b"{\"models_dir\":null}").unwrap();

        let read_data = std::fs::read(&target).unwrap();
        assert_eq!(read_data.as_slice(), b"{\"models_dir\":null}");
        assert!(!target.with_extension("tmp").exists());
    }
}
