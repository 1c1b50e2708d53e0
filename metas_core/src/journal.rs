//! Append-only journal for performed-exercise persistence.
//!
//! Entries are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access.

use crate::{PerformedEntry, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Entry sink trait for persisting performed entries
pub trait EntrySink {
    fn append(&mut self, entry: &PerformedEntry) -> Result<()>;
}

/// JSONL-based entry sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl EntrySink for JsonlSink {
    fn append(&mut self, entry: &PerformedEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        // Open file for appending
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        // Write entry as JSON line
        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        // Lock is automatically released when file is dropped
        file.unlock()?;

        tracing::debug!("Appended entry {} to journal", entry.id);
        Ok(())
    }
}

/// Read all entries from a journal file
///
/// Lines that fail to parse are skipped with a warning so that one corrupt
/// record never hides the rest of the log.
pub fn read_entries(path: &Path) -> Result<Vec<PerformedEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<PerformedEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Failed to parse entry at line {}: {}", line_num + 1, e);
                // Continue reading, don't fail completely
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} entries from journal", entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn create_test_entry() -> PerformedEntry {
        PerformedEntry {
            id: Uuid::new_v4(),
            exercise_id: "supino_reto".into(),
            performed_series: 3,
            performed_reps: 10,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_append_and_read_single_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("performed.jsonl");

        let entry = create_test_entry();
        let entry_id = entry.id;

        // Append entry
        let mut sink = JsonlSink::new(&journal_path);
        sink.append(&entry).unwrap();

        // Read back
        let entries = read_entries(&journal_path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry_id);
    }

    #[test]
    fn test_append_multiple_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("performed.jsonl");

        let mut sink = JsonlSink::new(&journal_path);

        // Append multiple entries
        for _ in 0..5 {
            let entry = create_test_entry();
            sink.append(&entry).unwrap();
        }

        // Read back
        let entries = read_entries(&journal_path).unwrap();
        assert_eq!(entries.len(), 5);
    }

    #[test]
    fn test_read_empty_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("nonexistent.jsonl");

        let entries = read_entries(&journal_path).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_corrupt_line_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("performed.jsonl");

        let mut sink = JsonlSink::new(&journal_path);
        sink.append(&create_test_entry()).unwrap();

        // Inject a garbage line between two valid entries
        {
            let mut file = OpenOptions::new()
                .append(true)
                .open(&journal_path)
                .unwrap();
            writeln!(file, "{{not valid json").unwrap();
        }
        sink.append(&create_test_entry()).unwrap();

        let entries = read_entries(&journal_path).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("performed.jsonl");

        let line = format!(
            "{{\"id\":\"{}\",\"exercise_id\":\"prancha\",\"occurred_at\":\"2024-05-02T10:00:00Z\"}}",
            Uuid::new_v4()
        );
        std::fs::write(&journal_path, format!("{}\n", line)).unwrap();

        let entries = read_entries(&journal_path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].performed_series, 0);
        assert_eq!(entries[0].performed_reps, 0);
    }
}
