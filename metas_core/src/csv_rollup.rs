//! CSV rollup functionality for archiving journal entries.
//!
//! This module implements atomic journal-to-CSV conversion with proper error
//! handling to prevent data loss.

use crate::{PerformedEntry, Result};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    exercise_id: String,
    performed_series: u32,
    performed_reps: u32,
    occurred_at: String,
}

impl From<&PerformedEntry> for CsvRow {
    fn from(entry: &PerformedEntry) -> Self {
        CsvRow {
            id: entry.id.to_string(),
            exercise_id: entry.exercise_id.clone(),
            performed_series: entry.performed_series,
            performed_reps: entry.performed_reps,
            occurred_at: entry.occurred_at.to_rfc3339(),
        }
    }
}

/// Roll up journal entries into CSV and archive the journal atomically
///
/// This function:
/// 1. Reads all entries from the journal
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the journal to .processed
/// 5. Returns the number of entries processed
///
/// # Safety
/// - CSV is fsynced before the journal is renamed
/// - The journal is renamed (not deleted) to allow manual recovery if needed
/// - Processed journal files can be cleaned up manually
pub fn journal_to_csv_and_archive(journal_path: &Path, csv_path: &Path) -> Result<usize> {
    // Read all entries from the journal
    let entries = crate::journal::read_entries(journal_path)?;

    if entries.is_empty() {
        tracing::info!("No entries in journal to roll up");
        return Ok(0);
    }

    // Ensure parent directory exists
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Open CSV file for appending
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Determine if we need to write headers by checking file size after opening
    // This avoids an extra stat() syscall
    let needs_headers = file.metadata()?.len() == 0;

    // CSV writer automatically writes headers if the serialized type has them
    // For appending, we need to skip headers manually if file already has content
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    // Write all entries to CSV
    for entry in &entries {
        let row = CsvRow::from(entry);
        writer.serialize(row)?;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} entries to CSV", entries.len());

    // Atomically archive the journal by renaming it
    let processed_path = journal_path.with_extension("jsonl.processed");
    std::fs::rename(journal_path, &processed_path)?;

    tracing::info!("Archived journal to {:?}", processed_path);

    Ok(entries.len())
}

/// Clean up old processed journal files
///
/// This removes all .jsonl.processed files in the given directory.
pub fn cleanup_processed_journals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed journal: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed journal files", count);
    }

    Ok(count)
}
