//! Performed-exercise history loading and day grouping.
//!
//! This module merges the journal and the CSV archive into a single log and
//! partitions it into calendar-day sections for the history view.

use crate::config::DEFAULT_DAY_LABEL_FORMAT;
use crate::{DaySection, PerformedEntry, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Locale, NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::Path;
use uuid::Uuid;

/// CSV row format for reading archived entries
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    exercise_id: String,
    performed_series: Option<u32>,
    performed_reps: Option<u32>,
    occurred_at: String,
}

impl TryFrom<CsvRow> for PerformedEntry {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;

        let occurred_at = DateTime::parse_from_rfc3339(&row.occurred_at)
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        Ok(PerformedEntry {
            id,
            exercise_id: row.exercise_id,
            performed_series: row.performed_series.unwrap_or(0),
            performed_reps: row.performed_reps.unwrap_or(0),
            occurred_at,
        })
    }
}

/// Load the full performed log from both journal and CSV
///
/// Returns entries sorted by occurred_at (newest first).
/// Automatically deduplicates entries that appear in both journal and CSV.
pub fn load_entries(journal_path: &Path, csv_path: &Path) -> Result<Vec<PerformedEntry>> {
    let mut entries = Vec::new();
    let mut seen_ids = HashSet::new();

    // Load from the journal first (most recent)
    if journal_path.exists() {
        for entry in crate::journal::read_entries(journal_path)? {
            seen_ids.insert(entry.id);
            entries.push(entry);
        }
        tracing::debug!("Loaded {} entries from journal", entries.len());
    }

    // Load from CSV (archived)
    if csv_path.exists() {
        let csv_entries = load_entries_from_csv(csv_path)?;
        let mut csv_count = 0;
        for entry in csv_entries {
            if !seen_ids.contains(&entry.id) {
                seen_ids.insert(entry.id);
                entries.push(entry);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} entries from CSV", csv_count);
    }

    // Sort by occurred_at, newest first
    entries.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

    tracing::info!("Loaded {} total entries", entries.len());

    Ok(entries)
}

/// Load all entries from a CSV file
fn load_entries_from_csv(path: &Path) -> Result<Vec<PerformedEntry>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut entries = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match PerformedEntry::try_from(row) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                    // Continue processing other rows
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(entries)
}

/// Format the heading for one calendar day
///
/// A pattern that is malformed, or that needs time-of-day or zone fields a
/// calendar day does not carry, falls back to the default rather than
/// failing the history view.
pub fn day_label(day: NaiveDate, format: &str, locale: Locale) -> String {
    match render_day(day, format, locale) {
        Some(label) => label,
        None => {
            tracing::warn!("Invalid day label format {:?}, using default", format);
            day.format_localized(DEFAULT_DAY_LABEL_FORMAT, locale)
                .to_string()
        }
    }
}

/// Check whether a strftime pattern can label a calendar day
///
/// Rejects malformed patterns and patterns with time-of-day or zone items.
pub fn is_valid_day_label_format(format: &str) -> bool {
    render_day(NaiveDate::default(), format, Locale::POSIX).is_some()
}

fn render_day(day: NaiveDate, format: &str, locale: Locale) -> Option<String> {
    let items: Vec<Item> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| *item == Item::Error) {
        return None;
    }
    // A time item against a date-only value reports a fmt error through the
    // writer; to_string would panic on it
    let mut label = String::new();
    write!(
        label,
        "{}",
        day.format_localized_with_items(items.into_iter(), locale)
    )
    .ok()?;
    Some(label)
}

/// Partition entries into calendar-day sections for the history view
///
/// Entries sharing a UTC calendar day land in one section, keeping their
/// input order. Sections are ordered by their first entry's occurred_at,
/// newest day first. Empty input produces no sections.
pub fn group_by_day(
    entries: Vec<PerformedEntry>,
    format: &str,
    locale: Locale,
) -> Vec<DaySection> {
    let mut sections: Vec<DaySection> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for entry in entries {
        let day = entry.occurred_at.date_naive();
        match index.get(&day) {
            Some(&i) => sections[i].entries.push(entry),
            None => {
                index.insert(day, sections.len());
                sections.push(DaySection {
                    day,
                    label: day_label(day, format, locale),
                    entries: vec![entry],
                });
            }
        }
    }

    sections.sort_by(|a, b| b.entries[0].occurred_at.cmp(&a.entries[0].occurred_at));

    sections
}
