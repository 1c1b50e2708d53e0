//! Core domain types for the Metas goal tracking system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and muscle groups (the catalog)
//! - Performed-exercise log entries
//! - Goals ("metas") and their per-exercise targets
//! - Aggregation and evaluation outputs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Catalog Types
// ============================================================================

/// A muscle group in the exercise catalog (e.g., "Peito")
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseGroup {
    pub id: String,
    pub name: String,
}

/// An exercise definition (e.g., "Supino Reto")
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub group_id: String,
    pub description: Option<String>,
}

/// The complete catalog of muscle groups and exercises
#[derive(Clone, Debug)]
pub struct Catalog {
    pub groups: HashMap<String, ExerciseGroup>,
    pub exercises: HashMap<String, Exercise>,
}

// ============================================================================
// Log Types
// ============================================================================

/// One completed exercise event in the performed log.
///
/// Entries are immutable once created; the log is append-only. A record with
/// a missing series or reps field deserializes with 0 for that field instead
/// of being dropped.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PerformedEntry {
    pub id: Uuid,
    pub exercise_id: String,
    #[serde(default)]
    pub performed_series: u32,
    #[serde(default)]
    pub performed_reps: u32,
    pub occurred_at: DateTime<Utc>,
}

// ============================================================================
// Goal Types
// ============================================================================

/// One line item inside a goal: an exercise with series/rep/weight targets.
///
/// `target_weight` is recorded at creation but not consulted by completion
/// matching.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseTarget {
    pub exercise_id: String,
    pub target_series: u32,
    pub target_reps: u32,
    #[serde(default)]
    pub target_weight: f64,
}

/// A named collection of exercise targets (a "meta").
///
/// `created_at` marks the start of the completion window; only log entries
/// at or after it can satisfy the goal's targets. Goals are immutable after
/// creation and never deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub targets: Vec<ExerciseTarget>,
}

impl Goal {
    /// Create a goal, enforcing the creation invariants: a non-empty name
    /// and at least one target.
    pub fn new(
        name: impl Into<String>,
        targets: Vec<ExerciseTarget>,
        created_at: DateTime<Utc>,
    ) -> crate::Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(crate::Error::Goal("goal name must not be empty".into()));
        }
        if targets.is_empty() {
            return Err(crate::Error::Goal(
                "a goal requires at least one exercise target".into(),
            ));
        }
        Ok(Goal {
            id: Uuid::new_v4(),
            name,
            created_at,
            targets,
        })
    }
}

// ============================================================================
// Aggregation and Evaluation Outputs
// ============================================================================

/// One calendar day of the performed log, for the history view
#[derive(Clone, Debug)]
pub struct DaySection {
    /// UTC calendar day shared by every entry in the section
    pub day: NaiveDate,
    /// Locale-formatted day label (weekday, day, month, year)
    pub label: String,
    /// Entries of the day, in their original relative order
    pub entries: Vec<PerformedEntry>,
}

/// Completion state of one goal against the log, for the goal-detail view
#[derive(Clone, Debug)]
pub struct CompletionResult {
    /// Exercise id → completion flag; duplicate targets for the same
    /// exercise AND together
    pub target_done: HashMap<String, bool>,
    /// Conjunction over every target of the goal
    pub goal_done: bool,
}

/// Aggregate counters for the profile view
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileStats {
    pub total_exercises: usize,
    pub total_reps: u64,
    pub goals_completed: usize,
}
