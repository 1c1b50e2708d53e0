#![forbid(unsafe_code)]

//! Core domain model and business logic for the Metas goal tracking system.
//!
//! This crate provides:
//! - Domain types (exercises, log entries, goals, stats)
//! - Catalog management
//! - Goal completion evaluation
//! - Persistence (journal, CSV, goal list)
//! - History loading and day grouping

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod journal;
pub mod csv_rollup;
pub mod goals;
pub mod history;
pub mod evaluator;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_catalog, build_default_catalog};
pub use config::Config;
pub use journal::{EntrySink, JsonlSink};
pub use goals::GoalBook;
pub use history::{day_label, group_by_day, is_valid_day_label_format, load_entries};
pub use evaluator::{compute_profile_stats, evaluate_goal, is_goal_done, is_target_done};
