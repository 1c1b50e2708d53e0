//! Goal completion evaluation over the performed log.
//!
//! This module implements the evaluation rules:
//! - A target is met by a single log entry at or after the goal's creation
//! - A goal is done when every one of its targets is met
//! - Profile statistics aggregate the whole log plus goal completion

use crate::{CompletionResult, ExerciseTarget, Goal, PerformedEntry, ProfileStats};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Check whether one target has been met by the log
///
/// A target is met when some single entry matches the target's exercise,
/// occurred at or after `since`, and reaches both the series and the reps
/// threshold in that one entry. Series and reps from separate entries never
/// combine. The target's weight is not consulted.
pub fn is_target_done(
    target: &ExerciseTarget,
    since: DateTime<Utc>,
    log: &[PerformedEntry],
) -> bool {
    log.iter().any(|entry| {
        entry.exercise_id == target.exercise_id
            && entry.occurred_at >= since
            && entry.performed_series >= target.target_series
            && entry.performed_reps >= target.target_reps
    })
}

/// Check whether every target of a goal has been met
///
/// Only entries at or after the goal's creation count. A goal with no
/// targets is vacuously done; `Goal::new` refuses to create one, but data
/// read from disk is still evaluated under that rule.
pub fn is_goal_done(goal: &Goal, log: &[PerformedEntry]) -> bool {
    goal.targets
        .iter()
        .all(|target| is_target_done(target, goal.created_at, log))
}

/// Evaluate one goal into per-exercise flags plus the overall verdict
///
/// The map carries one flag per exercise id; when a goal lists the same
/// exercise more than once, the flags AND together. `goal_done` is the
/// conjunction over the target list itself.
pub fn evaluate_goal(goal: &Goal, log: &[PerformedEntry]) -> CompletionResult {
    let mut target_done: HashMap<String, bool> = HashMap::new();
    let mut goal_done = true;

    for target in &goal.targets {
        let done = is_target_done(target, goal.created_at, log);
        goal_done &= done;
        target_done
            .entry(target.exercise_id.clone())
            .and_modify(|flag| *flag &= done)
            .or_insert(done);
    }

    tracing::debug!("Goal '{}' evaluated: done={}", goal.name, goal_done);

    CompletionResult {
        target_done,
        goal_done,
    }
}

/// Compute the profile counters from the full log and goal list
///
/// Counts every log entry, sums performed reps, and counts goals whose
/// every target is met. Empty inputs produce zeroed stats.
pub fn compute_profile_stats(log: &[PerformedEntry], goals: &[Goal]) -> ProfileStats {
    let total_reps = log.iter().map(|e| u64::from(e.performed_reps)).sum();
    let goals_completed = goals.iter().filter(|g| is_goal_done(g, log)).count();

    ProfileStats {
        total_exercises: log.len(),
        total_reps,
        goals_completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn entry(exercise_id: &str, series: u32, reps: u32, occurred_at: DateTime<Utc>) -> PerformedEntry {
        PerformedEntry {
            id: Uuid::new_v4(),
            exercise_id: exercise_id.into(),
            performed_series: series,
            performed_reps: reps,
            occurred_at,
        }
    }

    fn target(exercise_id: &str, series: u32, reps: u32) -> ExerciseTarget {
        ExerciseTarget {
            exercise_id: exercise_id.into(),
            target_series: series,
            target_reps: reps,
            target_weight: 0.0,
        }
    }

    fn goal_with(targets: Vec<ExerciseTarget>, created_at: DateTime<Utc>) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            name: "Projeto verão".into(),
            created_at,
            targets,
        }
    }

    #[test]
    fn test_target_met_at_exact_thresholds() {
        let log = vec![entry("supino_reto", 3, 10, at(2024, 5, 2, 10))];
        let t = target("supino_reto", 3, 10);
        assert!(is_target_done(&t, at(2024, 5, 1, 0), &log));
    }

    #[test]
    fn test_target_not_met_below_either_threshold() {
        let since = at(2024, 5, 1, 0);
        let t = target("supino_reto", 3, 10);

        let low_series = vec![entry("supino_reto", 2, 15, at(2024, 5, 2, 10))];
        assert!(!is_target_done(&t, since, &low_series));

        let low_reps = vec![entry("supino_reto", 4, 9, at(2024, 5, 2, 10))];
        assert!(!is_target_done(&t, since, &low_reps));
    }

    #[test]
    fn test_target_requires_single_entry_match() {
        // 3x8 and 1x12 together cover 3 series and 12 reps, but no single
        // entry reaches both thresholds
        let since = at(2024, 5, 1, 0);
        let t = target("supino_reto", 3, 12);
        let log = vec![
            entry("supino_reto", 3, 8, at(2024, 5, 2, 10)),
            entry("supino_reto", 1, 12, at(2024, 5, 2, 11)),
        ];
        assert!(!is_target_done(&t, since, &log));
    }

    #[test]
    fn test_entry_before_creation_does_not_count() {
        let since = at(2024, 5, 1, 12);
        let t = target("supino_reto", 3, 10);
        let log = vec![entry("supino_reto", 5, 20, at(2024, 5, 1, 11))];
        assert!(!is_target_done(&t, since, &log));
    }

    #[test]
    fn test_entry_at_creation_instant_counts() {
        let since = at(2024, 5, 1, 12);
        let t = target("supino_reto", 3, 10);
        let log = vec![entry("supino_reto", 3, 10, since)];
        assert!(is_target_done(&t, since, &log));
    }

    #[test]
    fn test_other_exercise_never_matches() {
        let since = at(2024, 5, 1, 0);
        let t = target("supino_reto", 3, 10);
        let log = vec![entry("agachamento", 10, 50, at(2024, 5, 2, 10))];
        assert!(!is_target_done(&t, since, &log));
    }

    #[test]
    fn test_target_weight_is_ignored() {
        let since = at(2024, 5, 1, 0);
        let mut t = target("supino_reto", 3, 10);
        t.target_weight = 120.0;
        let log = vec![entry("supino_reto", 3, 10, at(2024, 5, 2, 10))];
        assert!(is_target_done(&t, since, &log));
    }

    #[test]
    fn test_goal_done_requires_every_target() {
        let created = at(2024, 5, 1, 0);
        let goal = goal_with(
            vec![target("supino_reto", 3, 10), target("agachamento", 4, 12)],
            created,
        );

        let partial = vec![entry("supino_reto", 3, 10, at(2024, 5, 2, 10))];
        assert!(!is_goal_done(&goal, &partial));

        let full = vec![
            entry("supino_reto", 3, 10, at(2024, 5, 2, 10)),
            entry("agachamento", 4, 12, at(2024, 5, 3, 10)),
        ];
        assert!(is_goal_done(&goal, &full));
    }

    #[test]
    fn test_goal_without_targets_is_vacuously_done() {
        let goal = goal_with(vec![], at(2024, 5, 1, 0));
        assert!(is_goal_done(&goal, &[]));
    }

    #[test]
    fn test_evaluate_goal_flags_per_exercise() {
        let created = at(2024, 5, 1, 0);
        let goal = goal_with(
            vec![target("supino_reto", 3, 10), target("agachamento", 4, 12)],
            created,
        );
        let log = vec![entry("supino_reto", 3, 10, at(2024, 5, 2, 10))];

        let result = evaluate_goal(&goal, &log);
        assert!(result.target_done["supino_reto"]);
        assert!(!result.target_done["agachamento"]);
        assert!(!result.goal_done);
    }

    #[test]
    fn test_evaluate_goal_duplicate_exercise_flags_and_together() {
        let created = at(2024, 5, 1, 0);
        let goal = goal_with(
            vec![target("supino_reto", 3, 8), target("supino_reto", 5, 20)],
            created,
        );
        // Meets the easy target only
        let log = vec![entry("supino_reto", 3, 10, at(2024, 5, 2, 10))];

        let result = evaluate_goal(&goal, &log);
        assert_eq!(result.target_done.len(), 1);
        assert!(!result.target_done["supino_reto"]);
        assert!(!result.goal_done);
    }

    #[test]
    fn test_completion_is_monotonic_under_append() {
        let created = at(2024, 5, 1, 0);
        let goal = goal_with(vec![target("supino_reto", 3, 10)], created);

        let mut log = vec![entry("supino_reto", 3, 10, at(2024, 5, 2, 10))];
        assert!(is_goal_done(&goal, &log));

        // Appending entries, including weaker sessions of the same exercise,
        // never revokes completion
        log.push(entry("supino_reto", 1, 1, at(2024, 5, 3, 10)));
        log.push(entry("agachamento", 5, 20, at(2024, 5, 4, 10)));
        assert!(is_goal_done(&goal, &log));

        let result = evaluate_goal(&goal, &log);
        assert!(result.goal_done);
        assert!(result.target_done["supino_reto"]);
    }

    #[test]
    fn test_pending_target_flips_done_on_append() {
        let created = at(2024, 5, 1, 0);
        let goal = goal_with(vec![target("agachamento", 4, 12)], created);

        let mut log = vec![entry("agachamento", 2, 12, at(2024, 5, 2, 10))];
        assert!(!is_goal_done(&goal, &log));

        log.push(entry("agachamento", 4, 12, at(2024, 5, 3, 10)));
        assert!(is_goal_done(&goal, &log));
    }

    #[test]
    fn test_profile_stats_counts_and_sums() {
        let created = at(2024, 5, 1, 0);
        let done_goal = goal_with(vec![target("supino_reto", 3, 10)], created);
        let pending_goal = goal_with(vec![target("agachamento", 4, 12)], created);

        let log = vec![
            entry("supino_reto", 3, 10, at(2024, 5, 2, 10)),
            entry("prancha", 3, 0, at(2024, 5, 2, 11)),
            entry("rosca_direta", 2, 12, at(2024, 5, 3, 10)),
        ];

        let stats = compute_profile_stats(&log, &[done_goal, pending_goal]);
        assert_eq!(stats.total_exercises, 3);
        assert_eq!(stats.total_reps, 22);
        assert_eq!(stats.goals_completed, 1);
    }

    #[test]
    fn test_profile_stats_empty_inputs() {
        let stats = compute_profile_stats(&[], &[]);
        assert_eq!(
            stats,
            ProfileStats {
                total_exercises: 0,
                total_reps: 0,
                goals_completed: 0,
            }
        );
    }
}
