use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use metas_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metas")]
#[command(about = "Workout goal tracking system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the muscle groups and exercises
    Catalog,

    /// Log a performed exercise
    Log {
        /// Exercise id (see `metas catalog`)
        exercise: String,

        /// Number of series performed
        #[arg(long)]
        series: u32,

        /// Number of reps performed
        #[arg(long)]
        reps: u32,

        /// Backfill timestamp (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Show the workout history grouped by day (default)
    History {
        /// Only show the last N days
        #[arg(long)]
        days: Option<i64>,
    },

    /// Manage goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Show profile statistics
    Stats,

    /// Roll up journal entries to CSV
    Rollup {
        /// Clean up processed journal files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Create a goal from target specs
    New {
        /// Goal name
        name: String,

        /// Target as exercise:series:reps[:weight], repeatable
        #[arg(long = "target", required = true)]
        targets: Vec<String>,
    },

    /// List goals with their completion state
    List,

    /// Show one goal's targets and progress
    Show {
        /// Goal name (case-insensitive)
        name: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    metas_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    for problem in config.validate() {
        tracing::warn!("Config problem: {}", problem);
    }
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    if data_dir.exists() && !data_dir.is_dir() {
        return Err(Error::Config(format!(
            "data directory {} is not a directory",
            data_dir.display()
        )));
    }

    match cli.command {
        Some(Commands::Catalog) => cmd_catalog(&config),
        Some(Commands::Log {
            exercise,
            series,
            reps,
            at,
        }) => cmd_log(data_dir, &config, exercise, series, reps, at),
        Some(Commands::History { days }) => cmd_history(data_dir, &config, days),
        Some(Commands::Goal { command }) => match command {
            GoalCommands::New { name, targets } => cmd_goal_new(data_dir, &config, name, targets),
            GoalCommands::List => cmd_goal_list(data_dir),
            GoalCommands::Show { name } => cmd_goal_show(data_dir, &config, name),
        },
        Some(Commands::Stats) => cmd_stats(data_dir),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(data_dir, cleanup),
        None => {
            // Default to "history" command
            cmd_history(data_dir, &config, None)
        }
    }
}

/// Build the catalog from config, failing hard on validation errors
fn load_catalog(config: &Config) -> Result<Catalog> {
    let catalog = build_catalog(&config.catalog);
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    Ok(catalog)
}

fn exercise_name<'a>(catalog: &'a Catalog, id: &'a str) -> &'a str {
    catalog.exercise(id).map(|e| e.name.as_str()).unwrap_or(id)
}

fn cmd_catalog(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;

    for group in catalog.sorted_groups() {
        println!("{}", group.name);
        for exercise in catalog.exercises_in_group(&group.id) {
            println!("  {:<24} {}", exercise.id, exercise.name);
            if let Some(ref description) = exercise.description {
                println!("  {:<24} {}", "", description);
            }
        }
        println!();
    }

    Ok(())
}

fn cmd_log(
    data_dir: PathBuf,
    config: &Config,
    exercise: String,
    series: u32,
    reps: u32,
    at: Option<String>,
) -> Result<()> {
    let catalog = load_catalog(config)?;

    let Some(definition) = catalog.exercise(&exercise) else {
        eprintln!("Unknown exercise: {}", exercise);
        eprintln!("Run `metas catalog` to list the available exercises.");
        return Err(Error::CatalogValidation(format!(
            "unknown exercise '{}'",
            exercise
        )));
    };

    let occurred_at = match at {
        Some(ref s) => DateTime::parse_from_rfc3339(s)
            .map_err(|e| Error::Other(format!("Invalid --at timestamp '{}': {}", s, e)))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let entry = PerformedEntry {
        id: uuid::Uuid::new_v4(),
        exercise_id: definition.id.clone(),
        performed_series: series,
        performed_reps: reps,
        occurred_at,
    };

    let journal_path = data_dir.join("journal").join("performed.jsonl");
    let mut sink = JsonlSink::new(&journal_path);
    sink.append(&entry)?;

    println!("✓ Exercise logged: {} ({}x{})", definition.name, series, reps);

    Ok(())
}

fn cmd_history(data_dir: PathBuf, config: &Config, days: Option<i64>) -> Result<()> {
    let journal_path = data_dir.join("journal").join("performed.jsonl");
    let csv_path = data_dir.join("history.csv");

    let mut entries = load_entries(&journal_path, &csv_path)?;

    if let Some(days) = days {
        let cutoff = Utc::now() - Duration::days(days);
        entries.retain(|e| e.occurred_at >= cutoff);
    }

    if entries.is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }

    let catalog = build_catalog(&config.catalog);
    let sections = group_by_day(
        entries,
        &config.display.day_label_format,
        config.display.locale(),
    );

    for section in &sections {
        println!("{}", section.label);
        for entry in &section.entries {
            println!(
                "  {}  {:<24} {}x{}",
                entry.occurred_at.format("%H:%M"),
                exercise_name(&catalog, &entry.exercise_id),
                entry.performed_series,
                entry.performed_reps
            );
        }
        println!();
    }

    Ok(())
}

fn cmd_goal_new(
    data_dir: PathBuf,
    config: &Config,
    name: String,
    targets: Vec<String>,
) -> Result<()> {
    let catalog = load_catalog(config)?;

    let mut parsed = Vec::new();
    for spec in &targets {
        parsed.push(parse_target(spec, &catalog)?);
    }

    let goal = Goal::new(name, parsed, Utc::now())?;
    let goal_name = goal.name.clone();
    let target_count = goal.targets.len();

    let goals_path = data_dir.join("goals.json");
    GoalBook::update(&goals_path, |book| book.add(goal))?;

    println!("✓ Goal created: {} ({} targets)", goal_name, target_count);

    Ok(())
}

/// Parse a target spec of the form `exercise:series:reps[:weight]`
fn parse_target(spec: &str, catalog: &Catalog) -> Result<ExerciseTarget> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() < 3 || parts.len() > 4 {
        return Err(Error::Goal(format!(
            "invalid target '{}': expected exercise:series:reps[:weight]",
            spec
        )));
    }

    let exercise_id = parts[0].trim();
    if catalog.exercise(exercise_id).is_none() {
        return Err(Error::CatalogValidation(format!(
            "unknown exercise '{}'",
            exercise_id
        )));
    }

    let target_series: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| Error::Goal(format!("invalid series count in target '{}'", spec)))?;
    let target_reps: u32 = parts[2]
        .trim()
        .parse()
        .map_err(|_| Error::Goal(format!("invalid reps count in target '{}'", spec)))?;
    let target_weight: f64 = match parts.get(3) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Goal(format!("invalid weight in target '{}'", spec)))?,
        None => 0.0,
    };
    // f64 parsing accepts "nan", "inf" and negatives, none of which make
    // sense as a load
    if !target_weight.is_finite() || target_weight < 0.0 {
        return Err(Error::Goal(format!(
            "weight must be a non-negative number in target '{}'",
            spec
        )));
    }

    Ok(ExerciseTarget {
        exercise_id: exercise_id.into(),
        target_series,
        target_reps,
        target_weight,
    })
}

fn cmd_goal_list(data_dir: PathBuf) -> Result<()> {
    let goals_path = data_dir.join("goals.json");
    let journal_path = data_dir.join("journal").join("performed.jsonl");
    let csv_path = data_dir.join("history.csv");

    let book = GoalBook::load(&goals_path)?;
    if book.goals.is_empty() {
        println!("No goals yet.");
        return Ok(());
    }

    let entries = load_entries(&journal_path, &csv_path)?;

    for goal in &book.goals {
        let marker = if is_goal_done(goal, &entries) {
            "✓"
        } else {
            "·"
        };
        println!(
            "{} {} ({} targets, created {})",
            marker,
            goal.name,
            goal.targets.len(),
            goal.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

fn cmd_goal_show(data_dir: PathBuf, config: &Config, name: String) -> Result<()> {
    let goals_path = data_dir.join("goals.json");
    let journal_path = data_dir.join("journal").join("performed.jsonl");
    let csv_path = data_dir.join("history.csv");

    let book = GoalBook::load(&goals_path)?;
    let Some(goal) = book.find_by_name(&name) else {
        eprintln!("No goal named '{}'.", name);
        eprintln!("Run `metas goal list` to list your goals.");
        return Err(Error::Goal(format!("no goal named '{}'", name)));
    };

    let entries = load_entries(&journal_path, &csv_path)?;
    let result = evaluate_goal(goal, &entries);
    let catalog = build_catalog(&config.catalog);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  GOAL: {}", goal.name);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Created: {}", goal.created_at.format("%Y-%m-%d %H:%M"));
    println!();

    for target in &goal.targets {
        let done = result
            .target_done
            .get(&target.exercise_id)
            .copied()
            .unwrap_or(false);
        let status = if done { "done   " } else { "pending" };
        let weight = if target.target_weight > 0.0 {
            format!(" @ {}kg", target.target_weight)
        } else {
            String::new()
        };
        println!(
            "  [{}] {:<24} {}x{}{}",
            status,
            exercise_name(&catalog, &target.exercise_id),
            target.target_series,
            target.target_reps,
            weight
        );
    }

    println!();
    if result.goal_done {
        println!("✓ Goal complete!");
    } else {
        println!("Goal in progress.");
    }

    Ok(())
}

fn cmd_stats(data_dir: PathBuf) -> Result<()> {
    let goals_path = data_dir.join("goals.json");
    let journal_path = data_dir.join("journal").join("performed.jsonl");
    let csv_path = data_dir.join("history.csv");

    let entries = load_entries(&journal_path, &csv_path)?;
    let book = GoalBook::load(&goals_path)?;

    let stats = compute_profile_stats(&entries, &book.goals);

    println!("Exercises logged: {}", stats.total_exercises);
    println!("Total reps: {}", stats.total_reps);
    println!(
        "Goals completed: {} of {}",
        stats.goals_completed,
        book.goals.len()
    );

    Ok(())
}

fn cmd_rollup(data_dir: PathBuf, cleanup: bool) -> Result<()> {
    let journal_dir = data_dir.join("journal");
    let journal_path = journal_dir.join("performed.jsonl");
    let csv_path = data_dir.join("history.csv");

    if !journal_path.exists() {
        println!("No journal file found - nothing to roll up.");
        return Ok(());
    }

    let count = metas_core::csv_rollup::journal_to_csv_and_archive(&journal_path, &csv_path)?;

    println!("✓ Rolled up {} entries to CSV", count);
    println!("  CSV: {}", csv_path.display());

    if cleanup {
        let cleaned = metas_core::csv_rollup::cleanup_processed_journals(&journal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed journal files", cleaned);
        }
    }

    Ok(())
}
