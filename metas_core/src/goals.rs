//! Goal list persistence with file locking.
//!
//! Goals are stored as a JSON array. Loading salvages every well-formed
//! goal from the file; saving replaces the file atomically.

use crate::{Error, Goal, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The user's goal list as stored on disk
#[derive(Clone, Debug, Default)]
pub struct GoalBook {
    pub goals: Vec<Goal>,
}

impl GoalBook {
    /// Load the goal list from a file with shared locking
    ///
    /// Returns an empty book if the file doesn't exist. A file that is not
    /// a JSON array logs a warning and yields an empty book; malformed
    /// elements inside the array are skipped individually.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No goals file found, starting with an empty list");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open goals file {:?}: {}. Using empty list.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock goals file {:?}: {}. Using empty list.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read goals file {:?}: {}. Using empty list.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<Vec<serde_json::Value>>(&contents) {
            Ok(values) => {
                let mut goals = Vec::new();
                for (index, value) in values.into_iter().enumerate() {
                    match serde_json::from_value::<Goal>(value) {
                        Ok(goal) => goals.push(goal),
                        Err(e) => {
                            tracing::warn!("Skipping malformed goal at index {}: {}", index, e);
                        }
                    }
                }
                tracing::debug!("Loaded {} goals from {:?}", goals.len(), path);
                Ok(Self { goals })
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse goals file {:?}: {}. Using empty list.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save the goal list to a file with exclusive locking
    ///
    /// Atomically writes the list by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "goals path missing parent")
        })?)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(&self.goals)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace the old goals file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} goals to {:?}", self.goals.len(), path);
        Ok(())
    }

    /// Load the list, modify it, and save it back atomically
    ///
    /// Concurrent load-modify-save cycles serialize on a sibling lock
    /// file. Save replaces the goals file by rename, so the goals file
    /// itself cannot carry the lock.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut GoalBook) -> Result<()>,
    {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock = File::create(path.with_extension("json.lock"))?;
        lock.lock_exclusive()?;

        let mut book = Self::load(path)?;
        f(&mut book)?;
        book.save(path)?;

        lock.unlock()?;
        Ok(book)
    }

    /// Find a goal by name, case-insensitively
    pub fn find_by_name(&self, name: &str) -> Option<&Goal> {
        let wanted = name.to_lowercase();
        self.goals.iter().find(|g| g.name.to_lowercase() == wanted)
    }

    /// Add a goal, rejecting duplicate names
    pub fn add(&mut self, goal: Goal) -> Result<()> {
        if self.find_by_name(&goal.name).is_some() {
            return Err(Error::Goal(format!(
                "a goal named '{}' already exists",
                goal.name
            )));
        }
        self.goals.push(goal);
        Ok(())
    }
}
