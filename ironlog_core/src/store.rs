//! Persistence gateway for workout records, feed posts, PRs, templates and
//! the user profile.
//!
//! Two implementations: `FileStore` keeps append-only JSONL logs for the
//! workout history and the feed (with file locking), and whole-file atomic
//! replacement for the PR table, templates and profile. `MemoryStore` backs
//! unit tests. Unreadable storage always reads as empty; a write failure is
//! an error the caller may surface, never a partial write.

use crate::{Error, FeedPost, PrTable, Profile, Result, Template, WorkoutRecord};
use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Logical persistence operations the core depends on
pub trait Store {
    fn profile(&self) -> Result<Profile>;
    /// Workout history, most recent first
    fn workout_history(&self) -> Result<Vec<WorkoutRecord>>;
    fn pr_table(&self) -> Result<PrTable>;
    fn templates(&self) -> Result<Vec<Template>>;

    fn append_workout(&mut self, workout: &WorkoutRecord) -> Result<()>;
    fn append_post(&mut self, post: &FeedPost) -> Result<()>;
    fn save_pr_table(&mut self, table: &PrTable) -> Result<()>;
    fn upsert_template(&mut self, template: &Template) -> Result<()>;
    /// Deleting an id that no longer exists is a silent no-op
    fn delete_template(&mut self, id: Uuid) -> Result<()>;
}

// ============================================================================
// File-backed store
// ============================================================================

/// Data-directory layout:
/// - `workouts.jsonl`, `posts.jsonl` — append-only, one record per line
/// - `prs.json`, `templates.json`, `profile.json` — whole-file replace
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn workouts_path(&self) -> PathBuf {
        self.data_dir.join("workouts.jsonl")
    }

    fn posts_path(&self) -> PathBuf {
        self.data_dir.join("posts.jsonl")
    }

    fn prs_path(&self) -> PathBuf {
        self.data_dir.join("prs.json")
    }

    fn templates_path(&self) -> PathBuf {
        self.data_dir.join("templates.json")
    }

    fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }

    /// Append one record to a JSONL log under an exclusive lock
    fn append_jsonl<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;
        Ok(())
    }

    /// Read all records from a JSONL log. Missing file reads as empty;
    /// corrupt lines are skipped with a warning.
    fn read_jsonl<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let reader = BufReader::new(&file);
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<T>(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping corrupt record at line {}: {}", line_num + 1, e);
                }
            }
        }

        file.unlock()?;
        Ok(records)
    }

    /// Atomically replace a JSON document: write to a temp file in the same
    /// directory, sync, then rename over the original.
    fn save_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(value)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        tracing::debug!("Saved {:?}", path);
        Ok(())
    }

    /// Load a JSON document, treating a missing, unreadable or corrupt file
    /// as the default value.
    fn load_json_or_default<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            return Ok(T::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open {:?}: {}. Using defaults.", path, e);
                return Ok(T::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock {:?}: {}. Using defaults.", path, e);
            return Ok(T::default());
        }

        let mut contents = String::new();
        let mut reader = BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read {:?}: {}. Using defaults.", path, e);
            return Ok(T::default());
        }
        file.unlock()?;

        match serde_json::from_str::<T>(&contents) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Failed to parse {:?}: {}. Using defaults.", path, e);
                Ok(T::default())
            }
        }
    }
}

impl Store for FileStore {
    fn profile(&self) -> Result<Profile> {
        let path = self.profile_path();
        if !path.exists() {
            return Ok(Profile::default());
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Unable to read profile: {}. Using defaults.", e);
                return Ok(Profile::default());
            }
        };
        match serde_json::from_str(&contents) {
            Ok(profile) => Ok(profile),
            Err(e) => {
                tracing::warn!("Failed to parse profile: {}. Using defaults.", e);
                Ok(Profile::default())
            }
        }
    }

    fn workout_history(&self) -> Result<Vec<WorkoutRecord>> {
        let mut workouts: Vec<WorkoutRecord> = self.read_jsonl(&self.workouts_path())?;
        // Log is append order; history is served most recent first
        workouts.reverse();
        Ok(workouts)
    }

    fn pr_table(&self) -> Result<PrTable> {
        self.load_json_or_default(&self.prs_path())
    }

    fn templates(&self) -> Result<Vec<Template>> {
        self.load_json_or_default(&self.templates_path())
    }

    fn append_workout(&mut self, workout: &WorkoutRecord) -> Result<()> {
        self.append_jsonl(&self.workouts_path(), workout)?;
        tracing::debug!("Appended workout {} to history", workout.id);
        Ok(())
    }

    fn append_post(&mut self, post: &FeedPost) -> Result<()> {
        self.append_jsonl(&self.posts_path(), post)?;
        tracing::debug!("Appended post {} to feed", post.id);
        Ok(())
    }

    fn save_pr_table(&mut self, table: &PrTable) -> Result<()> {
        self.save_json(&self.prs_path(), table)
    }

    fn upsert_template(&mut self, template: &Template) -> Result<()> {
        let mut templates = self.templates()?;
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template.clone(),
            None => templates.push(template.clone()),
        }
        self.save_json(&self.templates_path(), &templates)
    }

    fn delete_template(&mut self, id: Uuid) -> Result<()> {
        let mut templates = self.templates()?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            tracing::debug!("Template {} not found; nothing to delete", id);
            return Ok(());
        }
        self.save_json(&self.templates_path(), &templates)
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-memory gateway used by unit tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub profile: Profile,
    pub workouts: Vec<WorkoutRecord>,
    pub posts: Vec<FeedPost>,
    pub prs: PrTable,
    pub templates: Vec<Template>,
}

impl Store for MemoryStore {
    fn profile(&self) -> Result<Profile> {
        Ok(self.profile.clone())
    }

    fn workout_history(&self) -> Result<Vec<WorkoutRecord>> {
        let mut workouts = self.workouts.clone();
        workouts.reverse();
        Ok(workouts)
    }

    fn pr_table(&self) -> Result<PrTable> {
        Ok(self.prs.clone())
    }

    fn templates(&self) -> Result<Vec<Template>> {
        Ok(self.templates.clone())
    }

    fn append_workout(&mut self, workout: &WorkoutRecord) -> Result<()> {
        self.workouts.push(workout.clone());
        Ok(())
    }

    fn append_post(&mut self, post: &FeedPost) -> Result<()> {
        self.posts.push(post.clone());
        Ok(())
    }

    fn save_pr_table(&mut self, table: &PrTable) -> Result<()> {
        self.prs = table.clone();
        Ok(())
    }

    fn upsert_template(&mut self, template: &Template) -> Result<()> {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template.clone(),
            None => self.templates.push(template.clone()),
        }
        Ok(())
    }

    fn delete_template(&mut self, id: Uuid) -> Result<()> {
        self.templates.retain(|t| t.id != id);
        Ok(())
    }
}
