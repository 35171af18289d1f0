// store.rs - GoalStore: file persistence for one GoalTracker.
//
// The tracker is written in its canonical text form (see codec.rs) to a
// single file. Saves go to a sibling `.tmp` file first and are renamed into
// place, so a crash mid-write leaves the previous file intact.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::GoalError;
use crate::tracker::GoalTracker;

/// Persistent store for a tracker's goals and score.
pub struct GoalStore {
    path: PathBuf,
}

impl GoalStore {
    /// Create a store backed by the given file.
    /// Creates the parent directory if it doesn't exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, GoalError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| GoalError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether anything has been saved yet.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the tracker. A missing file yields an empty tracker.
    pub fn load(&self) -> Result<GoalTracker, GoalError> {
        if !self.path.exists() {
            return Ok(GoalTracker::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|source| GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;
        let tracker = GoalTracker::deserialize(&text)?;
        info!(
            path = %self.path.display(),
            goals = tracker.len(),
            score = tracker.score(),
            "loaded goals"
        );
        Ok(tracker)
    }

    /// Save the tracker, replacing any previous contents.
    pub fn save(&self, tracker: &GoalTracker) -> Result<(), GoalError> {
        let tmp = self.tmp_file();
        fs::write(&tmp, tracker.serialize()).map_err(|source| GoalError::IoError {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;
        info!(
            path = %self.path.display(),
            goals = tracker.len(),
            score = tracker.score(),
            "saved goals"
        );
        Ok(())
    }

    fn tmp_file(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
