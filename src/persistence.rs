//! Best-score persistence
//!
//! A single integer in a plain text file under the platform data directory.
//! Load failures of any kind fall back to zero and save failures are logged;
//! a broken disk never takes the game down.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const SCORE_FILE: &str = "best_score";

/// On-disk home of the best score
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    /// Store in the platform data directory, or the working directory when
    /// the platform offers none
    pub fn open() -> Self {
        let dir = ProjectDirs::from("", "", "pipe-dash")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("save"));
        Self {
            path: dir.join(SCORE_FILE),
        }
    }

    /// Store backed by an explicit file path
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Saved best score; zero when missing or unreadable
    pub fn load(&self) -> u32 {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return 0,
        };
        match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("ignoring corrupt score file {}", self.path.display());
                0
            }
        }
    }

    /// Write `value`, creating parent directories as needed
    pub fn save(&self, value: u32) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                log::error!("cannot create {}: {err}", parent.display());
                return;
            }
        }
        if let Err(err) = fs::write(&self.path, value.to_string()) {
            log::error!("cannot save best score: {err}");
        } else {
            log::info!("best score saved: {value}");
        }
    }
}
