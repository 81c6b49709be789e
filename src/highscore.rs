//! High score persistence (a single JSON record on disk).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::HighScore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreRecord {
    score: u32,
    name: String,
}

impl From<&HighScore> for HighScoreRecord {
    fn from(value: &HighScore) -> Self {
        Self {
            score: value.score,
            name: value.name.clone(),
        }
    }
}

impl From<HighScoreRecord> for HighScore {
    fn from(value: HighScoreRecord) -> Self {
        HighScore::new(value.score, &value.name)
    }
}

/// Reads and writes the best score at a fixed path
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no record has been saved yet
    pub fn load(&self) -> Result<Option<HighScore>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read high score file {}", self.path.display()))
            }
        };
        let record: HighScoreRecord = serde_json::from_str(&text)
            .with_context(|| format!("parse high score file {}", self.path.display()))?;
        Ok(Some(record.into()))
    }

    pub fn save(&self, high_score: &HighScore) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("create high score directory {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&HighScoreRecord::from(high_score))
            .context("serialize high score")?;
        fs::write(&self.path, json)
            .with_context(|| format!("write high score file {}", self.path.display()))?;
        tracing::info!(score = high_score.score, name = %high_score.name, "high score saved");
        Ok(())
    }

    /// Save only when `candidate` beats what is on disk
    pub fn save_if_better(&self, candidate: &HighScore) -> Result<bool> {
        let current = self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable high score file");
            None
        });
        if current.is_some_and(|c| c.score >= candidate.score) {
            return Ok(false);
        }
        self.save(candidate)?;
        Ok(true)
    }
}
