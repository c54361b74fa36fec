//! Persistent high-score table.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ScoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u32,
    pub level: u32,
}

/// Best runs, highest score first.
#[derive(Debug, Clone, PartialEq)]
pub struct HighScores {
    entries: Vec<HighScore>,
    capacity: usize,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::with_capacity(Config::DEFAULT_HIGH_SCORE_CAPACITY)
    }
}

impl HighScores {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<HighScore> {
        self.entries.first().copied()
    }

    /// Inserts a finished run. Returns its rank, or `None` when it did not
    /// make the table.
    pub fn record(&mut self, score: u32, level: u32) -> Option<usize> {
        let entry = HighScore { score, level };
        // Stable position: after every entry that is at least as good.
        let rank = self
            .entries
            .iter()
            .position(|e| (e.score, e.level) < (score, level))
            .unwrap_or(self.entries.len());
        if rank >= self.capacity {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    /// Changes the table size, dropping entries that no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.entries.truncate(self.capacity);
    }

    pub fn load(path: &Path, capacity: usize) -> Result<Self, ScoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut entries: Vec<HighScore> =
            serde_json::from_str(&content).map_err(|source| ScoreError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        // Files edited by hand may be out of order.
        entries.sort_by(|a, b| (b.score, b.level).cmp(&(a.score, a.level)));
        let mut scores = Self::with_capacity(capacity);
        scores.entries = entries;
        scores.entries.truncate(scores.capacity);
        Ok(scores)
    }

    pub fn load_or_default(path: &Path, capacity: usize) -> Self {
        match Self::load(path, capacity) {
            Ok(scores) => scores,
            Err(ScoreError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                debug!("no high-score file at {}", path.display());
                Self::with_capacity(capacity)
            }
            Err(err) => {
                warn!("{err}; starting with an empty high-score table");
                Self::with_capacity(capacity)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ScoreError> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| ScoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ScoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
