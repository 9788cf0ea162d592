//! Append-only history file.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::ai::Difficulty;
use crate::session::GameMode;
use crate::stats::{GameRecord, StatsError, StatsSummary};

/// History of finished games stored as JSON lines.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    path: PathBuf,
}

impl StatsRepository {
    /// Creates a repository backed by the file at `path`.
    ///
    /// The file is created on the first [`record`](Self::record).
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        info!("Creating StatsRepository");
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one finished game.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the file cannot be opened or written.
    #[instrument(skip(self, record), fields(mode = %record.mode(), outcome = ?record.outcome()))]
    pub fn record(&self, record: &GameRecord) -> Result<(), StatsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        info!("Game result recorded");
        Ok(())
    }

    /// Loads every record, oldest first. A missing file is an empty history.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] on I/O failure or a malformed line.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Vec<GameRecord>, StatsError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No history file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                StatsError::new(format!("Malformed record on line {}: {}", idx + 1, e))
            })?;
            records.push(record);
        }

        info!(count = records.len(), "History loaded");
        Ok(records)
    }

    fn load_mode(&self, mode: Option<GameMode>) -> Result<Vec<GameRecord>, StatsError> {
        let mut records = self.load()?;
        records.retain(|r| mode.is_none_or(|m| *r.mode() == m));
        Ok(records)
    }

    /// Summarizes the history, optionally restricted to one mode.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the history cannot be loaded.
    #[instrument(skip(self))]
    pub fn summarize(&self, mode: Option<GameMode>) -> Result<StatsSummary, StatsError> {
        let summary = StatsSummary::from_records(&self.load_mode(mode)?);
        info!(
            games = summary.games(),
            draws = summary.draws(),
            draw_rate = %format!("{:.1}%", summary.draw_rate()),
            "Summary computed"
        );
        Ok(summary)
    }

    /// Per-difficulty summaries of games against a computer.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the history cannot be loaded.
    #[instrument(skip(self))]
    pub fn summarize_by_difficulty(
        &self,
        mode: Option<GameMode>,
    ) -> Result<Vec<(Difficulty, StatsSummary)>, StatsError> {
        Ok(StatsSummary::by_difficulty(&self.load_mode(mode)?))
    }
}
