//! History records and aggregates.

use crate::ai::Difficulty;
use crate::games::tictactoe::{GameStatus, Player};
use crate::session::{GameMode, GameSession};
use crate::stats::StatsError;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Final result of a recorded game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordedOutcome {
    /// A player completed a line.
    Winner(Player),
    /// Full board, no line.
    Draw,
}

impl TryFrom<GameStatus> for RecordedOutcome {
    type Error = StatsError;

    #[track_caller]
    fn try_from(status: GameStatus) -> Result<Self, Self::Error> {
        match status {
            GameStatus::Won(player) => Ok(Self::Winner(player)),
            GameStatus::Draw => Ok(Self::Draw),
            GameStatus::InProgress => Err(StatsError::new("cannot record a game in progress")),
        }
    }
}

/// One finished game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, new)]
pub struct GameRecord {
    /// Seats at the board.
    mode: GameMode,
    /// How the game ended.
    outcome: RecordedOutcome,
    /// Computer tier, if a computer played.
    difficulty: Option<Difficulty>,
    /// Mark played by the computer in player-vs-computer games.
    computer_mark: Option<Player>,
    /// Number of moves played.
    moves: u32,
    /// When the game finished.
    #[new(value = "Utc::now()")]
    played_at: DateTime<Utc>,
}

impl GameRecord {
    /// Builds a record from a finished session.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the session is still in progress.
    #[instrument(skip(session), fields(status = %session.status()))]
    pub fn from_session(session: &GameSession) -> Result<Self, StatsError> {
        let outcome = RecordedOutcome::try_from(session.status())?;
        Ok(Self::new(
            session.mode(),
            outcome,
            session.difficulty(),
            session.computer_mark(),
            session.history().len() as u32,
        ))
    }

    /// Returns true if the computer seat won.
    pub fn computer_won(&self) -> bool {
        matches!(
            (self.computer_mark, self.outcome),
            (Some(mark), RecordedOutcome::Winner(winner)) if mark == winner
        )
    }

    /// Returns true if the computer seat lost.
    pub fn computer_lost(&self) -> bool {
        matches!(
            (self.computer_mark, self.outcome),
            (Some(mark), RecordedOutcome::Winner(winner)) if mark != winner
        )
    }
}

/// Aggregated counts over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct StatsSummary {
    /// Games counted.
    games: u32,
    /// Games won by X.
    x_wins: u32,
    /// Games won by O.
    o_wins: u32,
    /// Drawn games.
    draws: u32,
    /// Player-vs-computer games the computer won.
    computer_wins: u32,
    /// Player-vs-computer games the computer lost.
    computer_losses: u32,
}

impl StatsSummary {
    /// Folds records into counts.
    #[instrument(skip(records))]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a GameRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut acc, record| {
            acc.games += 1;
            match record.outcome {
                RecordedOutcome::Winner(Player::X) => acc.x_wins += 1,
                RecordedOutcome::Winner(Player::O) => acc.o_wins += 1,
                RecordedOutcome::Draw => acc.draws += 1,
            }
            if record.computer_won() {
                acc.computer_wins += 1;
            }
            if record.computer_lost() {
                acc.computer_losses += 1;
            }
            acc
        })
    }

    /// One summary per difficulty that appears in `records`, easiest first.
    pub fn by_difficulty<'a>(
        records: impl IntoIterator<Item = &'a GameRecord> + Clone,
    ) -> Vec<(Difficulty, Self)> {
        Difficulty::iter()
            .map(|difficulty| {
                let summary = Self::from_records(
                    records
                        .clone()
                        .into_iter()
                        .filter(|r| r.difficulty == Some(difficulty)),
                );
                (difficulty, summary)
            })
            .filter(|(_, summary)| summary.games > 0)
            .collect()
    }

    /// Draws as a percentage of all games (0.0–100.0).
    pub fn draw_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            (self.draws as f64 / self.games as f64) * 100.0
        }
    }
}
