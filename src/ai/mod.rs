//! Computer move-selection strategies.
//!
//! Three interchangeable tiers share the [`Strategy`] trait:
//!
//! - [`RandomStrategy`]: uniform choice among legal moves
//! - [`HeuristicStrategy`]: win now, else block, else random
//! - [`MinimaxStrategy`]: exhaustive adversarial search, never loses
//!
//! A tier is picked once per session through [`Difficulty`].

mod heuristic;
mod minimax;
mod random;
mod trial;

pub use heuristic::HeuristicStrategy;
pub use minimax::MinimaxStrategy;
pub use random::RandomStrategy;

use crate::games::tictactoe::{Board, MoveError, Player, Position, rules};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A policy that picks the computer's next move.
///
/// `board` is a temporary mutable view: implementations may place trial
/// marks but must leave every square as they found it.
pub trait Strategy {
    /// Selects a move for `ai` against `opponent`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvariantViolation`] when called on a finished
    /// game, a full board, or with `ai == opponent`.
    fn select_move(
        &mut self,
        board: &mut Board,
        ai: Player,
        opponent: Player,
    ) -> Result<Position, MoveError>;

    /// Short name for logs and menus.
    fn name(&self) -> &'static str;
}

impl std::fmt::Debug for dyn Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Strategy({})", self.name())
    }
}

/// Returns the legal moves, or an error if the strategy should never have
/// been asked.
#[instrument(level = "trace", skip(board))]
pub(crate) fn playable_moves(
    board: &Board,
    ai: Player,
    opponent: Player,
) -> Result<Vec<Position>, MoveError> {
    if ai == opponent {
        return Err(MoveError::InvariantViolation(format!(
            "ai and opponent are both {}",
            ai
        )));
    }
    let status = rules::evaluate(board);
    if status.is_terminal() {
        return Err(MoveError::InvariantViolation(format!(
            "move requested on finished game ({})",
            status
        )));
    }
    let moves = Position::valid_moves(board);
    if moves.is_empty() {
        return Err(MoveError::InvariantViolation(
            "move requested with no legal moves".to_string(),
        ));
    }
    Ok(moves)
}

/// Computer strength tier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random legal moves.
    #[strum(to_string = "easy", serialize = "random")]
    Easy,
    /// One-ply lookahead: win, block, otherwise random.
    #[strum(to_string = "medium", serialize = "heuristic")]
    Medium,
    /// Perfect play.
    #[default]
    #[strum(to_string = "hard", serialize = "minimax")]
    Hard,
}

impl Difficulty {
    /// Builds the strategy for this tier, seeded from the OS.
    #[instrument]
    pub fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Difficulty::Easy => Box::new(RandomStrategy::new()),
            Difficulty::Medium => Box::new(HeuristicStrategy::new()),
            Difficulty::Hard => Box::new(MinimaxStrategy::new()),
        }
    }

    /// Builds the strategy for this tier with a fixed seed.
    #[instrument]
    pub fn seeded_strategy(self, seed: u64) -> Box<dyn Strategy> {
        match self {
            Difficulty::Easy => Box::new(RandomStrategy::seeded(seed)),
            Difficulty::Medium => Box::new(HeuristicStrategy::seeded(seed)),
            Difficulty::Hard => Box::new(MinimaxStrategy::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parses_aliases() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("Minimax".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("random".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("MEDIUM".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_difficulty_displays_primary_name() {
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }

    #[test]
    fn test_playable_moves_rejects_finished_board() {
        let board: Board = "XXX|OO.|...".parse().unwrap();
        assert!(matches!(
            playable_moves(&board, Player::O, Player::X),
            Err(MoveError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_playable_moves_rejects_same_player() {
        assert!(playable_moves(&Board::new(), Player::X, Player::X).is_err());
    }
}
