//! Uniform random strategy.

use super::{Strategy, playable_moves};
use crate::games::tictactoe::{Board, MoveError, Player, Position};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Picks any legal move with equal probability.
///
/// Also serves as the fallback when a human's move timer runs out.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    /// Creates a strategy seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a strategy with a fixed seed, for reproducible games.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Picks uniformly from `moves`.
    pub(crate) fn pick(&mut self, moves: &[Position]) -> Option<Position> {
        moves.choose(&mut self.rng).copied()
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    #[instrument(skip(self, board), fields(strategy = self.name()))]
    fn select_move(
        &mut self,
        board: &mut Board,
        ai: Player,
        opponent: Player,
    ) -> Result<Position, MoveError> {
        let moves = playable_moves(board, ai, opponent)?;
        let choice = self.pick(&moves).ok_or_else(|| {
            MoveError::InvariantViolation("no legal moves to choose from".to_string())
        })?;
        debug!(position = %choice, candidates = moves.len(), "Random move chosen");
        Ok(choice)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
