//! One-ply heuristic strategy.

use super::random::RandomStrategy;
use super::trial::Trial;
use super::{Strategy, playable_moves};
use crate::games::tictactoe::{Board, MoveError, Player, Position, rules};
use tracing::{debug, instrument};

/// Takes an immediate win, otherwise blocks an immediate loss, otherwise
/// plays at random.
///
/// Looks exactly one ply ahead for each side. Forks and other two-move
/// threats go unnoticed.
#[derive(Debug, Clone, Default)]
pub struct HeuristicStrategy {
    fallback: RandomStrategy,
}

impl HeuristicStrategy {
    /// Creates a strategy whose random fallback is seeded from the OS.
    pub fn new() -> Self {
        Self {
            fallback: RandomStrategy::new(),
        }
    }

    /// Creates a strategy with a seeded random fallback.
    pub fn seeded(seed: u64) -> Self {
        Self {
            fallback: RandomStrategy::seeded(seed),
        }
    }
}

/// First move in `moves` that completes a line for `player`.
fn completing_move(board: &mut Board, moves: &[Position], player: Player) -> Option<Position> {
    moves.iter().copied().find(|pos| {
        let trial = Trial::place(board, *pos, player);
        rules::has_won(&trial, player)
    })
}

impl Strategy for HeuristicStrategy {
    #[instrument(skip(self, board), fields(strategy = self.name()))]
    fn select_move(
        &mut self,
        board: &mut Board,
        ai: Player,
        opponent: Player,
    ) -> Result<Position, MoveError> {
        let moves = playable_moves(board, ai, opponent)?;

        if let Some(pos) = completing_move(board, &moves, ai) {
            debug!(position = %pos, "Taking winning move");
            return Ok(pos);
        }

        if let Some(pos) = completing_move(board, &moves, opponent) {
            debug!(position = %pos, "Blocking opponent");
            return Ok(pos);
        }

        let pos = self.fallback.pick(&moves).ok_or_else(|| {
            MoveError::InvariantViolation("no legal moves to choose from".to_string())
        })?;
        debug!(position = %pos, "No tactic found, playing at random");
        Ok(pos)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
