//! Exhaustive adversarial search.

use super::trial::Trial;
use super::{Strategy, playable_moves};
use crate::games::tictactoe::{Board, MoveError, Player, Position, rules};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Score of a win found on the candidate move itself.
const WIN_SCORE: i32 = 10;

/// Perfect play through full minimax search.
///
/// Every legal move is scored by exploring all continuations. A win scores
/// `10 - depth` and a loss `depth - 10`, where depth counts plies after the
/// candidate, so quick wins and slow losses are preferred. Ties go to the
/// first candidate in row-major order.
///
/// Positions already scored during one call are cached. Within a call the
/// depth of a position is fixed by its piece count, so cached values are
/// exact. Nothing is kept between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimaxStrategy;

impl MinimaxStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }

    /// Scores every legal move for `ai`, in row-major order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Strategy::select_move`].
    #[instrument(skip(self, board))]
    pub fn score_moves(
        &self,
        board: &mut Board,
        ai: Player,
        opponent: Player,
    ) -> Result<Vec<(Position, i32)>, MoveError> {
        let moves = playable_moves(board, ai, opponent)?;
        let mut search = Search {
            ai,
            opponent,
            table: HashMap::new(),
        };

        let scored = moves
            .into_iter()
            .map(|pos| {
                let mut trial = Trial::place(board, pos, ai);
                (pos, search.score(&mut trial, 0, opponent))
            })
            .collect();

        debug!(positions = search.table.len(), "Search complete");
        Ok(scored)
    }
}

struct Search {
    ai: Player,
    opponent: Player,
    table: HashMap<Board, i32>,
}

impl Search {
    /// Value of `board` for `ai`, with `to_move` about to play.
    fn score(&mut self, board: &mut Board, depth: i32, to_move: Player) -> i32 {
        if rules::has_won(board, self.ai) {
            return WIN_SCORE - depth;
        }
        if rules::has_won(board, self.opponent) {
            return depth - WIN_SCORE;
        }
        if rules::is_full(board) {
            return 0;
        }
        if let Some(score) = self.table.get(&*board) {
            return *score;
        }

        let maximizing = to_move == self.ai;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for pos in Position::valid_moves(board) {
            let mut trial = Trial::place(board, pos, to_move);
            let score = self.score(&mut trial, depth + 1, to_move.opponent());
            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }

        self.table.insert(*board, best);
        best
    }
}

impl Strategy for MinimaxStrategy {
    #[instrument(skip(self, board), fields(strategy = self.name()))]
    fn select_move(
        &mut self,
        board: &mut Board,
        ai: Player,
        opponent: Player,
    ) -> Result<Position, MoveError> {
        let scored = self.score_moves(board, ai, opponent)?;

        let mut best: Option<(Position, i32)> = None;
        for (pos, score) in scored {
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((pos, score));
            }
        }

        let (pos, score) = best.ok_or_else(|| {
            MoveError::InvariantViolation("no legal moves to score".to_string())
        })?;
        debug!(position = %pos, score, "Best move found");
        Ok(pos)
    }

    fn name(&self) -> &'static str {
        "minimax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best(board: &str, ai: Player) -> Position {
        let mut board: Board = board.parse().unwrap();
        let before = board;
        let pos = MinimaxStrategy::new()
            .select_move(&mut board, ai, ai.opponent())
            .unwrap();
        assert_eq!(board, before, "search left the board mutated");
        pos
    }

    #[test]
    fn test_takes_immediate_win() {
        assert_eq!(best("XX.|OO.|...", Player::X), Position::TopRight);
    }

    #[test]
    fn test_blocks_open_two() {
        assert_eq!(best("XX.|.O.|...", Player::O), Position::TopRight);
    }

    #[test]
    fn test_prefers_faster_win() {
        // Winning now scores 10; every other move scores less.
        let mut board: Board = "XX.|OO.|...".parse().unwrap();
        let scored = MinimaxStrategy::new()
            .score_moves(&mut board, Player::X, Player::O)
            .unwrap();
        let (pos, score) = scored[0];
        assert_eq!(pos, Position::TopRight);
        assert_eq!(score, 10);
        assert!(scored[1..].iter().all(|(_, s)| *s < 10));
    }

    #[test]
    fn test_answers_corner_opening_with_center() {
        assert_eq!(best("X..|...|...", Player::O), Position::Center);
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        let mut board = Board::new();
        let scored = MinimaxStrategy::new()
            .score_moves(&mut board, Player::X, Player::O)
            .unwrap();
        assert_eq!(scored.len(), 9);
        assert!(scored.iter().all(|(_, score)| *score <= 0));
        assert!(scored.iter().any(|(_, score)| *score == 0));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_first_best_move_wins_ties() {
        // Every opening scores 0, so the first square comes back.
        assert_eq!(best("...|...|...", Player::X), Position::TopLeft);
    }
}
