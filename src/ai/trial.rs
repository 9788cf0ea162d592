//! Scoped speculative placements.

use crate::games::tictactoe::{Board, Player, Position, Square};
use std::ops::{Deref, DerefMut};

/// A mark placed for evaluation only.
///
/// The square is cleared again when the guard drops, on every exit path of
/// the code holding it. While the guard lives, the board is reachable only
/// through it.
pub(crate) struct Trial<'a> {
    board: &'a mut Board,
    pos: Position,
}

impl<'a> Trial<'a> {
    /// Places `player` at the empty square `pos`.
    pub(crate) fn place(board: &'a mut Board, pos: Position, player: Player) -> Self {
        debug_assert!(board.is_empty(pos), "trial on occupied square {:?}", pos);
        board.set(pos, Square::Occupied(player));
        Self { board, pos }
    }
}

impl Deref for Trial<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Trial<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        self.board.set(self.pos, Square::Empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::rules::has_won;

    #[test]
    fn test_trial_restores_board() {
        let mut board: Board = "XX.|OO.|...".parse().unwrap();
        let before = board;
        {
            let trial = Trial::place(&mut board, Position::TopRight, Player::X);
            assert!(has_won(&trial, Player::X));
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_nested_trials_restore_in_order() {
        let mut board = Board::new();
        {
            let mut outer = Trial::place(&mut board, Position::Center, Player::X);
            {
                let inner = Trial::place(&mut outer, Position::TopLeft, Player::O);
                assert_eq!(inner.count(Player::O), 1);
            }
            assert!(outer.is_empty(Position::TopLeft));
            assert!(!outer.is_empty(Position::Center));
        }
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_trial_restores_on_early_return() {
        fn place_and_return(board: &mut Board) -> Option<Position> {
            let trial = Trial::place(board, Position::BottomRight, Player::X);
            if trial.count(Player::X) > 0 {
                return Some(Position::BottomRight);
            }
            None
        }

        let mut board = Board::new();
        assert_eq!(place_and_return(&mut board), Some(Position::BottomRight));
        assert_eq!(board, Board::new());
    }
}
