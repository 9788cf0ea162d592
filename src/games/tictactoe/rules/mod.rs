//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating game state
//! according to tic-tac-toe rules. Rules are separated from board
//! storage so sessions and search strategies share one definition.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner, has_won};

use super::{Board, GameStatus, MoveError, Player, Position, Square};
use tracing::{debug, instrument};

/// Evaluates the board. A win takes precedence over a full board.
pub fn evaluate(board: &Board) -> GameStatus {
    if let Some(winner) = check_winner(board) {
        GameStatus::Won(winner)
    } else if is_full(board) {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}

/// Returns true iff the square is empty and the game is not over.
pub fn is_legal(board: &Board, pos: Position) -> bool {
    board.is_empty(pos) && !evaluate(board).is_terminal()
}

/// Converts raw coordinates into a legal position.
///
/// # Errors
///
/// Returns [`MoveError::OutOfBounds`] for coordinates outside `0..3`,
/// [`MoveError::GameOver`] on a terminal board and
/// [`MoveError::SquareOccupied`] if the square is taken.
#[instrument(skip(board))]
pub fn check_coordinates(board: &Board, row: usize, col: usize) -> Result<Position, MoveError> {
    let pos = Position::from_row_col(row, col).ok_or(MoveError::OutOfBounds { row, col })?;
    check_move(board, pos)?;
    Ok(pos)
}

fn check_move(board: &Board, pos: Position) -> Result<(), MoveError> {
    if evaluate(board).is_terminal() {
        return Err(MoveError::GameOver);
    }
    if !board.is_empty(pos) {
        return Err(MoveError::SquareOccupied(pos));
    }
    Ok(())
}

/// Places `player`'s mark at `pos` if the move is legal.
///
/// On any error the board is left exactly as it was.
///
/// # Errors
///
/// Returns [`MoveError::GameOver`] on a terminal board,
/// [`MoveError::SquareOccupied`] for a taken square and
/// [`MoveError::WrongPlayer`] if `player` is not the one to move.
#[instrument(skip(board))]
pub fn apply(board: &mut Board, pos: Position, player: Player) -> Result<(), MoveError> {
    check_move(board, pos)?;
    if board.to_move() != player {
        debug!(expected = %board.to_move(), "Move out of turn rejected");
        return Err(MoveError::WrongPlayer(player));
    }
    board.set(pos, Square::Occupied(player));
    Ok(())
}
