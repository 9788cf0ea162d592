//! Game state for one tic-tac-toe match.

use super::action::{Move, MoveError};
use super::rules;
use super::types::{Board, GameStatus, Player};
use super::Position;
use tracing::{debug, info, instrument};

/// Tic-tac-toe game engine.
///
/// Owns the board for the lifetime of a match. The board is mutated exactly
/// once per accepted move and never after a terminal status is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    status: GameStatus,
    history: Vec<Move>,
}

impl Game {
    /// Creates a new game with an empty board. X moves first.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable view of the board for speculative search trials.
    ///
    /// Strategies must restore every square before returning.
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Returns the player to move.
    pub fn to_move(&self) -> Player {
        self.board.to_move()
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true once the game is won or drawn.
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the move history.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the legal moves in row-major order.
    pub fn valid_moves(&self) -> Vec<Position> {
        if self.is_over() {
            Vec::new()
        } else {
            Position::valid_moves(&self.board)
        }
    }

    /// Makes a move for the player to move.
    ///
    /// # Errors
    ///
    /// Returns a recoverable [`MoveError`] if the move is illegal; the game
    /// is unchanged in that case.
    #[instrument(skip(self), fields(player = %self.to_move()))]
    pub fn make_move(&mut self, pos: Position) -> Result<GameStatus, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }

        let player = self.to_move();
        rules::apply(&mut self.board, pos, player)?;
        self.history.push(Move::new(player, pos));
        self.status = rules::evaluate(&self.board);

        debug!(move_number = self.history.len(), status = %self.status, "Move applied");
        if self.is_over() {
            info!(status = %self.status, moves = self.history.len(), "Game finished");
        }

        Ok(self.status)
    }

    /// Replays moves from the initial state.
    ///
    /// # Errors
    ///
    /// Returns the first rejected move's error, or
    /// [`MoveError::WrongPlayer`] if a move names the wrong player.
    #[instrument]
    pub fn replay(moves: &[Move]) -> Result<Self, MoveError> {
        let mut game = Self::new();
        for action in moves {
            if action.player != game.to_move() {
                return Err(MoveError::WrongPlayer(action.player));
            }
            game.make_move(action.position)?;
        }
        Ok(game)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
