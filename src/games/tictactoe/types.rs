//! Core domain types for tic-tac-toe.

use super::action::MoveError;
use super::position::Position;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

/// 3x3 tic-tac-toe board.
///
/// Squares are only written by the rule engine and by scoped search trials,
/// so a board handed out by this crate always satisfies the mark balance:
/// X has the same number of marks as O, or exactly one more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Overwrites a square. Callers outside the crate go through
    /// [`rules::apply`](super::rules::apply).
    pub(crate) fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Counts the marks placed by `player`.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(player))
            .count()
    }

    /// Returns the player whose turn it is, derived from the mark counts.
    pub fn to_move(&self) -> Player {
        if self.count(Player::X) > self.count(Player::O) {
            Player::O
        } else {
            Player::X
        }
    }

    /// Verifies the mark balance invariant.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvariantViolation`] if O is ahead of X or X is
    /// more than one mark ahead.
    #[instrument]
    pub fn mark_balance(&self) -> Result<(), MoveError> {
        let x = self.count(Player::X);
        let o = self.count(Player::O);
        if x == o || x == o + 1 {
            Ok(())
        } else {
            Err(MoveError::InvariantViolation(format!(
                "mark imbalance: {} X against {} O",
                x, o
            )))
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let idx = row * 3 + col;
                match self.squares[idx] {
                    Square::Empty => write!(f, "{}", idx + 1)?,
                    Square::Occupied(player) => write!(f, "{}", player)?,
                }
                if col < 2 {
                    f.write_str("|")?;
                }
            }
            if row < 2 {
                f.write_str("\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// Parses a board from nine cells in row-major order.
///
/// `X` and `O` (either case) are marks, `.`, `-` and `_` are empty squares.
/// Whitespace and `|` separators are ignored, so both `"XO.|.X.|..O"` and a
/// multi-line layout work. The parsed board must satisfy the mark balance.
impl FromStr for Board {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Board::new();
        let mut cells = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|');

        for pos in Position::ALL {
            let square = match cells.next() {
                Some('X' | 'x') => Square::Occupied(Player::X),
                Some('O' | 'o') => Square::Occupied(Player::O),
                Some('.' | '-' | '_') => Square::Empty,
                Some(other) => {
                    return Err(MoveError::InvariantViolation(format!(
                        "unexpected board character '{}'",
                        other
                    )));
                }
                None => {
                    return Err(MoveError::InvariantViolation(
                        "board needs exactly 9 cells".to_string(),
                    ));
                }
            };
            board.set(pos, square);
        }

        if cells.next().is_some() {
            return Err(MoveError::InvariantViolation(
                "board needs exactly 9 cells".to_string(),
            ));
        }

        board.mark_balance()?;
        Ok(board)
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Returns true once the game has reached a win or a draw.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won(player) => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "In progress"),
            GameStatus::Won(player) => write!(f, "Player {} wins", player),
            GameStatus::Draw => write!(f, "Draw"),
        }
    }
}
