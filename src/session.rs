//! Game session: turn order between human and computer seats.

use crate::ai::{Difficulty, Strategy};
use crate::games::tictactoe::{Board, Game, GameStatus, Move, MoveError, Player, Position};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Who sits at the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum GameMode {
    /// Two humans sharing the keyboard.
    #[strum(to_string = "pvp", serialize = "player-vs-player")]
    PlayerVsPlayer,
    /// Human against a computer strategy.
    #[strum(to_string = "pvc", serialize = "player-vs-computer")]
    PlayerVsComputer,
    /// Two computer strategies.
    #[strum(to_string = "cvc", serialize = "computer-vs-computer")]
    ComputerVsComputer,
}

/// One side of the board.
#[derive(Debug)]
pub enum Seat {
    /// Moves come from a [`MoveSource`].
    Human {
        /// Display name.
        name: String,
    },
    /// Moves come from a strategy picked at session start.
    Computer {
        /// Tier the strategy was built from.
        difficulty: Difficulty,
        /// The move-selection policy.
        strategy: Box<dyn Strategy>,
    },
}

impl Seat {
    /// Creates a human seat.
    pub fn human(name: impl Into<String>) -> Self {
        Seat::Human { name: name.into() }
    }

    /// Creates a computer seat with an OS-seeded strategy.
    pub fn computer(difficulty: Difficulty) -> Self {
        Seat::Computer {
            difficulty,
            strategy: difficulty.strategy(),
        }
    }

    /// Creates a computer seat around an existing strategy.
    pub fn computer_with(difficulty: Difficulty, strategy: Box<dyn Strategy>) -> Self {
        Seat::Computer {
            difficulty,
            strategy,
        }
    }

    /// Display name of the seat.
    pub fn name(&self) -> String {
        match self {
            Seat::Human { name } => name.clone(),
            Seat::Computer { difficulty, .. } => format!("Computer ({})", difficulty),
        }
    }

    /// Returns true for a human seat.
    pub fn is_human(&self) -> bool {
        matches!(self, Seat::Human { .. })
    }

    /// Difficulty of a computer seat.
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            Seat::Human { .. } => None,
            Seat::Computer { difficulty, .. } => Some(*difficulty),
        }
    }
}

/// Supplies moves for human seats.
///
/// The session re-validates every position it receives; sources only need to
/// produce in-range squares.
pub trait MoveSource {
    /// Next move for `mark` on `board`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::NoMoveAvailable`] when input is exhausted.
    fn next_move(&mut self, board: &Board, mark: Player) -> Result<Position, MoveError>;

    /// Called when the session refused the last position; the session will
    /// ask again.
    fn rejected(&mut self, _position: Position, _error: &MoveError) {}
}

/// Move source for sessions without human seats.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHumans;

impl MoveSource for NoHumans {
    fn next_move(&mut self, _board: &Board, mark: Player) -> Result<Position, MoveError> {
        Err(MoveError::NoMoveAvailable(format!("human seat {}", mark)))
    }
}

/// Receives read-only snapshots for rendering or logging.
pub trait Observer {
    /// Called after every accepted move.
    fn move_applied(&mut self, _board: &Board, _action: &Move) {}

    /// Called once when the game reaches a win or a draw.
    fn game_over(&mut self, _board: &Board, _status: GameStatus) {}
}

impl Observer for () {}

/// A game between two seats.
#[derive(Debug)]
pub struct GameSession {
    game: Game,
    seat_x: Seat,
    seat_o: Seat,
}

impl GameSession {
    /// Creates a session with an empty board. `seat_x` moves first.
    #[instrument(skip_all, fields(x = %seat_x.name(), o = %seat_o.name()))]
    pub fn new(seat_x: Seat, seat_o: Seat) -> Self {
        info!("Creating game session");
        Self {
            game: Game::new(),
            seat_x,
            seat_o,
        }
    }

    /// Returns the game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.game.status()
    }

    /// Returns the player to move.
    pub fn to_move(&self) -> Player {
        self.game.to_move()
    }

    /// Returns the move history.
    pub fn history(&self) -> &[Move] {
        self.game.history()
    }

    /// Returns the seat playing `mark`.
    pub fn seat(&self, mark: Player) -> &Seat {
        match mark {
            Player::X => &self.seat_x,
            Player::O => &self.seat_o,
        }
    }

    /// Mode derived from the two seats.
    pub fn mode(&self) -> GameMode {
        match (self.seat_x.is_human(), self.seat_o.is_human()) {
            (true, true) => GameMode::PlayerVsPlayer,
            (false, false) => GameMode::ComputerVsComputer,
            _ => GameMode::PlayerVsComputer,
        }
    }

    /// Mark played by the computer when exactly one seat is a computer.
    pub fn computer_mark(&self) -> Option<Player> {
        match (self.seat_x.is_human(), self.seat_o.is_human()) {
            (true, false) => Some(Player::O),
            (false, true) => Some(Player::X),
            _ => None,
        }
    }

    /// Difficulty of the computer seat, X's first.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.seat_x.difficulty().or(self.seat_o.difficulty())
    }

    /// Returns true while the game is running and a computer is to move.
    pub fn is_computer_turn(&self) -> bool {
        !self.game.is_over() && !self.seat(self.to_move()).is_human()
    }

    /// Applies a human move for the player to move.
    ///
    /// # Errors
    ///
    /// Returns a recoverable [`MoveError`] for an illegal square, and
    /// [`MoveError::WrongPlayer`] if a computer seat is to move.
    #[instrument(skip(self), fields(player = %self.to_move()))]
    pub fn submit(&mut self, pos: Position) -> Result<GameStatus, MoveError> {
        if self.game.is_over() {
            return Err(MoveError::GameOver);
        }
        if self.is_computer_turn() {
            warn!("Human move submitted on computer's turn");
            return Err(MoveError::WrongPlayer(self.to_move()));
        }
        self.game.make_move(pos)
    }

    /// Asks the computer seat to move and applies its choice.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvariantViolation`] if a human is to move, if the
    /// strategy leaves the board changed, or if the strategy was asked
    /// on a finished game.
    #[instrument(skip(self), fields(player = %self.to_move()))]
    pub fn play_computer_turn(&mut self) -> Result<Move, MoveError> {
        if self.game.is_over() {
            return Err(MoveError::GameOver);
        }

        let mark = self.game.to_move();
        let seat = match mark {
            Player::X => &mut self.seat_x,
            Player::O => &mut self.seat_o,
        };
        let Seat::Computer { strategy, .. } = seat else {
            return Err(MoveError::InvariantViolation(format!(
                "{} is a human seat",
                mark
            )));
        };

        let snapshot = *self.game.board();
        let selected = strategy.select_move(self.game.board_mut(), mark, mark.opponent());
        if *self.game.board() != snapshot {
            warn!(strategy = strategy.name(), "Strategy modified the board, restoring");
            *self.game.board_mut() = snapshot;
            return Err(MoveError::InvariantViolation(format!(
                "{} strategy left the board modified",
                strategy.name()
            )));
        }
        let pos = selected?;

        debug!(position = %pos, strategy = strategy.name(), "Computer chose move");
        self.game.make_move(pos)?;
        Ok(Move::new(mark, pos))
    }

    /// Plays until a win or a draw.
    ///
    /// Human seats are served by `humans`; rejected positions are reported
    /// back to it and it is asked again.
    ///
    /// # Errors
    ///
    /// Propagates non-recoverable errors from `humans` or the strategies.
    #[instrument(skip_all)]
    pub fn run(
        &mut self,
        humans: &mut dyn MoveSource,
        observer: &mut dyn Observer,
    ) -> Result<GameStatus, MoveError> {
        while !self.game.is_over() {
            let action = if self.is_computer_turn() {
                self.play_computer_turn()?
            } else {
                self.human_turn(humans)?
            };
            observer.move_applied(self.board(), &action);
        }

        let status = self.status();
        info!(%status, moves = self.history().len(), "Session finished");
        observer.game_over(self.board(), status);
        Ok(status)
    }

    fn human_turn(&mut self, humans: &mut dyn MoveSource) -> Result<Move, MoveError> {
        let mark = self.to_move();
        loop {
            let pos = humans.next_move(self.board(), mark)?;
            match self.submit(pos) {
                Ok(_) => return Ok(Move::new(mark, pos)),
                Err(e) if e.is_recoverable() => {
                    debug!(position = %pos, error = %e, "Human move rejected");
                    humans.rejected(pos, &e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Starts over on an empty board with the same seats.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        info!("Restarting game session");
        self.game = Game::new();
    }
}
