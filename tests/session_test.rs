//! Tests for game sessions with scripted human input.

use std::collections::VecDeque;
use strictly_tictactoe::{
    Board, Difficulty, GameMode, GameSession, GameStatus, Move, MoveError, MoveSource, Observer,
    Player, Position, Seat, Square, Strategy,
};

/// Plays a fixed list of positions and remembers rejections.
#[derive(Default)]
struct Script {
    moves: VecDeque<Position>,
    rejected: Vec<(Position, MoveError)>,
}

impl Script {
    fn new(moves: &[Position]) -> Self {
        Self {
            moves: moves.iter().copied().collect(),
            rejected: Vec::new(),
        }
    }
}

impl MoveSource for Script {
    fn next_move(&mut self, _board: &Board, mark: Player) -> Result<Position, MoveError> {
        self.moves
            .pop_front()
            .ok_or_else(|| MoveError::NoMoveAvailable(format!("script for {}", mark)))
    }

    fn rejected(&mut self, position: Position, error: &MoveError) {
        self.rejected.push((position, error.clone()));
    }
}

/// Records everything it is shown.
#[derive(Default)]
struct Recorder {
    moves: Vec<Move>,
    boards: Vec<Board>,
    finished: Option<GameStatus>,
}

impl Observer for Recorder {
    fn move_applied(&mut self, board: &Board, action: &Move) {
        self.moves.push(*action);
        self.boards.push(*board);
    }

    fn game_over(&mut self, _board: &Board, status: GameStatus) {
        assert!(self.finished.is_none(), "game_over reported twice");
        self.finished = Some(status);
    }
}

/// Writes a mark and leaves it behind.
struct Vandal;

impl Strategy for Vandal {
    fn select_move(
        &mut self,
        board: &mut Board,
        ai: Player,
        _opponent: Player,
    ) -> Result<Position, MoveError> {
        let pos = Position::valid_moves(board)[0];
        strictly_tictactoe::rules::apply(board, pos, ai)?;
        Ok(Position::valid_moves(board)[0])
    }

    fn name(&self) -> &'static str {
        "vandal"
    }
}

/// Writes a mark, then gives up.
struct Quitter;

impl Strategy for Quitter {
    fn select_move(
        &mut self,
        board: &mut Board,
        ai: Player,
        _opponent: Player,
    ) -> Result<Position, MoveError> {
        strictly_tictactoe::rules::apply(board, Position::Center, ai)?;
        Err(MoveError::NoMoveAvailable("quitter".to_string()))
    }

    fn name(&self) -> &'static str {
        "quitter"
    }
}

use Position::*;

#[test]
fn test_two_humans_play_to_a_win() {
    let mut session = GameSession::new(Seat::human("Ann"), Seat::human("Bob"));
    let mut script = Script::new(&[TopLeft, MiddleLeft, TopCenter, Center, TopRight]);
    let mut recorder = Recorder::default();

    let status = session.run(&mut script, &mut recorder).unwrap();

    assert_eq!(status, GameStatus::Won(Player::X));
    assert_eq!(session.mode(), GameMode::PlayerVsPlayer);
    assert_eq!(recorder.moves.len(), 5);
    assert_eq!(recorder.finished, Some(GameStatus::Won(Player::X)));
    assert_eq!(recorder.boards.last(), Some(session.board()));
    assert!(script.rejected.is_empty());
}

#[test]
fn test_rejected_moves_are_asked_again() {
    let mut session = GameSession::new(Seat::human("Ann"), Seat::human("Bob"));
    let mut script = Script::new(&[
        Center,
        Center, // taken
        TopLeft,
        BottomLeft,
        TopRight,
        TopCenter,
        BottomCenter,
        MiddleLeft,
        MiddleRight,
        BottomRight,
    ]);

    let status = session.run(&mut script, &mut ()).unwrap();

    assert_eq!(
        script.rejected,
        vec![(Center, MoveError::SquareOccupied(Center))]
    );
    assert_eq!(session.history().len(), 9);
    assert_eq!(status, GameStatus::Draw);
}

#[test]
fn test_exhausted_input_is_an_error() {
    let mut session = GameSession::new(Seat::human("Ann"), Seat::human("Bob"));
    let mut script = Script::new(&[Center]);
    let result = session.run(&mut script, &mut ());
    assert!(matches!(result, Err(MoveError::NoMoveAvailable(_))));
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_human_against_minimax_blocks() {
    let mut session = GameSession::new(Seat::human("Ann"), Seat::computer(Difficulty::Hard));
    assert_eq!(session.mode(), GameMode::PlayerVsComputer);
    assert_eq!(session.computer_mark(), Some(Player::O));
    assert_eq!(session.difficulty(), Some(Difficulty::Hard));

    // X opens in a corner; the perfect reply is the center.
    session.submit(TopLeft).unwrap();
    assert!(session.is_computer_turn());
    let reply = session.play_computer_turn().unwrap();
    assert_eq!(reply, Move::new(Player::O, Center));

    // X threatens the top row; O must block.
    session.submit(TopCenter).unwrap();
    let reply = session.play_computer_turn().unwrap();
    assert_eq!(reply.position(), TopRight);
}

#[test]
fn test_submit_on_computer_turn_is_rejected() {
    let mut session = GameSession::new(Seat::computer(Difficulty::Easy), Seat::human("Ann"));
    assert_eq!(session.computer_mark(), Some(Player::X));
    let result = session.submit(Center);
    assert_eq!(result, Err(MoveError::WrongPlayer(Player::X)));
    assert!(session.history().is_empty());
}

#[test]
fn test_computer_turn_refused_for_human_seat() {
    let mut session = GameSession::new(Seat::human("Ann"), Seat::human("Bob"));
    assert!(matches!(
        session.play_computer_turn(),
        Err(MoveError::InvariantViolation(_))
    ));
}

#[test]
fn test_board_changing_strategy_is_reported() {
    let mut session = GameSession::new(
        Seat::computer_with(Difficulty::Easy, Box::new(Vandal)),
        Seat::human("Ann"),
    );
    let result = session.play_computer_turn();
    assert!(matches!(result, Err(MoveError::InvariantViolation(_))));
    assert_eq!(*session.board(), Board::new());
    assert_eq!(session.to_move(), Player::X);
    assert!(session.history().is_empty());
}

#[test]
fn test_failing_strategy_leaves_board_untouched() {
    let mut session = GameSession::new(
        Seat::human("Ann"),
        Seat::computer_with(Difficulty::Easy, Box::new(Quitter)),
    );
    session.submit(TopLeft).unwrap();
    let before = *session.board();

    let result = session.play_computer_turn();

    assert!(matches!(result, Err(MoveError::InvariantViolation(_))));
    assert_eq!(*session.board(), before);
    assert_eq!(session.to_move(), Player::O);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_restart_keeps_seats() {
    let mut session = GameSession::new(Seat::human("Ann"), Seat::computer(Difficulty::Medium));
    session.submit(Center).unwrap();
    session.play_computer_turn().unwrap();

    session.restart();

    assert!(session.history().is_empty());
    assert_eq!(session.status(), GameStatus::InProgress);
    assert!(session.board().squares().iter().all(|s| *s == Square::Empty));
    assert_eq!(session.seat(Player::X).name(), "Ann");
    assert_eq!(session.seat(Player::O).name(), "Computer (medium)");
}

#[test]
fn test_finished_game_rejects_moves() {
    let mut session = GameSession::new(Seat::human("Ann"), Seat::human("Bob"));
    let mut script = Script::new(&[TopLeft, MiddleLeft, TopCenter, Center, TopRight]);
    session.run(&mut script, &mut ()).unwrap();
    assert_eq!(session.submit(BottomRight), Err(MoveError::GameOver));
    assert!(!session.is_computer_turn());
}
