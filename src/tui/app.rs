//! Application state and logic.

use crossterm::event::KeyCode;
use std::time::{Duration, Instant};
use strictly_tictactoe::{
    GameConfig, GameRecord, GameSession, GameStatus, Position, RandomStrategy, StatsRepository,
    Strategy,
};
use tracing::{debug, error, info, instrument, warn};

use super::input::{digit_position, move_cursor};

/// Main application state.
pub struct App {
    session: GameSession,
    cursor: Position,
    status_message: String,
    move_timeout: Option<Duration>,
    ai_delay: Duration,
    turn_started: Instant,
    fallback: RandomStrategy,
    stats: Option<StatsRepository>,
    recorded: bool,
    should_quit: bool,
}

impl App {
    /// Creates a new application around `session`.
    pub fn new(session: GameSession, game: &GameConfig, stats: Option<StatsRepository>) -> Self {
        let mut app = Self {
            session,
            cursor: Position::Center,
            status_message: String::new(),
            move_timeout: game.move_timeout(),
            ai_delay: game.ai_delay(),
            turn_started: Instant::now(),
            fallback: RandomStrategy::new(),
            stats,
            recorded: false,
            should_quit: false,
        };
        app.status_message = app.turn_message();
        app
    }

    /// Gets the session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Gets the cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Returns true once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Time left for the human to move, if a countdown is running.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if self.session.game().is_over() || self.session.is_computer_turn() {
            return None;
        }
        let timeout = self.move_timeout?;
        Some(timeout.saturating_sub(now.saturating_duration_since(self.turn_started)))
    }

    /// Handles a key press.
    #[instrument(skip(self))]
    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("Quit requested");
                self.should_quit = true;
            }
            KeyCode::Char('r') => self.restart(),
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, key);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.try_move(self.cursor),
            other => {
                if let Some(pos) = digit_position(other) {
                    self.cursor = pos;
                    self.try_move(pos);
                }
            }
        }
    }

    /// Advances time: plays the computer's turn after the configured delay
    /// and plays a random move for a human whose countdown ran out.
    pub fn tick(&mut self, now: Instant) {
        if self.session.game().is_over() {
            return;
        }
        let elapsed = now.saturating_duration_since(self.turn_started);

        if self.session.is_computer_turn() {
            if elapsed >= self.ai_delay {
                self.computer_move(now);
            }
        } else if self.remaining(now) == Some(Duration::ZERO) {
            self.timeout_move(now);
        }
    }

    fn try_move(&mut self, pos: Position) {
        if self.session.is_computer_turn() {
            self.status_message = "Wait for the computer to move".to_string();
            return;
        }
        match self.session.submit(pos) {
            Ok(_) => self.after_move(Instant::now()),
            Err(e) => {
                debug!(position = %pos, error = %e, "Move rejected");
                self.status_message = e.to_string();
            }
        }
    }

    fn computer_move(&mut self, now: Instant) {
        match self.session.play_computer_turn() {
            Ok(action) => {
                self.cursor = action.position();
                self.after_move(now);
            }
            Err(e) => {
                error!(error = %e, "Computer move failed");
                self.status_message = format!("Computer error: {}", e);
            }
        }
    }

    fn timeout_move(&mut self, now: Instant) {
        let mark = self.session.to_move();
        let mut scratch = *self.session.board();
        let result = self
            .fallback
            .select_move(&mut scratch, mark, mark.opponent())
            .and_then(|pos| self.session.submit(pos).map(|_| pos));
        match result {
            Ok(pos) => {
                info!(player = %mark, position = %pos, "Move timed out, played random square");
                self.cursor = pos;
                self.after_move(now);
                if !self.session.game().is_over() {
                    self.status_message =
                        format!("Time's up! {} played {}. {}", mark, pos, self.turn_message());
                }
            }
            Err(e) => {
                error!(error = %e, "Timeout fallback failed");
                self.status_message = format!("Timeout error: {}", e);
            }
        }
    }

    fn after_move(&mut self, now: Instant) {
        self.turn_started = now;
        if self.session.game().is_over() {
            self.finish();
        } else {
            self.status_message = self.turn_message();
        }
    }

    fn turn_message(&self) -> String {
        let mark = self.session.to_move();
        format!("{} ({}) to move", self.session.seat(mark).name(), mark)
    }

    fn finish(&mut self) {
        let status = self.session.status();
        info!(%status, "Game over");
        let headline = match status {
            GameStatus::Won(mark) => format!("{} ({}) wins!", self.session.seat(mark).name(), mark),
            _ => "It's a draw!".to_string(),
        };
        self.status_message = format!("{} Press 'r' to restart or 'q' to quit.", headline);
        self.record_result();
    }

    fn record_result(&mut self) {
        if self.recorded {
            return;
        }
        let Some(repository) = &self.stats else {
            return;
        };
        self.recorded = true;
        if let Err(e) = GameRecord::from_session(&self.session).and_then(|r| repository.record(&r))
        {
            warn!(error = %e, "Failed to record game");
            self.status_message.push_str(" (result not saved)");
        }
    }

    /// Restarts the game with the same seats.
    pub fn restart(&mut self) {
        debug!("Restarting game");
        self.session.restart();
        self.cursor = Position::Center;
        self.turn_started = Instant::now();
        self.recorded = false;
        self.status_message = format!("Game restarted. {}", self.turn_message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_tictactoe::{Difficulty, Player, Seat, Square};

    fn pvp() -> App {
        App::new(
            GameSession::new(Seat::human("Ann"), Seat::human("Bob")),
            &GameConfig::default(),
            None,
        )
    }

    #[test]
    fn test_digit_places_mark() {
        let mut app = pvp();
        app.handle_key(KeyCode::Char('1'));
        assert_eq!(
            app.session().board().get(Position::TopLeft),
            Square::Occupied(Player::X)
        );
        assert_eq!(app.session().to_move(), Player::O);
        assert_eq!(app.cursor(), Position::TopLeft);
    }

    #[test]
    fn test_occupied_square_reports_error() {
        let mut app = pvp();
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.session().history().len(), 1);
        assert!(app.status_message().contains("occupied"));
    }

    #[test]
    fn test_win_then_restart() {
        let mut app = pvp();
        for key in ['1', '4', '2', '5', '3'] {
            app.handle_key(KeyCode::Char(key));
        }
        assert_eq!(app.session().status(), GameStatus::Won(Player::X));
        assert!(app.status_message().contains("Ann (X) wins!"));

        app.handle_key(KeyCode::Char('9'));
        assert_eq!(app.session().history().len(), 5);

        app.handle_key(KeyCode::Char('r'));
        assert!(app.session().board().is_empty(Position::TopLeft));
        assert_eq!(app.session().status(), GameStatus::InProgress);
    }

    #[test]
    fn test_computer_moves_after_delay() {
        let game = GameConfig::default().with_ai_delay_ms(50);
        let mut app = App::new(
            GameSession::new(Seat::human("Ann"), Seat::computer(Difficulty::Hard)),
            &game,
            None,
        );
        let start = app.turn_started;
        app.handle_key(KeyCode::Char('5'));
        assert!(app.session().is_computer_turn());

        app.turn_started = start;
        app.tick(start + Duration::from_millis(10));
        assert!(app.session().is_computer_turn());

        app.tick(start + Duration::from_millis(60));
        assert_eq!(app.session().history().len(), 2);
        assert_eq!(app.session().to_move(), Player::X);
    }

    #[test]
    fn test_human_key_ignored_on_computer_turn() {
        let mut app = App::new(
            GameSession::new(Seat::computer(Difficulty::Easy), Seat::human("Ann")),
            &GameConfig::default(),
            None,
        );
        app.handle_key(KeyCode::Char('5'));
        assert!(app.session().history().is_empty());
        assert!(app.status_message().contains("Wait"));
    }

    #[test]
    fn test_timeout_plays_random_move() {
        let game = GameConfig::default().with_move_timeout_secs(5);
        let mut app = App::new(
            GameSession::new(Seat::human("Ann"), Seat::human("Bob")),
            &game,
            None,
        );
        let start = app.turn_started;
        assert_eq!(app.remaining(start), Some(Duration::from_secs(5)));

        app.tick(start + Duration::from_secs(4));
        assert!(app.session().history().is_empty());

        app.tick(start + Duration::from_secs(5));
        assert_eq!(app.session().history().len(), 1);
        assert!(app.status_message().starts_with("Time's up!"));
    }

    #[test]
    fn test_finished_game_is_recorded_once() {
        let dir = tempfile::tempdir().unwrap();
        let repository = StatsRepository::new(dir.path().join("stats.jsonl"));
        let mut app = App::new(
            GameSession::new(Seat::human("Ann"), Seat::human("Bob")),
            &GameConfig::default(),
            Some(repository.clone()),
        );
        for key in ['1', '4', '2', '5', '3'] {
            app.handle_key(KeyCode::Char(key));
        }
        app.tick(Instant::now());
        app.handle_key(KeyCode::Char('6'));

        let records = repository.load().unwrap();
        assert_eq!(records.len(), 1);
    }
}
