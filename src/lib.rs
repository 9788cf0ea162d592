//! Strictly Tic-Tac-Toe library - a rules-checked 3×3 game with computer opponents
//!
//! # Architecture
//!
//! - **Games**: Board model, rule engine and move enumeration
//! - **AI**: Random, heuristic and minimax move-selection strategies
//! - **Session**: Turn order between human and computer seats
//! - **Stats**: JSON-lines history of finished games
//! - **Config**: TOML configuration with defaults
//!
//! # Example
//!
//! ```
//! use strictly_tictactoe::{Difficulty, GameSession, GameStatus, Seat};
//!
//! let mut session = GameSession::new(
//!     Seat::computer(Difficulty::Hard),
//!     Seat::computer(Difficulty::Hard),
//! );
//! let status = session.run(&mut strictly_tictactoe::NoHumans, &mut ()).unwrap();
//! assert_eq!(status, GameStatus::Draw);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod ai;
mod config;
mod games;
mod session;
mod stats;

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, Game, GameStatus, Move, MoveError, Player, Position, Square, rules,
};

// Crate-level exports - Computer strategies
pub use ai::{Difficulty, HeuristicStrategy, MinimaxStrategy, RandomStrategy, Strategy};

// Crate-level exports - Session management
pub use session::{GameMode, GameSession, MoveSource, NoHumans, Observer, Seat};

// Crate-level exports - Play history
pub use stats::{GameRecord, RecordedOutcome, StatsError, StatsRepository, StatsSummary};

// Crate-level exports - Configuration
pub use config::{
    Config, ConfigError, DEFAULT_CONFIG_FILE, FirstPlayer, GameConfig, LoggingConfig, StatsConfig,
    ThemeConfig,
};
