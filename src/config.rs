//! Configuration loaded from a TOML file.
//!
//! Every section is optional; missing keys fall back to defaults.
//!
//! ```toml
//! [game]
//! difficulty = "hard"
//! first_player = "human"
//! move_timeout_secs = 10
//!
//! [stats]
//! path = "tictactoe_stats.jsonl"
//!
//! [theme]
//! x_color = "blue"
//! o_color = "red"
//! ```

use crate::ai::Difficulty;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "tictactoe.toml";

/// Which seat takes the first move (X) in a player-vs-computer game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FirstPlayer {
    /// The human plays X.
    #[default]
    Human,
    /// The computer plays X.
    Computer,
}

impl FirstPlayer {
    /// Toggles between `Human` and `Computer`.
    pub fn toggle(self) -> Self {
        match self {
            Self::Human => Self::Computer,
            Self::Computer => Self::Human,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct Config {
    /// Game rules and computer opponent.
    game: GameConfig,
    /// Play history persistence.
    stats: StatsConfig,
    /// Terminal colors.
    theme: ThemeConfig,
    /// Log output.
    logging: LoggingConfig,
}

/// `[game]` section.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Computer strength.
    difficulty: Difficulty,
    /// Who plays X against the computer.
    first_player: FirstPlayer,
    /// Seconds a human has per move; 0 disables the countdown.
    move_timeout_secs: u64,
    /// Pause before a computer move so it can be followed on screen.
    ai_delay_ms: u64,
}

impl GameConfig {
    /// Per-move countdown for humans, if enabled.
    pub fn move_timeout(&self) -> Option<Duration> {
        (self.move_timeout_secs > 0).then(|| Duration::from_secs(self.move_timeout_secs))
    }

    /// Delay before computer moves.
    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            first_player: FirstPlayer::default(),
            move_timeout_secs: 0,
            ai_delay_ms: 400,
        }
    }
}

/// `[stats]` section.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct StatsConfig {
    /// Record finished games.
    enabled: bool,
    /// JSON-lines history file.
    path: PathBuf,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("tictactoe_stats.jsonl"),
        }
    }
}

/// `[theme]` section. Values are color names or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color of X marks.
    x_color: String,
    /// Color of O marks.
    o_color: String,
    /// Cursor highlight.
    highlight: String,
    /// Title and borders.
    accent: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            x_color: "blue".to_string(),
            o_color: "red".to_string(),
            highlight: "yellow".to_string(),
            accent: "cyan".to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    filter: String,
    /// Log file for the terminal UI, which owns stdout.
    file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: PathBuf::from("strictly_tictactoe.log"),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(difficulty = %config.game.difficulty, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
