//! Command-line interface for strictly_tictactoe.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_tictactoe::{DEFAULT_CONFIG_FILE, Difficulty, FirstPlayer, GameMode};

/// Strictly Tic-Tac-Toe - rules-checked tic-tac-toe with computer opponents
#[derive(Parser, Debug)]
#[command(name = "strictly_tictactoe")]
#[command(about = "Tic-tac-toe in the terminal against humans or computer strategies", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults apply if it does not exist)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively in the terminal UI
    Play {
        /// Seats: pvp, pvc or cvc
        #[arg(short, long, default_value = "pvc")]
        mode: GameMode,

        /// Computer strength (easy, medium, hard); overrides the config file
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Who plays X against the computer (human or computer)
        #[arg(short, long)]
        first: Option<FirstPlayer>,

        /// Seconds per human move, 0 to disable; overrides the config file
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Play computer-vs-computer games headlessly and print the tally
    Simulate {
        /// Strategy playing X
        #[arg(short, long, default_value = "hard")]
        x: Difficulty,

        /// Strategy playing O
        #[arg(short, long, default_value = "easy")]
        o: Difficulty,

        /// Number of games
        #[arg(short = 'n', long, default_value = "100")]
        games: u32,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Append results to the history file
        #[arg(long)]
        record: bool,
    },

    /// Print a summary of recorded games
    Stats {
        /// Only count games of this mode (pvp, pvc, cvc)
        #[arg(short, long)]
        mode: Option<GameMode>,
    },
}
