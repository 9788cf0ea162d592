//! Strictly Tic-Tac-Toe - Unified CLI
//!
//! Interactive play, headless simulation and history summaries.

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use strictly_tictactoe::{
    Config, Difficulty, FirstPlayer, GameMode, GameRecord, GameSession, NoHumans, Seat,
    StatsRepository, StatsSummary,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Command::Play {
            mode,
            difficulty,
            first,
            timeout,
        } => {
            initialize_file_tracing(&config)?;
            let config = apply_play_overrides(config, difficulty, first, timeout);
            run_play(mode, &config)
        }
        Command::Simulate {
            x,
            o,
            games,
            seed,
            record,
        } => {
            initialize_stderr_tracing(&config);
            run_simulate(x, o, games, seed, record, &config)
        }
        Command::Stats { mode } => {
            initialize_stderr_tracing(&config);
            run_stats(mode, &config)
        }
    }
}

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.logging().filter()))
}

/// The terminal UI owns stdout, so interactive sessions log to a file.
fn initialize_file_tracing(config: &Config) -> Result<()> {
    let path = config.logging().file();
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn initialize_stderr_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .init();
}

fn apply_play_overrides(
    config: Config,
    difficulty: Option<Difficulty>,
    first: Option<FirstPlayer>,
    timeout: Option<u64>,
) -> Config {
    let mut game = config.game().clone();
    if let Some(difficulty) = difficulty {
        game = game.with_difficulty(difficulty);
    }
    if let Some(first) = first {
        game = game.with_first_player(first);
    }
    if let Some(timeout) = timeout {
        game = game.with_move_timeout_secs(timeout);
    }
    config.with_game(game)
}

/// Seats for an interactive game.
fn seats_for(mode: GameMode, config: &Config) -> (Seat, Seat) {
    let difficulty = *config.game().difficulty();
    match mode {
        GameMode::PlayerVsPlayer => (Seat::human("Player 1"), Seat::human("Player 2")),
        GameMode::PlayerVsComputer => match config.game().first_player() {
            FirstPlayer::Human => (Seat::human("You"), Seat::computer(difficulty)),
            FirstPlayer::Computer => (Seat::computer(difficulty), Seat::human("You")),
        },
        GameMode::ComputerVsComputer => (Seat::computer(difficulty), Seat::computer(difficulty)),
    }
}

/// Run the terminal UI
#[instrument(skip(config))]
fn run_play(mode: GameMode, config: &Config) -> Result<()> {
    info!(difficulty = %config.game().difficulty(), "Starting interactive game");
    let (seat_x, seat_o) = seats_for(mode, config);
    tui::run_tui(GameSession::new(seat_x, seat_o), config)
}

/// Play computer-vs-computer games and print the tally
#[instrument(skip(config))]
fn run_simulate(
    x: Difficulty,
    o: Difficulty,
    games: u32,
    seed: Option<u64>,
    record: bool,
    config: &Config,
) -> Result<()> {
    let repository = (record && *config.stats().enabled())
        .then(|| StatsRepository::new(config.stats().path()));
    if record && repository.is_none() {
        warn!("Recording requested but stats are disabled in config");
    }

    let mut records = Vec::with_capacity(games as usize);
    let mut last_board = None;
    for game in 0..games {
        let (seat_x, seat_o) = match seed {
            Some(seed) => {
                let base = seed.wrapping_add(u64::from(game) * 2);
                (
                    Seat::computer_with(x, x.seeded_strategy(base)),
                    Seat::computer_with(o, o.seeded_strategy(base.wrapping_add(1))),
                )
            }
            None => (Seat::computer(x), Seat::computer(o)),
        };

        let mut session = GameSession::new(seat_x, seat_o);
        session.run(&mut NoHumans, &mut ())?;

        let result = GameRecord::from_session(&session)?;
        if let Some(repository) = &repository {
            repository.record(&result)?;
        }
        records.push(result);
        last_board = Some(*session.board());
    }

    let summary = StatsSummary::from_records(&records);
    println!("{} (X) vs {} (O)", x, o);
    print_summary(&summary);
    if let Some(board) = last_board {
        println!();
        println!("Final board of the last game:");
        println!("{}", board);
    }
    Ok(())
}

/// Print the recorded history
#[instrument(skip(config))]
fn run_stats(mode: Option<GameMode>, config: &Config) -> Result<()> {
    let repository = StatsRepository::new(config.stats().path());
    let summary = repository.summarize(mode)?;
    match mode {
        Some(mode) => println!("History ({}): {}", mode, repository.path().display()),
        None => println!("History: {}", repository.path().display()),
    }
    print_summary(&summary);

    for (difficulty, tier) in repository.summarize_by_difficulty(mode)? {
        println!();
        println!("Against {} computer:", difficulty);
        print_summary(&tier);
    }
    Ok(())
}

fn print_summary(summary: &StatsSummary) {
    println!("Games:           {}", summary.games());
    println!("X wins:          {}", summary.x_wins());
    println!("O wins:          {}", summary.o_wins());
    println!(
        "Draws:           {} ({:.1}%)",
        summary.draws(),
        summary.draw_rate()
    );
    println!("Computer wins:   {}", summary.computer_wins());
    println!("Computer losses: {}", summary.computer_losses());
}
