//! Terminal UI for Strictly Tic-Tac-Toe

mod app;
mod input;
mod theme;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use strictly_tictactoe::{Config, GameSession, StatsRepository};
use tracing::{error, info, instrument};

use app::App;
use theme::Theme;

/// Run the TUI until the user quits.
#[instrument(skip_all, fields(mode = %session.mode()))]
pub fn run_tui(session: GameSession, config: &Config) -> Result<()> {
    info!("Starting Strictly Tic-Tac-Toe TUI");

    let stats = config
        .stats()
        .enabled()
        .then(|| StatsRepository::new(config.stats().path()));
    let app = App::new(session, config.game(), stats);
    let theme = Theme::from_config(config.theme());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, &theme);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
    theme: &Theme,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &app, theme))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
        if app.should_quit() {
            info!("Leaving TUI");
            return Ok(());
        }

        app.tick(Instant::now());
    }
}
