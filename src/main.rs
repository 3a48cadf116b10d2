use std::{fs, io, sync::Mutex};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use taskers::config::{Cli, Config};
use taskers::ui::{run_app, App};
use taskers::TodoBoard;

fn main() -> anyhow::Result<()> {
    let config = Config::from(Cli::parse());
    init_tracing(&config)?;

    // Load before touching the terminal so a corrupt file is reported plainly.
    let board = TodoBoard::open(&config)
        .with_context(|| format!("could not open {}", config.data_path.display()))?;
    info!(path = %config.data_path.display(), count = board.tasks().len(), "Opened task list");
    let mut app = App::new(board, config);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    if app.board.is_dirty() {
        app.board
            .save()
            .context("changes made in this session could not be saved")?;
    }
    Ok(())
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    if let Some(parent) = config.log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("could not open log file {}", config.log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}
