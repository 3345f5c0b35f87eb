// gym-tracker-tui/src/main.rs
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gym_tracker_lib::GymTracker;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{fs::OpenOptions, io, sync::Mutex, time::Duration};
use tracing_subscriber::EnvFilter;

mod app; // Application state
mod ui; // UI rendering logic

use crate::app::App;

const LOG_FILE_NAME: &str = "gym-tui.log";

fn main() -> Result<()> {
    // The terminal belongs to the UI, so diagnostics go to a file next to the database
    init_tracing()?;

    let tracker = GymTracker::initialize().context("Failed to initialize gym tracker")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let mut app = App::new(tracker);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "ui loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let db_path = gym_tracker_lib::get_db_path_util().context("Failed to determine data directory")?;
    let log_path = db_path.with_file_name(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Pick up coach replies and expire old status messages before drawing
        app.tick();

        terminal.draw(|f| ui::render_ui(f, app))?;

        // Poll with a timeout so pending coach replies show up without input
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
