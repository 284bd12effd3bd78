//! `TaskFlow` — terminal Kanban board.
//!
//! Connects to a `taskflow-server` and shows its tasks in three status
//! columns. Configuration via CLI flags, environment variables, or config
//! file (`~/.config/taskflow/config.toml`).
//!
//! ```bash
//! # Default server (http://127.0.0.1:3000)
//! cargo run --bin taskflow
//!
//! # Another server
//! cargo run --bin taskflow -- --server-url http://tasks.local:8080
//! TASKFLOW_URL=http://tasks.local:8080 cargo run --bin taskflow
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskflow::app::App;
use taskflow::cache::{QueryCache, SharedCache};
use taskflow::client::ApiClient;
use taskflow::config::{CliArgs, ClientConfig};
use taskflow::net::{self, ApiCommand, ApiEvent};
use taskflow::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // CLI args > config file > env > defaults.
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::from_cli(&cli)
        }
    };

    // Logs go to a file; ratatui owns stdout.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    let client = match ApiClient::new(&config.server_url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(server = %client.base_url(), "taskflow starting");

    let cache = QueryCache::shared();
    let (cmd_tx, evt_rx) = net::spawn_worker(
        client.clone(),
        SharedCache::clone(&cache),
        config.channel_capacity,
    );

    let app = App::new(cache, client.base_url().as_str())
        .with_timestamp_format(config.timestamp_format.clone());

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app, &cmd_tx, evt_rx, &config);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if cmd_tx.send(ApiCommand::Shutdown).await.is_err() {
        tracing::debug!("request worker already stopped");
    }
    tracing::info!("taskflow exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown so buffered
/// log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskflow.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
///
/// Runs on the main thread. Blocking crossterm polls are bounded by the
/// configured poll timeout, and the worker tasks run on other runtime
/// threads.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    cmd_tx: &mpsc::Sender<ApiCommand>,
    mut evt_rx: mpsc::Receiver<ApiEvent>,
    config: &ClientConfig,
) -> io::Result<()> {
    loop {
        // Step 1: Start fetches for stale or never-loaded queries.
        for command in app.poll_queries() {
            dispatch(&mut app, cmd_tx, command);
        }

        // Step 2: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 3: Drain pending worker events (non-blocking).
        while let Ok(event) = evt_rx.try_recv() {
            app.apply_event(event);
        }

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(command) = app.handle_key_event(key) {
                dispatch(&mut app, cmd_tx, command);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Hands a command to the request worker, rolling back the UI if the
/// channel refuses it.
fn dispatch(app: &mut App, tx: &mpsc::Sender<ApiCommand>, command: ApiCommand) {
    match tx.try_send(command) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(command)) => {
            app.dispatch_failed(command, "request queue is full");
        }
        Err(mpsc::error::TrySendError::Closed(command)) => {
            app.dispatch_failed(command, "request worker stopped");
        }
    }
}
