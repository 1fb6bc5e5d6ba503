//! Terminal front end for the portfolio shell.
//!
//! # Headless Mode
//!
//! Run with `--headless` to read commands from stdin and print tagged lines:
//!
//! ```bash
//! printf 'help\nweather Lisbon\n' | cargo run -p shell -- --headless
//! ```

mod app;
mod events;
mod headless;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use shell_core::{HttpLookup, LogNavigator, ShellConfig, ShellSession};
use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let headless = args.iter().any(|a| a == "--headless");
    init_tracing(headless)?;

    let config = ShellConfig::from_env();
    let history_file = config.history_file.clone();
    let lookup = Arc::new(HttpLookup::from_env()?);
    let mut session = ShellSession::new(config, lookup, Box::new(LogNavigator));
    info!(session = %session.id(), headless, "starting shell");

    if let Some(path) = history_file.as_ref().filter(|p| p.exists()) {
        if let Err(e) = session.load_history(path).await {
            warn!(path = %path.display(), error = %e, "could not load history");
        }
    }

    if headless {
        headless::run_headless(&mut session).await?;
    } else {
        session = run_tui(session).await?;
    }

    if let Some(path) = &history_file {
        if let Err(e) = session.save_history(path).await {
            eprintln!("Failed to save history to {}: {e}", path.display());
        }
    }

    Ok(())
}

/// Install the subscriber. The TUI owns the terminal, so it only logs to a file.
fn init_tracing(headless: bool) -> io::Result<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    } else if let Ok(path) = std::env::var("WEBSHELL_LOG") {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    Ok(())
}

async fn run_tui(session: ShellSession) -> io::Result<ShellSession> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(app.into_session())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &*app))?;

        app.drain_completions();

        // Poll for events with timeout so completions and the spinner keep moving
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        } else {
            app.tick();
        }
    }
}

fn print_help() {
    println!("webshell - a modal command shell for the terminal");
    println!();
    println!("USAGE:");
    println!("  webshell [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  --headless    Read commands from stdin and print tagged output");
    println!("  -h, --help    Show this help");
    println!();
    println!("ENVIRONMENT:");
    println!("  WEBSHELL_USER, WEBSHELL_HOST       Prompt identity");
    println!("  WEBSHELL_HISTORY_FILE              Load history at start, save on exit");
    println!("  WEBSHELL_HISTORY_LIMIT             Maximum retained commands");
    println!("  WEBSHELL_DUPLICATE_WINDOW_MS       Double-submit guard window");
    println!("  WEBSHELL_LOG                       Log file for TUI mode");
    println!("  RUST_LOG                           Log filter (default: info)");
}
