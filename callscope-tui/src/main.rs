//! callscope - contact-center analytics dashboard
//!
//! Terminal UI for browsing daily, hourly, monthly, and classifier metrics
//! and exporting them to xlsx.

mod app;
mod theme;
mod ui;

use std::io;

use anyhow::{Context, Result};
use callscope_core::{Config, HttpBackend};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;
use crate::theme::Theme;

fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        callscope_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("callscope TUI starting up");

    // Connect the backend client
    let backend = HttpBackend::new(&config.backend).context("failed to build backend client")?;
    tracing::info!(url = %config.backend.server_url, "Using reporting backend");

    // The UI owns the runtime; fetches run to completion inside key handlers
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    let theme = Theme::new(config.theme.mode);

    // Create app and load the default view
    let mut app = App::new(&config, backend, runtime);
    app.reload();

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &theme);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("callscope TUI shutting down");

    result
}

/// Run the main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &Theme,
) -> Result<()> {
    loop {
        // Render
        terminal.draw(|frame| ui::render(frame, app, theme))?;

        // Handle events
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
