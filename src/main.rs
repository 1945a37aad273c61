use std::io;

use clap::Parser;
use color_eyre::Result;
use crossterm::{event, terminal};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::info;

use dashcam::{app::App, config::Cli, logging, runtime::Runtime};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _log_guard = logging::init(&cli.log_file, cli.log_level)?;
    info!(api_url = %cli.api_url, "starting");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(
        stdout,
        terminal::EnterAlternateScreen,
        event::EnableMouseCapture,
        event::EnableFocusChange
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&cli, &mut terminal).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        event::DisableFocusChange,
        event::DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run(cli: &Cli, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    let size = terminal.size()?;
    let settings = cli.settings(Rect::new(0, 0, size.width, size.height))?;
    let runtime = Runtime::<App>::new(settings);
    runtime.run(terminal, cli.frame_rate).await?;
    info!("exited");
    Ok(())
}
