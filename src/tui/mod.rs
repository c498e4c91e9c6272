//! Terminal browser for the API directory

pub mod app;
pub mod colors;
pub mod search;
pub mod table;
pub mod ui;

use crate::AppConfig;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};

/// Entry point: take over the terminal and run the browser until quit
pub fn run(config: AppConfig) -> crate::Result<()> {
    let source = config.source()?;
    let mut app = app::App::new(config, source);

    let mut terminal = setup_terminal()?;
    let result = app.run(&mut terminal);
    // Restore even when the loop failed
    let restored = restore_terminal(&mut terminal);

    result.and(restored)
}

fn setup_terminal() -> crate::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> crate::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
