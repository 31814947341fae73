use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;

pub(crate) type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub(crate) fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("failed to enable raw mode")?;
    if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err).context("failed to enter alternate screen");
    }
    Terminal::new(CrosstermBackend::new(io::stdout())).context("failed to create terminal")
}

/// Leaves the alternate screen even when raw mode could not be disabled,
/// then reports the first failure.
pub(crate) fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    let raw = disable_raw_mode().context("failed to disable raw mode");
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen");
    let cursor = terminal.show_cursor().context("failed to show cursor");
    raw.and(screen).and(cursor)
}
