//! Terminal User Interface for Goalie
//!
//! Four pages driven by the workflow controller:
//! - Input: write the day's intentions against numbered goals
//! - Loading: store work in progress
//! - Today: track, reorder and count pomodoros
//! - Outcomes: per-goal end of day review

mod app;
mod events;
mod runner;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use runner::TuiRunner;

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::state::StateManager;
use crate::workflow::Workflow;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI against the store behind `state_manager`
pub async fn run(state_manager: StateManager, workflow: Workflow, tick_rate: Duration) -> Result<()> {
    let terminal = init()?;

    // Use a guard to ensure terminal is restored even on early return/error
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(terminal, state_manager, App::new(workflow), tick_rate);
    runner.run().await
}
