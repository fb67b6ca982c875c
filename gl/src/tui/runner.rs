//! TUI Runner - main loop that owns the terminal and talks to the StateManager
//!
//! The TuiRunner is responsible for:
//! - Dispatching workflow commands to the StateManager on background tasks
//! - Feeding key events and store completions to the App
//! - Redrawing after every event

use std::time::Duration;

use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::state::StateManager;
use crate::workflow::{Command, Msg, execute};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Application state
    app: App,
    /// Terminal handle
    terminal: Tui,
    /// StateManager for data
    state_manager: StateManager,
    /// Event handler
    event_handler: EventHandler,
    /// Completions of dispatched commands
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, state_manager: StateManager, app: App, tick_rate: Duration) -> Self {
        debug!("TuiRunner::new: called");
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            app,
            terminal,
            state_manager,
            event_handler: EventHandler::new(tick_rate),
            msg_tx,
            msg_rx,
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: called");
        self.app.start();
        self.dispatch();

        loop {
            self.terminal.draw(|frame| views::render(&self.app, frame))?;

            tokio::select! {
                event = self.event_handler.next() => {
                    match event? {
                        Event::Key(key) => {
                            if self.app.handle_key(key) {
                                debug!("TuiRunner::run: quit requested");
                                break;
                            }
                        }
                        Event::Resize(width, height) => {
                            trace!(width, height, "TuiRunner::run: resize");
                        }
                        Event::Tick => {}
                    }
                }
                Some(msg) = self.msg_rx.recv() => {
                    self.app.handle_msg(msg);
                }
            }

            self.dispatch();
        }

        info!("TUI exiting");
        Ok(())
    }

    /// Send queued commands to the store
    fn dispatch(&mut self) {
        for command in self.app.take_commands() {
            self.spawn_command(command);
        }
    }

    fn spawn_command(&self, command: Command) {
        debug!(?command, "TuiRunner::spawn_command: called");
        let manager = self.state_manager.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let msg = execute(&manager, command).await;
            // Receiver is gone once the TUI has quit
            let _ = tx.send(msg);
        });
    }
}
