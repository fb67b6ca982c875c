//! State management with actor pattern
//!
//! StateManager owns the goal store and processes messages via channels,
//! so the SQLite connection is only ever touched from one task.

mod manager;
mod messages;

pub use manager::StateManager;
pub use messages::{StateCommand, StateError, StateResponse};
