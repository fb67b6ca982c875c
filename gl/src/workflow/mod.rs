//! Daily workflow: Input → Loading → Today → Outcomes
//!
//! The [`Workflow`] is a pure state machine. It consumes [`Msg`] values (key
//! actions and store completions) and returns [`Command`]s describing store
//! work. Whoever drives it (the TUI runner, tests) executes the commands and
//! feeds the resulting messages back in, in whatever order they complete.

mod controller;
mod effects;
mod messages;

pub use controller::Workflow;
pub use effects::execute;
pub use messages::{Command, Msg, Page, Status, StatusLevel};

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Intention;
use crate::reorder::renumber;

/// Errors raised by the workflow itself
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("internal error: {0}")]
    Internal(String),
}

/// Append freshly parsed intentions after the day's open ones
///
/// Every intention is re-dated to `day` and positions are renumbered 0..N-1.
pub fn merge_intentions(existing: &[Intention], parsed: Vec<Intention>, day: NaiveDate) -> Vec<Intention> {
    let mut merged = existing.to_vec();
    merged.extend(parsed);
    for intention in &mut merged {
        intention.day = day;
    }
    renumber(&mut merged);
    merged
}
