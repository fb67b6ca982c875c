//! Goalie - daily intentions against long-term goals
//!
//! Every morning you write down what you intend to do, tagging each line with
//! the goals it serves. During the day you tick things off; at the end of the
//! day you review each goal in turn and say whether you did enough for it.
//!
//! # Core Concepts
//!
//! - **Working day**: days start at a configurable hour (04:00 by default),
//!   so late nights still count toward the day they began
//! - **Goal codes**: active goals are coded 1..n in the order they were
//!   created, skipping archived ones; an intention line reads `1,3) text`
//!   or `-) text`
//! - **Outcome review**: one section per goal plus a misc section, each with
//!   a yes/no verdict and a free-text reflection
//!
//! # Modules
//!
//! - [`day`] - Working day boundary
//! - [`parser`] - Intention line parsing
//! - [`reorder`] - Cursor wrapping and list reordering
//! - [`outcome`] - End-of-day review sections
//! - [`workflow`] - Input / Loading / Today / Outcomes state machine
//! - [`state`] - Actor owning the SQLite store
//! - [`tui`] - Terminal interface
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod day;
pub mod domain;
pub mod outcome;
pub mod parser;
pub mod reorder;
pub mod state;
pub mod tui;
pub mod workflow;

// Re-export commonly used types
pub use config::Config;
pub use day::DayBoundary;
pub use domain::{DayReview, Goal, GoalFilter, GoalId, GoalTable, Intention, IntentionId, NewGoal};
pub use outcome::{OutcomeReview, ReviewFocus, Section};
pub use parser::{ParseError, parse_intentions};
pub use state::{StateError, StateManager};
pub use workflow::{Command, Msg, Page, Workflow};
