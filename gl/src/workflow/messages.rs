//! Messages into the workflow and commands out of it

use chrono::NaiveDate;

use crate::domain::{DayReview, Goal, GoalFilter, Intention};
use crate::state::StateResponse;

/// Pages of the daily workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Typing intentions for the day
    Input,
    /// Waiting on the store
    Loading,
    /// Working through the day's intentions
    Today,
    /// End-of-day review
    Outcomes,
}

/// Everything the workflow reacts to: user actions and store completions
#[derive(Debug)]
pub enum Msg {
    // Text entry (intention draft, reflection, unintended prompt)
    Char(char),
    Newline,
    Backspace,

    // Navigation
    Up,
    Down,
    PrevSection,
    NextSection,

    // Intention edits
    MoveUp,
    MoveDown,
    ToggleDone,
    ToggleCancelled,
    PomoIncrement,
    PomoDecrement,

    // Page actions
    /// Add intentions (Today) or an unintended one (Outcomes)
    Add,
    /// Leave the current field or page without saving
    Cancel,
    /// Submit the draft or the review
    Submit,
    /// Finish the day and open the review
    EndDay,
    SetEnough(bool),
    FocusReflection,
    /// Reload goals and the day from the store
    Sync,

    // Store completions
    GoalsLoaded(StateResponse<Vec<Goal>>),
    DayLoaded {
        day: NaiveDate,
        result: StateResponse<Vec<Intention>>,
    },
    IntentionsSaved(StateResponse<Vec<Intention>>),
    ReviewsSaved(StateResponse<()>),
}

/// Store work requested by the workflow; each answers with one [`Msg`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadGoals(GoalFilter),
    LoadDay(NaiveDate),
    SaveIntentions(Vec<Intention>),
    SaveReviews(Vec<DayReview>),
}

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// One-line message shown at the bottom of the active page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}
