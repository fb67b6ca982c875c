//! State manager messages
//!
//! Commands and responses for the actor pattern.

use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{DayReview, Goal, GoalFilter, Intention, NewGoal};

/// Errors from state operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    // Goal operations
    GetGoals {
        filter: GoalFilter,
        reply: oneshot::Sender<StateResponse<Vec<Goal>>>,
    },
    InsertGoal {
        goal: NewGoal,
        reply: oneshot::Sender<StateResponse<Goal>>,
    },
    UpsertGoals {
        goals: Vec<Goal>,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    DeleteGoals {
        goals: Vec<Goal>,
        reply: oneshot::Sender<StateResponse<usize>>,
    },

    // Intention operations
    GetIntentionsForDay {
        day: NaiveDate,
        reply: oneshot::Sender<StateResponse<Vec<Intention>>>,
    },
    UpsertIntentions {
        intentions: Vec<Intention>,
        reply: oneshot::Sender<StateResponse<Vec<Intention>>>,
    },

    // Day review operations
    UpsertDayReviews {
        reviews: Vec<DayReview>,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    GetDayReviews {
        date: NaiveDate,
        reply: oneshot::Sender<StateResponse<Vec<DayReview>>>,
    },

    // Shutdown
    Shutdown,
}
