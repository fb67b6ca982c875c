//! Domain types
//!
//! Records come from goalstore; [`GoalTable`] resolves goal ids and display codes.

mod goal_table;

pub use goal_table::GoalTable;
pub use goalstore::{DayReview, Goal, GoalFilter, GoalId, Intention, IntentionId, NewGoal, Store, StoreError};
