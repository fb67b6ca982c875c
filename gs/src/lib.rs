//! GoalStore - SQLite persistence for goalie
//!
//! Holds the three record kinds the daily workflow works with:
//!
//! - [`Goal`] - long-term categories, ordered by display number
//! - [`Intention`] - one planned unit of work for a day, tagged with goals
//! - [`DayReview`] - the end-of-day verdict for one goal (or misc)
//!
//! # Schema
//!
//! ```text
//! goals            (id, name, description, number, color, archived, created_at)
//! intentions       (id, content, day, done, cancelled, outcome, unintended, position, pomos, created_at)
//! intention_goals  (intention_id, ordinal, goal_id)     -- ordered, duplicates allowed
//! day_reviews      (date, goal_key, goal_id, enough, reflection)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use goalstore::{GoalFilter, NewGoal, Store};
//!
//! let mut store = Store::open("goalie.db")?;
//! store.insert_goal(NewGoal::new("Health"))?;
//! let goals = store.get_goals(GoalFilter::Active)?;
//! ```

mod model;
mod store;

pub use model::{DayReview, Goal, GoalFilter, GoalId, Intention, IntentionId, NewGoal};
pub use store::{DB_FILENAME, Store, StoreError, now_ms};
