//! Record types persisted by the store

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identifier of a goal, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub i64);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of an intention, assigned by the store on first insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntentionId(pub i64);

impl fmt::Display for IntentionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A long-term motivational category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub description: String,
    /// Display number; goals are always presented in this order
    pub number: i64,
    /// Color tag used by the terminal views (hex like "#ff8800" or a color name)
    pub color: String,
    pub archived: bool,
    /// Creation timestamp (unix ms)
    pub created_at: i64,
}

/// Fields needed to create a goal; the store picks id and number
#[derive(Debug, Clone, Default)]
pub struct NewGoal {
    pub name: String,
    pub description: String,
    pub color: String,
}

impl NewGoal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Which goals a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalFilter {
    #[default]
    Active,
    Archived,
    All,
}

/// One planned (or, when `unintended`, realized) unit of action for a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intention {
    /// None until the store has persisted the record
    pub id: Option<IntentionId>,
    /// Raw text as typed, including its goal-code prefix
    pub content: String,
    pub day: NaiveDate,
    pub done: bool,
    pub cancelled: bool,
    /// Closed out by an end-of-day review
    pub outcome: bool,
    /// Added during the end-of-day review rather than planned
    pub unintended: bool,
    /// Order within the day, contiguous from 0
    pub position: i64,
    /// Pomodoro counter
    pub pomos: i64,
    /// Creation timestamp (unix ms)
    pub created_at: i64,
    /// Associated goals in the order they were written; may repeat
    pub goals: Vec<GoalId>,
}

impl Intention {
    /// Create an unsaved intention for `day`
    pub fn new(content: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            id: None,
            content: content.into(),
            day,
            done: false,
            cancelled: false,
            outcome: false,
            unintended: false,
            position: 0,
            pomos: 0,
            created_at: crate::now_ms(),
            goals: Vec::new(),
        }
    }

    pub fn with_goals(mut self, goals: Vec<GoalId>) -> Self {
        self.goals = goals;
        self
    }

    /// True when the intention references `goal` at least once
    pub fn has_goal(&self, goal: GoalId) -> bool {
        self.goals.contains(&goal)
    }
}

/// End-of-day verdict for one goal, or for unassociated work when `goal` is None
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReview {
    pub date: NaiveDate,
    pub goal: Option<GoalId>,
    /// Did the day do enough for this goal
    pub enough: bool,
    pub reflection: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_intention_is_unsaved_and_open() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let i = Intention::new("1) run", day);
        assert!(i.id.is_none());
        assert!(!i.done && !i.cancelled && !i.outcome && !i.unintended);
        assert_eq!(i.day, day);
        assert!(i.goals.is_empty());
    }

    #[test]
    fn test_has_goal_with_duplicates() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let i = Intention::new("2,2) x", day).with_goals(vec![GoalId(2), GoalId(2)]);
        assert!(i.has_goal(GoalId(2)));
        assert!(!i.has_goal(GoalId(1)));
    }

    #[test]
    fn test_new_goal_builder() {
        let g = NewGoal::new("Health").with_description("move daily").with_color("green");
        assert_eq!(g.name, "Health");
        assert_eq!(g.description, "move daily");
        assert_eq!(g.color, "green");
    }
}
