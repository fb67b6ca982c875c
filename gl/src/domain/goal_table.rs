//! Ordered goal list with id lookup
//!
//! Intentions reference goals by [`GoalId`]. Users type goals by display code,
//! the 1-based position of a goal in number order.

use std::collections::HashMap;

use super::{Goal, GoalId};

/// Loaded goals in display order
#[derive(Debug, Clone, Default)]
pub struct GoalTable {
    goals: Vec<Goal>,
    by_id: HashMap<GoalId, usize>,
}

impl GoalTable {
    /// Build the table, sorting by display number
    pub fn new(mut goals: Vec<Goal>) -> Self {
        goals.sort_by_key(|g| (g.number, g.id));
        let by_id = goals.iter().enumerate().map(|(i, g)| (g.id, i)).collect();
        Self { goals, by_id }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn get(&self, id: GoalId) -> Option<&Goal> {
        self.by_id.get(&id).and_then(|&i| self.goals.get(i))
    }

    /// Goal for a 1-based display code
    pub fn by_code(&self, code: i64) -> Option<&Goal> {
        let index = usize::try_from(code).ok()?.checked_sub(1)?;
        self.goals.get(index)
    }

    /// 1-based display code of a goal
    pub fn code_of(&self, id: GoalId) -> Option<usize> {
        self.by_id.get(&id).map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(id: i64, number: i64, name: &str) -> Goal {
        Goal {
            id: GoalId(id),
            name: name.to_string(),
            description: String::new(),
            number,
            color: String::new(),
            archived: false,
            created_at: 0,
        }
    }

    #[test]
    fn test_sorted_by_number() {
        let table = GoalTable::new(vec![goal(1, 3, "C"), goal(2, 1, "A"), goal(3, 2, "B")]);
        let names: Vec<&str> = table.goals().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_codes_are_one_based_display_positions() {
        let table = GoalTable::new(vec![goal(10, 5, "A"), goal(20, 9, "B")]);
        assert_eq!(table.by_code(1).unwrap().id, GoalId(10));
        assert_eq!(table.by_code(2).unwrap().id, GoalId(20));
        assert!(table.by_code(0).is_none());
        assert!(table.by_code(3).is_none());
        assert!(table.by_code(-1).is_none());
        assert_eq!(table.code_of(GoalId(20)), Some(2));
        assert_eq!(table.code_of(GoalId(99)), None);
    }

    #[test]
    fn test_lookup_by_id() {
        let table = GoalTable::new(vec![goal(7, 1, "Health")]);
        assert_eq!(table.get(GoalId(7)).unwrap().name, "Health");
        assert!(table.get(GoalId(8)).is_none());
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }
}
