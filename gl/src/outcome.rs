//! End-of-day review: sections per goal plus a trailing misc section

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{DayReview, GoalId, GoalTable, Intention};
use crate::reorder::{Cursor, renumber};

/// Content prefix for unintended work added to the misc section
pub const MISC_PREFIX: &str = "&";

/// Intentions grouped under one goal, or under none for misc
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// None for the misc section
    pub goal: Option<GoalId>,
    /// Indices into the review's intention list, in list order
    pub entries: Vec<usize>,
    pub enough: bool,
    pub reflection: String,
}

impl Section {
    fn new(goal: Option<GoalId>) -> Self {
        Self {
            goal,
            entries: Vec::new(),
            enough: false,
            reflection: String::new(),
        }
    }

    pub fn is_misc(&self) -> bool {
        self.goal.is_none()
    }
}

/// Group intentions into one section per goal in display order, then misc
///
/// An intention lands in its goal's section once per reference to that goal.
/// Intentions without a goal in `goals` go to misc.
pub fn build_sections(goals: &GoalTable, intentions: &[Intention]) -> Vec<Section> {
    debug!(goals = goals.len(), intentions = intentions.len(), "build_sections: called");
    let mut sections: Vec<Section> = goals.goals().iter().map(|g| Section::new(Some(g.id))).collect();
    let mut misc = Section::new(None);

    for (index, intention) in intentions.iter().enumerate() {
        let mut placed = false;
        for goal in &intention.goals {
            if let Some(section) = goals.code_of(*goal).and_then(|code| sections.get_mut(code - 1)) {
                section.entries.push(index);
                placed = true;
            }
        }
        if !placed {
            misc.entries.push(index);
        }
    }

    sections.push(misc);
    sections
}

/// What keystrokes currently edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewFocus {
    Entries,
    Reflection,
    /// Typing an unintended intention for the current section
    Adding(String),
}

/// State of an in-progress end-of-day review
#[derive(Debug, Clone)]
pub struct OutcomeReview {
    day: NaiveDate,
    intentions: Vec<Intention>,
    sections: Vec<Section>,
    section: Cursor,
    entry: Cursor,
    focus: ReviewFocus,
}

impl OutcomeReview {
    pub fn new(day: NaiveDate, goals: &GoalTable, intentions: Vec<Intention>) -> Self {
        let sections = build_sections(goals, &intentions);
        Self {
            day,
            intentions,
            sections,
            section: Cursor::default(),
            entry: Cursor::default(),
            focus: ReviewFocus::Entries,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn intentions(&self) -> &[Intention] {
        &self.intentions
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_index(&self) -> usize {
        self.section.index()
    }

    pub fn entry_index(&self) -> usize {
        self.entry.index()
    }

    pub fn focus(&self) -> &ReviewFocus {
        &self.focus
    }

    pub fn is_editing(&self) -> bool {
        !matches!(self.focus, ReviewFocus::Entries)
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.sections.get(self.section.index())
    }

    pub fn current_intention(&self) -> Option<&Intention> {
        let section = self.current_section()?;
        let index = *section.entries.get(self.entry.index())?;
        self.intentions.get(index)
    }

    fn current_intention_mut(&mut self) -> Option<&mut Intention> {
        let section = self.sections.get(self.section.index())?;
        let index = *section.entries.get(self.entry.index())?;
        self.intentions.get_mut(index)
    }

    pub fn next_section(&mut self) {
        self.section.next(self.sections.len());
        self.entry.reset();
        self.focus = ReviewFocus::Entries;
    }

    pub fn prev_section(&mut self) {
        self.section.prev(self.sections.len());
        self.entry.reset();
        self.focus = ReviewFocus::Entries;
    }

    pub fn next_entry(&mut self) {
        let len = self.current_section().map_or(0, |s| s.entries.len());
        self.entry.next(len);
    }

    pub fn prev_entry(&mut self) {
        let len = self.current_section().map_or(0, |s| s.entries.len());
        self.entry.prev(len);
    }

    /// Toggle done on the focused entry; false when the section is empty
    pub fn toggle_done(&mut self) -> bool {
        match self.current_intention_mut() {
            Some(intention) => {
                intention.done = !intention.done;
                true
            }
            None => false,
        }
    }

    pub fn toggle_cancelled(&mut self) -> bool {
        match self.current_intention_mut() {
            Some(intention) => {
                intention.cancelled = !intention.cancelled;
                true
            }
            None => false,
        }
    }

    pub fn set_enough(&mut self, enough: bool) -> bool {
        match self.sections.get_mut(self.section.index()) {
            Some(section) => {
                section.enough = enough;
                true
            }
            None => false,
        }
    }

    /// Switch between the entry list and the reflection field
    pub fn toggle_reflection(&mut self) {
        self.focus = match self.focus {
            ReviewFocus::Reflection => ReviewFocus::Entries,
            _ => ReviewFocus::Reflection,
        };
    }

    pub fn start_adding(&mut self) {
        self.focus = ReviewFocus::Adding(String::new());
    }

    /// Return to the entry list, dropping any half-typed addition
    pub fn leave_field(&mut self) {
        self.focus = ReviewFocus::Entries;
    }

    pub fn push_char(&mut self, c: char) {
        let section = self.section.index();
        match &mut self.focus {
            ReviewFocus::Entries => {}
            ReviewFocus::Reflection => {
                if let Some(s) = self.sections.get_mut(section) {
                    s.reflection.push(c);
                }
            }
            ReviewFocus::Adding(buf) => buf.push(c),
        }
    }

    pub fn pop_char(&mut self) {
        let section = self.section.index();
        match &mut self.focus {
            ReviewFocus::Entries => {}
            ReviewFocus::Reflection => {
                if let Some(s) = self.sections.get_mut(section) {
                    s.reflection.pop();
                }
            }
            ReviewFocus::Adding(buf) => {
                buf.pop();
            }
        }
    }

    /// Code prefix shown in front of an unintended intention for the current section
    pub fn add_prefix(&self, goals: &GoalTable) -> String {
        match self.current_section().and_then(|s| s.goal) {
            Some(goal) => goals
                .code_of(goal)
                .map_or_else(|| MISC_PREFIX.to_string(), |code| code.to_string()),
            None => MISC_PREFIX.to_string(),
        }
    }

    /// Turn the typed addition into a done, unintended intention in the current section
    ///
    /// Returns false when nothing was typed.
    pub fn commit_unintended(&mut self, goals: &GoalTable) -> bool {
        let ReviewFocus::Adding(text) = std::mem::replace(&mut self.focus, ReviewFocus::Entries) else {
            return false;
        };
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let section_index = self.section.index();
        let Some(goal) = self.sections.get(section_index).map(|s| s.goal) else {
            return false;
        };

        let content = format!("{}) {}", self.add_prefix(goals), text);
        let mut intention = Intention::new(content, self.day).with_goals(goal.into_iter().collect());
        intention.done = true;
        intention.unintended = true;
        intention.position = self.intentions.len() as i64;
        debug!(content = %intention.content, "OutcomeReview::commit_unintended: added");

        let index = self.intentions.len();
        self.intentions.push(intention);
        if let Some(section) = self.sections.get_mut(section_index) {
            section.entries.push(index);
            self.entry.set(section.entries.len() - 1, section.entries.len());
        }
        true
    }

    /// Close out every intention and produce one review per section
    pub fn submission(&mut self) -> (Vec<Intention>, Vec<DayReview>) {
        for intention in &mut self.intentions {
            intention.outcome = true;
        }
        renumber(&mut self.intentions);
        let reviews = self
            .sections
            .iter()
            .map(|s| DayReview {
                date: self.day,
                goal: s.goal,
                enough: s.enough,
                reflection: s.reflection.trim().to_string(),
            })
            .collect();
        (self.intentions.clone(), reviews)
    }

    /// Adopt store-assigned ids after the intentions were written
    pub fn absorb_saved(&mut self, saved: Vec<Intention>) {
        if saved.len() == self.intentions.len() {
            self.intentions = saved;
        }
    }
}
