//! Workflow state machine

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{GoalFilter, GoalTable, Intention};
use crate::outcome::{OutcomeReview, ReviewFocus};
use crate::parser::parse_intentions;
use crate::reorder::{Cursor, move_down, move_up};
use crate::state::StateError;

use super::messages::{Command, Msg, Page, Status};
use super::{WorkflowError, merge_intentions};

/// Store write currently awaiting completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inflight {
    Idle,
    /// Draft submission; the day is reloaded once it lands
    Submit,
    /// Edit on the Today page; `resave` when more edits were made meanwhile
    Edit { resave: bool },
    /// Review submission: intentions and reviews, completing in any order
    Review { remaining: u8, failed: bool },
}

/// Controller for one user's day
#[derive(Debug)]
pub struct Workflow {
    page: Page,
    /// Page to return to when the operation behind Loading fails
    resume: Page,
    /// Page to show once pending loads finish
    landing: Page,
    loads_pending: u8,
    inflight: Inflight,
    day: NaiveDate,
    goals: GoalTable,
    intentions: Vec<Intention>,
    cursor: Cursor,
    draft: String,
    review: Option<OutcomeReview>,
    status: Option<Status>,
}

impl Workflow {
    /// Workflow for `day`; call [`Workflow::init`] to start loading
    pub fn new(day: NaiveDate) -> Self {
        Self {
            page: Page::Loading,
            resume: Page::Input,
            landing: Page::Input,
            loads_pending: 0,
            inflight: Inflight::Idle,
            day,
            goals: GoalTable::default(),
            intentions: Vec::new(),
            cursor: Cursor::default(),
            draft: String::new(),
            review: None,
            status: None,
        }
    }

    /// Initial loads: goals and the working day's intentions
    pub fn init(&mut self) -> Vec<Command> {
        debug!(day = %self.day, "Workflow::init: called");
        self.start_loads(Page::Input)
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn goals(&self) -> &GoalTable {
        &self.goals
    }

    pub fn intentions(&self) -> &[Intention] {
        &self.intentions
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn review(&self) -> Option<&OutcomeReview> {
        self.review.as_ref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// True while keystrokes go into a text field
    pub fn is_editing_text(&self) -> bool {
        match self.page {
            Page::Input => true,
            Page::Outcomes => self.review.as_ref().is_some_and(|r| r.is_editing()),
            Page::Loading | Page::Today => false,
        }
    }

    /// (done, total) over intentions that are not cancelled
    pub fn progress(&self) -> (usize, usize) {
        let live = self.intentions.iter().filter(|i| !i.cancelled);
        let total = live.clone().count();
        let done = live.filter(|i| i.done).count();
        (done, total)
    }

    /// Apply one message, returning the store work it requires
    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        debug!(page = ?self.page, ?msg, "Workflow::update: called");
        match msg {
            Msg::GoalsLoaded(result) => self.on_goals_loaded(result),
            Msg::DayLoaded { day, result } => self.on_day_loaded(day, result),
            Msg::IntentionsSaved(result) => self.on_intentions_saved(result),
            Msg::ReviewsSaved(result) => self.on_reviews_saved(result),
            action => self.on_action(action),
        }
    }

    // =========================================================================
    // Store completions
    // =========================================================================

    fn on_goals_loaded(&mut self, result: Result<Vec<crate::domain::Goal>, StateError>) -> Vec<Command> {
        match result {
            Ok(goals) => {
                debug!(count = goals.len(), "Workflow::on_goals_loaded: ok");
                self.goals = GoalTable::new(goals);
            }
            Err(e) => self.set_error(format!("Failed to load goals: {e}")),
        }
        self.load_finished();
        Vec::new()
    }

    fn on_day_loaded(&mut self, day: NaiveDate, result: Result<Vec<Intention>, StateError>) -> Vec<Command> {
        if day != self.day {
            debug!(%day, current = %self.day, "Workflow::on_day_loaded: stale day, ignoring data");
            self.load_finished();
            return Vec::new();
        }

        let mut commands = Vec::new();
        match result {
            Ok(intentions) if intentions.iter().any(|i| i.outcome) => {
                let next = day.succ_opt().unwrap_or(day);
                info!(%day, %next, "Day already reviewed, advancing");
                self.day = next;
                self.intentions.clear();
                self.cursor.reset();
                self.landing = Page::Input;
                self.status = Some(Status::info(format!("{day} is reviewed, planning {next}")));
                // the next day may already hold intentions
                self.loads_pending += 1;
                commands.push(Command::LoadDay(next));
            }
            Ok(intentions) => {
                debug!(count = intentions.len(), "Workflow::on_day_loaded: ok");
                self.landing = if intentions.is_empty() { Page::Input } else { Page::Today };
                self.intentions = intentions;
                self.cursor.renormalize(self.intentions.len());
            }
            Err(e) => {
                self.set_error(format!("Failed to load {day}: {e}"));
                self.landing = if self.intentions.is_empty() { Page::Input } else { Page::Today };
            }
        }
        self.load_finished();
        commands
    }

    fn on_intentions_saved(&mut self, result: Result<Vec<Intention>, StateError>) -> Vec<Command> {
        match (self.inflight, result) {
            (Inflight::Submit, Ok(saved)) => {
                debug!(count = saved.len(), "Workflow::on_intentions_saved: submission stored");
                self.inflight = Inflight::Idle;
                self.intentions = saved;
                self.draft.clear();
                self.reload_day()
            }
            (Inflight::Submit, Err(e)) => {
                self.inflight = Inflight::Idle;
                self.set_error(format!("Failed to save intentions: {e}"));
                self.page = self.resume;
                Vec::new()
            }
            (Inflight::Edit { resave }, result) => {
                if let Err(e) = result {
                    self.set_error(format!("Failed to save change: {e}"));
                }
                if resave {
                    self.inflight = Inflight::Edit { resave: false };
                    vec![Command::SaveIntentions(self.intentions.clone())]
                } else {
                    self.inflight = Inflight::Idle;
                    Vec::new()
                }
            }
            (Inflight::Review { remaining, mut failed }, result) => {
                match result {
                    Ok(saved) => {
                        if let Some(review) = self.review.as_mut() {
                            review.absorb_saved(saved);
                        }
                    }
                    Err(e) => {
                        failed = true;
                        self.set_error(format!("Failed to save reviewed intentions: {e}"));
                    }
                }
                self.review_write_done(remaining.saturating_sub(1), failed)
            }
            (Inflight::Idle, _) => {
                warn!("IntentionsSaved with no write in flight");
                Vec::new()
            }
        }
    }

    fn on_reviews_saved(&mut self, result: Result<(), StateError>) -> Vec<Command> {
        let Inflight::Review { remaining, mut failed } = self.inflight else {
            warn!("ReviewsSaved with no review in flight");
            return Vec::new();
        };
        if let Err(e) = result {
            failed = true;
            self.set_error(format!("Failed to save day review: {e}"));
        }
        self.review_write_done(remaining.saturating_sub(1), failed)
    }

    fn review_write_done(&mut self, remaining: u8, failed: bool) -> Vec<Command> {
        if remaining > 0 {
            self.inflight = Inflight::Review { remaining, failed };
            return Vec::new();
        }
        self.inflight = Inflight::Idle;
        if failed {
            self.page = self.resume;
            return Vec::new();
        }
        info!(day = %self.day, "Day review stored");
        if let Some(review) = self.review.take() {
            self.intentions = review.intentions().to_vec();
        }
        self.reload_day()
    }

    // =========================================================================
    // User actions
    // =========================================================================

    fn on_action(&mut self, msg: Msg) -> Vec<Command> {
        if self.page == Page::Loading {
            debug!(?msg, "Workflow::on_action: loading, ignoring");
            return Vec::new();
        }
        self.status = None;
        match self.page {
            Page::Input => self.input_action(msg),
            Page::Today => self.today_action(msg),
            Page::Outcomes => self.outcomes_action(msg),
            Page::Loading => Vec::new(),
        }
    }

    fn input_action(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::Char(c) => self.draft.push(c),
            Msg::Newline => self.draft.push('\n'),
            Msg::Backspace => {
                self.draft.pop();
            }
            Msg::Cancel if !self.intentions.is_empty() => self.page = Page::Today,
            Msg::Submit => return self.submit_draft(),
            Msg::Sync => return self.sync(),
            _ => {}
        }
        Vec::new()
    }

    fn submit_draft(&mut self) -> Vec<Command> {
        if self.inflight != Inflight::Idle {
            self.status = Some(Status::info("Still saving, try again in a moment"));
            return Vec::new();
        }
        match parse_intentions(&self.goals, &self.draft, self.day) {
            Ok(parsed) => {
                info!(count = parsed.len(), day = %self.day, "Submitting intentions");
                let merged = merge_intentions(&self.intentions, parsed, self.day);
                self.inflight = Inflight::Submit;
                self.enter_loading(Page::Input);
                vec![Command::SaveIntentions(merged)]
            }
            Err(e) => {
                debug!(error = %e, "Workflow::submit_draft: parse failed");
                self.set_error(e.to_string());
                Vec::new()
            }
        }
    }

    fn today_action(&mut self, msg: Msg) -> Vec<Command> {
        let len = self.intentions.len();
        let index = self.cursor.index();
        match msg {
            Msg::Up => self.cursor.prev(len),
            Msg::Down => self.cursor.next(len),
            Msg::MoveUp => {
                if move_up(&mut self.intentions, index) {
                    self.cursor.set(index - 1, len);
                    return self.save_edit();
                }
            }
            Msg::MoveDown => {
                if move_down(&mut self.intentions, index) {
                    self.cursor.set(index + 1, len);
                    return self.save_edit();
                }
            }
            Msg::ToggleDone => return self.edit_current(|i| i.done = !i.done),
            Msg::ToggleCancelled => return self.edit_current(|i| i.cancelled = !i.cancelled),
            Msg::PomoIncrement => return self.edit_current(|i| i.pomos += 1),
            Msg::PomoDecrement => return self.edit_current(|i| i.pomos = (i.pomos - 1).max(0)),
            Msg::Add => {
                self.draft.clear();
                self.page = Page::Input;
            }
            Msg::EndDay => self.open_review(),
            Msg::Sync => return self.sync(),
            _ => {}
        }
        Vec::new()
    }

    fn edit_current(&mut self, edit: impl FnOnce(&mut Intention)) -> Vec<Command> {
        match self.intentions.get_mut(self.cursor.index()) {
            Some(intention) => {
                edit(intention);
                self.save_edit()
            }
            None => Vec::new(),
        }
    }

    /// Persist the working list, keeping at most one write in flight
    fn save_edit(&mut self) -> Vec<Command> {
        match self.inflight {
            Inflight::Idle => {
                self.inflight = Inflight::Edit { resave: false };
                vec![Command::SaveIntentions(self.intentions.clone())]
            }
            Inflight::Edit { .. } => {
                self.inflight = Inflight::Edit { resave: true };
                Vec::new()
            }
            Inflight::Submit | Inflight::Review { .. } => Vec::new(),
        }
    }

    fn open_review(&mut self) {
        if self.intentions.is_empty() {
            self.status = Some(Status::info("Nothing to review yet"));
            return;
        }
        info!(day = %self.day, "Opening end-of-day review");
        self.review = Some(OutcomeReview::new(self.day, &self.goals, self.intentions.clone()));
        self.page = Page::Outcomes;
    }

    fn outcomes_action(&mut self, msg: Msg) -> Vec<Command> {
        let Some(review) = self.review.as_mut() else {
            return self.missing_review();
        };
        let adding = matches!(review.focus(), ReviewFocus::Adding(_));
        let reflecting = matches!(review.focus(), ReviewFocus::Reflection);

        match msg {
            Msg::Submit => return self.submit_review(),
            Msg::Cancel if !adding && !reflecting => {
                self.review = None;
                self.page = Page::Today;
            }
            Msg::Cancel => review.leave_field(),
            Msg::Char(c) if adding || reflecting => review.push_char(c),
            Msg::Backspace if adding || reflecting => review.pop_char(),
            Msg::Newline if adding => {
                review.commit_unintended(&self.goals);
            }
            Msg::Newline => review.next_section(),
            Msg::FocusReflection => review.toggle_reflection(),
            _ if adding || reflecting => {}
            Msg::Up => review.prev_entry(),
            Msg::Down => review.next_entry(),
            Msg::PrevSection => review.prev_section(),
            Msg::NextSection => review.next_section(),
            Msg::ToggleDone => {
                review.toggle_done();
            }
            Msg::ToggleCancelled => {
                review.toggle_cancelled();
            }
            Msg::SetEnough(enough) => {
                review.set_enough(enough);
            }
            Msg::Add => review.start_adding(),
            _ => {}
        }
        Vec::new()
    }

    fn submit_review(&mut self) -> Vec<Command> {
        if self.inflight != Inflight::Idle {
            self.status = Some(Status::info("Still saving, try again in a moment"));
            return Vec::new();
        }
        let Some(review) = self.review.as_mut() else {
            return self.missing_review();
        };
        if matches!(review.focus(), ReviewFocus::Adding(_)) {
            review.commit_unintended(&self.goals);
        } else {
            review.leave_field();
        }
        let (intentions, reviews) = review.submission();
        info!(
            day = %self.day,
            intentions = intentions.len(),
            reviews = reviews.len(),
            "Submitting day review"
        );
        self.inflight = Inflight::Review {
            remaining: 2,
            failed: false,
        };
        self.enter_loading(Page::Outcomes);
        vec![Command::SaveIntentions(intentions), Command::SaveReviews(reviews)]
    }

    fn missing_review(&mut self) -> Vec<Command> {
        let err = WorkflowError::Internal("review page opened without review state".to_string());
        warn!(error = %err, "Workflow: recovering to Today");
        self.set_error(err.to_string());
        self.page = Page::Today;
        Vec::new()
    }

    // =========================================================================
    // Loading helpers
    // =========================================================================

    fn sync(&mut self) -> Vec<Command> {
        if self.inflight != Inflight::Idle {
            self.status = Some(Status::info("Still saving, try again in a moment"));
            return Vec::new();
        }
        let back = self.page;
        self.start_loads(back)
    }

    fn start_loads(&mut self, resume: Page) -> Vec<Command> {
        self.loads_pending = 2;
        self.landing = resume;
        self.enter_loading(resume);
        vec![Command::LoadGoals(GoalFilter::Active), Command::LoadDay(self.day)]
    }

    /// Reload the day after a write has landed
    fn reload_day(&mut self) -> Vec<Command> {
        self.loads_pending = 1;
        self.page = Page::Loading;
        vec![Command::LoadDay(self.day)]
    }

    fn enter_loading(&mut self, resume: Page) {
        self.resume = resume;
        self.page = Page::Loading;
    }

    fn load_finished(&mut self) {
        self.loads_pending = self.loads_pending.saturating_sub(1);
        if self.loads_pending == 0 && self.page == Page::Loading {
            debug!(landing = ?self.landing, "Workflow::load_finished: leaving Loading");
            self.page = self.landing;
        }
    }

    fn set_error(&mut self, text: String) {
        warn!(%text, "Workflow error");
        self.status = Some(Status::error(text));
    }
}
