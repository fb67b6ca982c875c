//! TUI application - key handling
//!
//! The App owns the [`Workflow`] and translates key presses into workflow
//! messages. Store commands the workflow asks for are queued for the runner.
//! It does not do any rendering - that's delegated to the views module.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, trace};

use crate::workflow::{Command, Msg, Page, Workflow};

/// What a key press asks for
#[derive(Debug)]
enum KeyAction {
    Quit,
    ToggleHelp,
    Send(Msg),
    Ignore,
}

/// TUI application
#[derive(Debug)]
pub struct App {
    workflow: Workflow,
    show_help: bool,
    outbox: Vec<Command>,
}

impl App {
    pub fn new(workflow: Workflow) -> Self {
        debug!("App::new: called");
        Self {
            workflow,
            show_help: false,
            outbox: Vec::new(),
        }
    }

    /// Kick off the workflow's initial loads
    pub fn start(&mut self) {
        let commands = self.workflow.init();
        self.outbox.extend(commands);
    }

    pub fn workflow(&self) -> &Workflow {
        trace!("App::workflow: called");
        &self.workflow
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Commands produced since the last call
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    /// Feed a store completion into the workflow
    pub fn handle_msg(&mut self, msg: Msg) {
        let commands = self.workflow.update(msg);
        self.outbox.extend(commands);
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_key: called");
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        if self.show_help {
            self.show_help = false;
            return false;
        }

        match map_key(&self.workflow, key) {
            KeyAction::Quit => true,
            KeyAction::ToggleHelp => {
                self.show_help = true;
                false
            }
            KeyAction::Send(msg) => {
                let commands = self.workflow.update(msg);
                self.outbox.extend(commands);
                false
            }
            KeyAction::Ignore => false,
        }
    }
}

fn map_key(workflow: &Workflow, key: KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if workflow.is_editing_text() {
        return map_text_key(key, ctrl);
    }
    let send = KeyAction::Send;

    match (workflow.page(), key.code) {
        (_, KeyCode::Char('q')) => KeyAction::Quit,
        (Page::Loading, _) => KeyAction::Ignore,
        (_, KeyCode::Char('?')) => KeyAction::ToggleHelp,

        (Page::Today, KeyCode::Char('d')) if ctrl => send(Msg::EndDay),
        (Page::Today, KeyCode::Char('e')) => send(Msg::EndDay),
        (Page::Today, KeyCode::Char('j') | KeyCode::Down) => send(Msg::Down),
        (Page::Today, KeyCode::Char('k') | KeyCode::Up) => send(Msg::Up),
        (Page::Today, KeyCode::Char('J')) => send(Msg::MoveDown),
        (Page::Today, KeyCode::Char('K')) => send(Msg::MoveUp),
        (Page::Today, KeyCode::Char(' ') | KeyCode::Enter) => send(Msg::ToggleDone),
        (Page::Today, KeyCode::Char('c')) => send(Msg::ToggleCancelled),
        (Page::Today, KeyCode::Char('p')) => send(Msg::PomoIncrement),
        (Page::Today, KeyCode::Char('P')) => send(Msg::PomoDecrement),
        (Page::Today, KeyCode::Char('a')) => send(Msg::Add),
        (Page::Today, KeyCode::Char('r')) => send(Msg::Sync),

        (Page::Outcomes, KeyCode::Char('d')) if ctrl => send(Msg::Submit),
        (Page::Outcomes, KeyCode::Char('h') | KeyCode::Left) => send(Msg::PrevSection),
        (Page::Outcomes, KeyCode::Char('l') | KeyCode::Right) => send(Msg::NextSection),
        (Page::Outcomes, KeyCode::Char('j') | KeyCode::Down) => send(Msg::Down),
        (Page::Outcomes, KeyCode::Char('k') | KeyCode::Up) => send(Msg::Up),
        (Page::Outcomes, KeyCode::Char('y')) => send(Msg::SetEnough(true)),
        (Page::Outcomes, KeyCode::Char('n')) => send(Msg::SetEnough(false)),
        (Page::Outcomes, KeyCode::Char(' ')) => send(Msg::ToggleDone),
        (Page::Outcomes, KeyCode::Char('c')) => send(Msg::ToggleCancelled),
        (Page::Outcomes, KeyCode::Char('a')) => send(Msg::Add),
        (Page::Outcomes, KeyCode::Tab | KeyCode::BackTab) => send(Msg::FocusReflection),
        (Page::Outcomes, KeyCode::Enter) => send(Msg::Newline),
        (Page::Outcomes, KeyCode::Esc) => send(Msg::Cancel),

        _ => KeyAction::Ignore,
    }
}

/// Keys while a text field (draft, reflection, unintended prompt) has focus
fn map_text_key(key: KeyEvent, ctrl: bool) -> KeyAction {
    match key.code {
        KeyCode::Char('d') if ctrl => KeyAction::Send(Msg::Submit),
        KeyCode::Char(_) if ctrl => KeyAction::Ignore,
        KeyCode::Char(c) => KeyAction::Send(Msg::Char(c)),
        KeyCode::Enter => KeyAction::Send(Msg::Newline),
        KeyCode::Backspace => KeyAction::Send(Msg::Backspace),
        KeyCode::Esc => KeyAction::Send(Msg::Cancel),
        KeyCode::Tab | KeyCode::BackTab => KeyAction::Send(Msg::FocusReflection),
        _ => KeyAction::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Intention, IntentionId};
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::from(KeyCode::Char(c))
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// App past its initial loads with `intentions` for the day
    fn app_with(intentions: Vec<Intention>) -> App {
        let mut app = App::new(Workflow::new(day()));
        app.start();
        app.take_commands();
        app.handle_msg(Msg::GoalsLoaded(Ok(vec![])));
        app.handle_msg(Msg::DayLoaded {
            day: day(),
            result: Ok(intentions),
        });
        app
    }

    fn one_open() -> Vec<Intention> {
        let mut i = Intention::new("-) write", day());
        i.id = Some(IntentionId(1));
        vec![i]
    }

    #[test]
    fn test_start_queues_initial_loads() {
        let mut app = App::new(Workflow::new(day()));
        app.start();
        assert_eq!(app.take_commands().len(), 2);
        assert!(app.take_commands().is_empty());
    }

    #[test]
    fn test_app_quit_key() {
        let mut app = app_with(one_open());
        assert!(app.handle_key(ctrl('c')));
        assert!(app.handle_key(key('q')));
    }

    #[test]
    fn test_q_is_text_on_input_page() {
        let mut app = app_with(vec![]);
        assert_eq!(app.workflow().page(), Page::Input);
        assert!(!app.handle_key(key('q')));
        assert_eq!(app.workflow().draft(), "q");
    }

    #[test]
    fn test_app_help_toggle() {
        let mut app = app_with(one_open());
        app.handle_key(key('?'));
        assert!(app.show_help());
        // any key closes help without acting
        app.handle_key(key(' '));
        assert!(!app.show_help());
        assert!(!app.workflow().intentions()[0].done);
    }

    #[test]
    fn test_today_space_toggles_and_queues_save() {
        let mut app = app_with(one_open());
        app.handle_key(key(' '));
        assert!(app.workflow().intentions()[0].done);
        assert!(matches!(app.take_commands().as_slice(), [Command::SaveIntentions(_)]));
    }

    #[test]
    fn test_input_typing_and_submit() {
        let mut app = app_with(vec![]);
        for c in "-) read".chars() {
            app.handle_key(key(c));
        }
        app.handle_key(ctrl('d'));
        assert_eq!(app.workflow().page(), Page::Loading);
        assert!(matches!(app.take_commands().as_slice(), [Command::SaveIntentions(list)] if list.len() == 1));
    }

    #[test]
    fn test_end_day_then_verdict_keys() {
        let mut app = app_with(one_open());
        app.handle_key(key('e'));
        assert_eq!(app.workflow().page(), Page::Outcomes);
        app.handle_key(key('y'));
        let review = app.workflow().review().unwrap();
        assert!(review.sections()[0].enough);

        // tab moves into the reflection, where 'n' is just a letter
        app.handle_key(KeyEvent::from(KeyCode::Tab));
        app.handle_key(key('n'));
        let review = app.workflow().review().unwrap();
        assert!(review.sections()[0].enough);
        assert_eq!(review.sections()[0].reflection, "n");
    }

    #[test]
    fn test_loading_ignores_keys() {
        let mut app = App::new(Workflow::new(day()));
        app.start();
        app.take_commands();
        assert!(!app.handle_key(key('j')));
        assert!(app.take_commands().is_empty());
    }
}
