//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module draws the UI
//! from the App and its Workflow, but never modifies state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::trace;

use crate::domain::{GoalTable, Intention};
use crate::outcome::{OutcomeReview, ReviewFocus, Section};
use crate::workflow::{Page, StatusLevel, Workflow};

use super::app::App;

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const DONE: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const OPEN: Color = Color::Rgb(255, 215, 0); // Gold
    pub const ERROR: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const INFO: Color = Color::Rgb(100, 149, 237); // Cornflower blue
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const DIM: Color = Color::DarkGray;
}

/// Main render function
pub fn render(app: &App, frame: &mut Frame) {
    let workflow = app.workflow();
    trace!(page = ?workflow.page(), "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(workflow, frame, chunks[0]);

    match workflow.page() {
        Page::Input => render_input(workflow, frame, chunks[1]),
        Page::Loading => render_loading(frame, chunks[1]),
        Page::Today => render_today(workflow, frame, chunks[1]),
        Page::Outcomes => match workflow.review() {
            Some(review) => render_outcomes(workflow.goals(), review, frame, chunks[1]),
            None => render_loading(frame, chunks[1]),
        },
    }

    render_footer(workflow, frame, chunks[2]);

    if app.show_help() {
        render_help_overlay(frame, frame.area());
    }
}

fn page_title(page: Page) -> &'static str {
    match page {
        Page::Input => "Plan",
        Page::Loading => "Loading",
        Page::Today => "Today",
        Page::Outcomes => "Review",
    }
}

fn render_header(workflow: &Workflow, frame: &mut Frame, area: Rect) {
    let spans = vec![
        Span::styled(" Goalie", Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        Span::styled(page_title(workflow.page()), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" · ", Style::default().fg(colors::DIM)),
        Span::raw(workflow.day().format("%A, %B %-d %Y").to_string()),
    ];
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Color configured for a goal, if it parses
fn goal_color(goals: &GoalTable, code: usize) -> Color {
    goals
        .by_code(code as i64)
        .and_then(|g| g.color.parse::<Color>().ok())
        .unwrap_or(Color::Magenta)
}

/// Goal tags for an intention, e.g. `[1 Health] [3 Writing]`
fn goal_tags(goals: &GoalTable, intention: &Intention) -> Vec<Span<'static>> {
    intention
        .goals
        .iter()
        .filter_map(|id| Some((goals.code_of(*id)?, goals.get(*id)?)))
        .flat_map(|(code, goal)| {
            [
                Span::raw(" "),
                Span::styled(
                    format!("[{code} {}]", goal.name),
                    Style::default().fg(goal_color(goals, code)),
                ),
            ]
        })
        .collect()
}

fn check_marker(intention: &Intention) -> Span<'static> {
    if intention.cancelled {
        Span::styled("[-]", Style::default().fg(colors::DIM))
    } else if intention.done {
        Span::styled("[x]", Style::default().fg(colors::DONE))
    } else {
        Span::styled("[ ]", Style::default().fg(colors::OPEN))
    }
}

fn intention_line(goals: &GoalTable, intention: &Intention, selected: bool) -> Line<'static> {
    let mut content_style = Style::default();
    if intention.cancelled {
        content_style = content_style.fg(colors::DIM).add_modifier(Modifier::CROSSED_OUT);
    }
    let mut spans = vec![
        Span::raw(if selected { "> " } else { "  " }),
        check_marker(intention),
        Span::raw(" "),
        Span::styled(intention.content.clone(), content_style),
    ];
    spans.extend(goal_tags(goals, intention));
    if intention.pomos > 0 {
        spans.push(Span::styled(
            format!("  {} pomo{}", intention.pomos, if intention.pomos == 1 { "" } else { "s" }),
            Style::default().fg(colors::INFO),
        ));
    }
    if intention.unintended {
        spans.push(Span::styled("  (unplanned)", Style::default().fg(colors::DIM)));
    }

    let line = Line::from(spans);
    if selected {
        line.style(Style::default().bg(colors::SELECTED_BG))
    } else {
        line
    }
}

fn render_input(workflow: &Workflow, frame: &mut Frame, area: Rect) {
    let goals = workflow.goals();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(goals.len() as u16 + 3), Constraint::Min(0)])
        .split(area);

    let mut legend: Vec<Line> = goals
        .goals()
        .iter()
        .enumerate()
        .map(|(n, goal)| {
            let code = n + 1;
            Line::from(vec![
                Span::styled(format!(" {code}) "), Style::default().fg(goal_color(goals, code))),
                Span::raw(goal.name.clone()),
                Span::styled(
                    if goal.description.is_empty() {
                        String::new()
                    } else {
                        format!("  {}", goal.description)
                    },
                    Style::default().fg(colors::DIM),
                ),
            ])
        })
        .collect();
    legend.push(Line::from(Span::styled(
        " -) no goal",
        Style::default().fg(colors::DIM),
    )));
    let legend = Paragraph::new(legend).block(Block::default().borders(Borders::ALL).title(" Goals "));
    frame.render_widget(legend, chunks[0]);

    let mut lines: Vec<Line> = workflow.draft().split('\n').map(|l| Line::from(l.to_string())).collect();
    if let Some(last) = lines.last_mut() {
        last.push_span(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
    }
    let draft = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" What do you intend to do today? "));
    frame.render_widget(draft, chunks[1]);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new(Line::from(Span::styled(" Loading...", Style::default().fg(colors::DIM))))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, area);
}

fn render_today(workflow: &Workflow, frame: &mut Frame, area: Rect) {
    let goals = workflow.goals();
    let intentions = workflow.intentions();
    let (done, total) = workflow.progress();
    let title = format!(
        " {} intention{} for today, {done}/{total} done ",
        intentions.len(),
        if intentions.len() == 1 { "" } else { "s" }
    );

    let lines: Vec<Line> = intentions
        .iter()
        .enumerate()
        .map(|(n, i)| intention_line(goals, i, n == workflow.cursor()))
        .collect();
    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn section_title(goals: &GoalTable, section: &Section) -> String {
    match section.goal {
        Some(id) => match (goals.code_of(id), goals.get(id)) {
            (Some(code), Some(goal)) => format!("{code}) {}", goal.name),
            _ => format!("goal {id}"),
        },
        None => "Misc".to_string(),
    }
}

fn render_outcomes(goals: &GoalTable, review: &OutcomeReview, frame: &mut Frame, area: Rect) {
    let sections = review.sections();
    let current = review.section_index();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(5)])
        .split(area);

    // Section tabs
    let mut tabs = vec![Span::styled(
        format!(" Page {}/{} to review │ ", current + 1, sections.len()),
        Style::default().fg(colors::DIM),
    )];
    for (n, section) in sections.iter().enumerate() {
        if n > 0 {
            tabs.push(Span::styled(" · ", Style::default().fg(colors::DIM)));
        }
        let style = if n == current {
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors::DIM)
        };
        tabs.push(Span::styled(section_title(goals, section), style));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs)), chunks[0]);

    let Some(section) = review.current_section() else {
        return;
    };
    let entries_focused = *review.focus() == ReviewFocus::Entries;

    // Entries
    let mut lines: Vec<Line> = section
        .entries
        .iter()
        .enumerate()
        .filter_map(|(n, index)| {
            let intention = review.intentions().get(*index)?;
            Some(intention_line(goals, intention, entries_focused && n == review.entry_index()))
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Nothing planned here",
            Style::default().fg(colors::DIM),
        )));
    }
    if let ReviewFocus::Adding(text) = review.focus() {
        lines.push(Line::from(vec![
            Span::styled("  [+] ", Style::default().fg(colors::KEYBIND)),
            Span::raw(format!("{}) {text}", review.add_prefix(goals))),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]));
    }
    let enough = if section.enough {
        Span::styled("enough: yes", Style::default().fg(colors::DONE))
    } else {
        Span::styled("enough: no", Style::default().fg(colors::OPEN))
    };
    let title = Line::from(vec![
        Span::raw(format!(" {} │ ", section_title(goals, section))),
        enough,
        Span::raw(" "),
    ]);
    let entries = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(entries, chunks[1]);

    // Reflection
    let reflecting = *review.focus() == ReviewFocus::Reflection;
    let mut reflection = Line::from(section.reflection.clone());
    if reflecting {
        reflection.push_span(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
    }
    let border = if reflecting {
        Style::default().fg(colors::KEYBIND)
    } else {
        Style::default()
    };
    let reflection = Paragraph::new(reflection).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Reflection "),
    );
    frame.render_widget(reflection, chunks[2]);
}

fn key_hints(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, desc) in pairs {
        spans.push(Span::styled(format!(" {key}"), Style::default().fg(colors::KEYBIND)));
        spans.push(Span::raw(format!(" {desc} ")));
    }
    Line::from(spans)
}

fn render_footer(workflow: &Workflow, frame: &mut Frame, area: Rect) {
    let content = match workflow.status() {
        Some(status) => {
            let (label, color) = match status.level {
                StatusLevel::Error => ("Error: ", colors::ERROR),
                StatusLevel::Info => ("", colors::INFO),
            };
            Line::from(Span::styled(format!(" {label}{}", status.text), Style::default().fg(color)))
        }
        None => match workflow.page() {
            Page::Input => key_hints(&[("^D", "submit"), ("Esc", "back"), ("^C", "quit")]),
            Page::Loading => key_hints(&[("q", "quit")]),
            Page::Today => key_hints(&[
                ("j/k", "move"),
                ("Space", "done"),
                ("c", "cancel"),
                ("p/P", "pomo"),
                ("a", "add"),
                ("e", "end day"),
                ("?", "help"),
            ]),
            Page::Outcomes if workflow.is_editing_text() => {
                key_hints(&[("Enter", "confirm"), ("Esc", "leave field"), ("^D", "submit")])
            }
            Page::Outcomes => key_hints(&[
                ("h/l", "section"),
                ("y/n", "enough"),
                ("Space", "done"),
                ("a", "add"),
                ("Tab", "reflect"),
                ("^D", "submit"),
                ("?", "help"),
            ]),
        },
    };
    let footer = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn key_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<10}"), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    trace!("render_help_overlay: called");
    let popup_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, popup_area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )),
        Line::from(""),
        Line::from(Span::styled("Plan", bold)),
        key_line("1,2) text", "Intention for goals 1 and 2; -) for none"),
        key_line("Ctrl+D", "Submit intentions"),
        key_line("Esc", "Back to today"),
        Line::from(""),
        Line::from(Span::styled("Today", bold)),
        key_line("j/k", "Move cursor"),
        key_line("J/K", "Move intention down/up"),
        key_line("Space", "Toggle done"),
        key_line("c", "Toggle cancelled"),
        key_line("p/P", "Add/remove pomodoro"),
        key_line("a", "Add intentions"),
        key_line("e", "End the day"),
        key_line("r", "Reload from disk"),
        Line::from(""),
        Line::from(Span::styled("Review", bold)),
        key_line("h/l", "Previous/next goal"),
        key_line("y/n", "Enough done for this goal"),
        key_line("a", "Add something you did unplanned"),
        key_line("Tab", "Write a reflection"),
        key_line("Ctrl+D", "Submit the review"),
        Line::from(""),
        key_line("q", "Quit"),
        key_line("?", "Toggle help"),
    ];

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(colors::HEADER)),
    );
    frame.render_widget(help, popup_area);
}

/// Create a centered rect using percentage of the available area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    trace!(percent_x, percent_y, "centered_rect: called");
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Goal, GoalId, IntentionId};
    use crate::workflow::Msg;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn goal(id: i64, name: &str) -> Goal {
        Goal {
            id: GoalId(id),
            name: name.to_string(),
            description: String::new(),
            number: id,
            color: "green".to_string(),
            archived: false,
            created_at: 0,
        }
    }

    fn app_with(goals: Vec<Goal>, intentions: Vec<Intention>) -> App {
        let mut app = App::new(Workflow::new(day()));
        app.start();
        app.take_commands();
        app.handle_msg(Msg::GoalsLoaded(Ok(goals)));
        app.handle_msg(Msg::DayLoaded {
            day: day(),
            result: Ok(intentions),
        });
        app
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn run_intention() -> Intention {
        let mut i = Intention::new("1) run", day()).with_goals(vec![GoalId(1)]);
        i.id = Some(IntentionId(1));
        i.pomos = 2;
        i
    }

    #[test]
    fn test_header_shows_day() {
        let screen = draw(&app_with(vec![], vec![]));
        assert!(screen.contains("Saturday, March 14 2026"));
        assert!(screen.contains("Plan"));
    }

    #[test]
    fn test_input_page_lists_goal_codes() {
        let screen = draw(&app_with(vec![goal(1, "Health"), goal(2, "Writing")], vec![]));
        assert!(screen.contains("1) Health"));
        assert!(screen.contains("2) Writing"));
    }

    #[test]
    fn test_today_page_shows_progress_and_tags() {
        let screen = draw(&app_with(vec![goal(1, "Health")], vec![run_intention()]));
        assert!(screen.contains("1 intention for today, 0/1 done"));
        assert!(screen.contains("[ ] 1) run"));
        assert!(screen.contains("[1 Health]"));
        assert!(screen.contains("2 pomos"));
    }

    #[test]
    fn test_outcomes_page_shows_sections() {
        let mut app = app_with(vec![goal(1, "Health")], vec![run_intention()]);
        app.handle_key(KeyEvent::from(KeyCode::Char('e')));
        app.handle_key(KeyEvent::from(KeyCode::Char('a')));
        app.handle_key(KeyEvent::from(KeyCode::Char('x')));
        let screen = draw(&app);
        assert!(screen.contains("Page 1/2 to review"));
        assert!(screen.contains("Misc"));
        assert!(screen.contains("[+] 1) x"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app_with(vec![], vec![run_intention()]);
        app.handle_key(KeyEvent::from(KeyCode::Char('?')));
        let screen = draw(&app);
        assert!(screen.contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_error_status_in_footer() {
        let mut app = app_with(vec![], vec![]);
        app.handle_key(KeyEvent::from(KeyCode::Char('x')));
        app.handle_key(KeyEvent::new(KeyCode::Char('d'), crossterm::event::KeyModifiers::CONTROL));
        let screen = draw(&app);
        assert!(screen.contains("Error:"));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 100);
        let popup = centered_rect(60, 80, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 80);
    }
}
