//! End-to-end workflow runs against a real SQLite store

use std::collections::VecDeque;

use chrono::NaiveDate;
use goalie::day::DayBoundary;
use goalie::domain::{GoalFilter, GoalId, Intention, NewGoal};
use goalie::state::StateManager;
use goalie::workflow::{Command, Msg, Page, Workflow, execute};
use tempfile::TempDir;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

fn setup() -> (TempDir, StateManager) {
    let temp = TempDir::new().unwrap();
    let manager = StateManager::spawn(temp.path(), DayBoundary::default()).unwrap();
    (temp, manager)
}

/// Run commands to completion, feeding every result back into the workflow
async fn drive(workflow: &mut Workflow, manager: &StateManager, commands: Vec<Command>) {
    let mut queue: VecDeque<Command> = commands.into();
    while let Some(command) = queue.pop_front() {
        let msg = execute(manager, command).await;
        queue.extend(workflow.update(msg));
    }
}

async fn send(workflow: &mut Workflow, manager: &StateManager, msg: Msg) {
    let commands = workflow.update(msg);
    drive(workflow, manager, commands).await;
}

async fn type_text(workflow: &mut Workflow, manager: &StateManager, text: &str) {
    for c in text.chars() {
        let msg = if c == '\n' { Msg::Newline } else { Msg::Char(c) };
        send(workflow, manager, msg).await;
    }
}

#[tokio::test]
async fn test_plan_track_and_review_a_day() {
    let (_temp, manager) = setup();
    let health = manager.insert_goal(NewGoal::new("Health")).await.unwrap();

    let mut workflow = Workflow::new(day());
    let init = workflow.init();
    drive(&mut workflow, &manager, init).await;
    assert_eq!(workflow.page(), Page::Input);
    assert_eq!(workflow.goals().len(), 1);

    type_text(&mut workflow, &manager, "1) run").await;
    send(&mut workflow, &manager, Msg::Submit).await;
    assert_eq!(workflow.page(), Page::Today);
    assert_eq!(workflow.intentions().len(), 1);
    assert_eq!(workflow.intentions()[0].goals, vec![health.id]);
    assert_eq!(workflow.intentions()[0].position, 0);
    assert!(!workflow.intentions()[0].done);

    send(&mut workflow, &manager, Msg::ToggleDone).await;
    assert!(workflow.intentions()[0].done);

    send(&mut workflow, &manager, Msg::EndDay).await;
    assert_eq!(workflow.page(), Page::Outcomes);
    let sections = workflow.review().unwrap().sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].entries, vec![0]);
    assert!(sections[1].entries.is_empty());

    send(&mut workflow, &manager, Msg::SetEnough(true)).await;
    send(&mut workflow, &manager, Msg::Submit).await;

    // the reviewed day hands over to the next one
    assert_eq!(workflow.page(), Page::Input);
    assert_eq!(workflow.day(), day().succ_opt().unwrap());

    let stored = manager.get_intentions_for_day(day()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].outcome);
    assert!(stored[0].done);

    let reviews = manager.get_day_reviews(day()).await.unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].goal, Some(health.id));
    assert!(reviews[0].enough);
    assert_eq!(reviews[1].goal, None);
}

#[tokio::test]
async fn test_unintended_entry_and_reflection_are_stored() {
    let (_temp, manager) = setup();
    manager.insert_goal(NewGoal::new("Health")).await.unwrap();
    manager.insert_goal(NewGoal::new("Writing")).await.unwrap();

    let mut workflow = Workflow::new(day());
    let init = workflow.init();
    drive(&mut workflow, &manager, init).await;

    type_text(&mut workflow, &manager, "1,2) walk and dictate\n-) laundry").await;
    send(&mut workflow, &manager, Msg::Submit).await;
    assert_eq!(workflow.intentions().len(), 2);

    send(&mut workflow, &manager, Msg::EndDay).await;
    // second section is Writing
    send(&mut workflow, &manager, Msg::NextSection).await;
    send(&mut workflow, &manager, Msg::Add).await;
    type_text(&mut workflow, &manager, "outline chapter").await;
    send(&mut workflow, &manager, Msg::Newline).await;
    send(&mut workflow, &manager, Msg::FocusReflection).await;
    type_text(&mut workflow, &manager, "good flow").await;
    send(&mut workflow, &manager, Msg::Submit).await;
    assert_eq!(workflow.page(), Page::Input);

    let stored = manager.get_intentions_for_day(day()).await.unwrap();
    assert_eq!(stored.len(), 3);
    let extra = stored.iter().find(|i| i.unintended).unwrap();
    assert_eq!(extra.content, "2) outline chapter");
    assert!(extra.done);
    assert_eq!(extra.goals, vec![GoalId(2)]);

    let reviews = manager.get_day_reviews(day()).await.unwrap();
    assert_eq!(reviews.len(), 3);
    let writing = reviews.iter().find(|r| r.goal == Some(GoalId(2))).unwrap();
    assert_eq!(writing.reflection, "good flow");
}

#[tokio::test]
async fn test_reorder_survives_reload() {
    let (_temp, manager) = setup();
    let mut workflow = Workflow::new(day());
    let init = workflow.init();
    drive(&mut workflow, &manager, init).await;

    type_text(&mut workflow, &manager, "-) a\n-) b\n-) c").await;
    send(&mut workflow, &manager, Msg::Submit).await;
    send(&mut workflow, &manager, Msg::Down).await;
    send(&mut workflow, &manager, Msg::Down).await;
    send(&mut workflow, &manager, Msg::MoveUp).await;
    send(&mut workflow, &manager, Msg::PomoIncrement).await;

    send(&mut workflow, &manager, Msg::Sync).await;
    assert_eq!(workflow.page(), Page::Today);
    let order: Vec<&str> = workflow.intentions().iter().map(|i| i.content.as_str()).collect();
    assert_eq!(order, vec!["-) a", "-) c", "-) b"]);
    assert_eq!(workflow.intentions()[1].pomos, 1);
}

#[tokio::test]
async fn test_archived_goals_are_not_offered() {
    let (_temp, manager) = setup();
    let mut old = manager.insert_goal(NewGoal::new("Old")).await.unwrap();
    manager.insert_goal(NewGoal::new("Current")).await.unwrap();
    old.archived = true;
    manager.upsert_goals(vec![old]).await.unwrap();

    let mut workflow = Workflow::new(day());
    let init = workflow.init();
    drive(&mut workflow, &manager, init).await;
    assert_eq!(workflow.goals().len(), 1);
    assert_eq!(workflow.goals().by_code(1).unwrap().name, "Current");

    // only one code is valid now
    type_text(&mut workflow, &manager, "2) nope").await;
    send(&mut workflow, &manager, Msg::Submit).await;
    assert_eq!(workflow.page(), Page::Input);
    assert!(workflow.status().unwrap().is_error());
    assert_eq!(manager.get_goals(GoalFilter::All).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_reviewed_day_continues_with_next_day_intentions() {
    let (_temp, manager) = setup();
    let next = day().succ_opt().unwrap();

    let mut closed = Intention::new("-) yesterday", day());
    closed.done = true;
    closed.outcome = true;
    manager.upsert_intentions(vec![closed]).await.unwrap();
    manager
        .upsert_intentions(vec![Intention::new("-) already planned", next)])
        .await
        .unwrap();

    let mut workflow = Workflow::new(day());
    let init = workflow.init();
    drive(&mut workflow, &manager, init).await;
    assert_eq!(workflow.day(), next);
    assert_eq!(workflow.page(), Page::Today);
    assert_eq!(workflow.intentions().len(), 1);

    send(&mut workflow, &manager, Msg::Add).await;
    type_text(&mut workflow, &manager, "-) new").await;
    send(&mut workflow, &manager, Msg::Submit).await;
    assert_eq!(workflow.page(), Page::Today);

    let stored = manager.get_intentions_for_day(next).await.unwrap();
    let rows: Vec<(&str, i64)> = stored.iter().map(|i| (i.content.as_str(), i.position)).collect();
    assert_eq!(rows, vec![("-) already planned", 0), ("-) new", 1)]);
}
