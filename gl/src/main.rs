//! Goalie - daily intentions against long-term goals
//!
//! CLI entry point: launches the TUI, or runs one of the scripting commands.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use serde::Serialize;
use tracing::{debug, info};

use goalie::cli::{Cli, Command, GoalsCommand, OutputFormat};
use goalie::config::Config;
use goalie::day::DayBoundary;
use goalie::domain::{DayReview, Goal, GoalFilter, GoalTable, Intention, NewGoal};
use goalie::parser::parse_intentions;
use goalie::state::StateManager;
use goalie::tui;
use goalie::workflow::{Workflow, merge_intentions};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("goalie")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("goalie.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let boundary = config.day.boundary();

    let db_path = cli.db.clone().unwrap_or_else(|| config.storage.db_path.clone());
    info!(db = %db_path.display(), start_hour = boundary.start_hour(), "Goalie starting");
    let manager = StateManager::spawn(&db_path, boundary)
        .context(format!("Failed to open store at {}", db_path.display()))?;

    debug!(command = ?cli.command, "main: dispatching command");
    let result = match cli.command {
        None => cmd_tui(&manager, &config, boundary).await,
        Some(Command::Today { format }) => cmd_today(&manager, boundary, format).await,
        Some(Command::Add { lines }) => cmd_add(&manager, boundary, &lines).await,
        Some(Command::Goals { command }) => match command {
            GoalsCommand::List { all, archived, format } => {
                let filter = if all {
                    GoalFilter::All
                } else if archived {
                    GoalFilter::Archived
                } else {
                    GoalFilter::Active
                };
                cmd_goals_list(&manager, filter, format).await
            }
            GoalsCommand::Add {
                name,
                description,
                color,
            } => cmd_goals_add(&manager, name, description, color).await,
            GoalsCommand::Archive { code } => cmd_goals_set_archived(&manager, code, true).await,
            GoalsCommand::Unarchive { code } => cmd_goals_set_archived(&manager, code, false).await,
            GoalsCommand::Remove { code } => cmd_goals_remove(&manager, code).await,
        },
        Some(Command::Review { date, format }) => cmd_review(&manager, boundary, date, format).await,
    };

    if let Err(e) = manager.shutdown().await {
        debug!(error = %e, "main: shutdown failed");
    }
    result
}

/// Launch the interactive workflow
async fn cmd_tui(manager: &StateManager, config: &Config, boundary: DayBoundary) -> Result<()> {
    debug!("cmd_tui: called");
    let workflow = Workflow::new(boundary.today());
    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms);
    tui::run(manager.clone(), workflow, tick_rate).await
}

/// The day being planned: today, or tomorrow once today has been reviewed
async fn working_day(manager: &StateManager, boundary: DayBoundary) -> Result<(NaiveDate, Vec<Intention>)> {
    let day = boundary.today();
    let intentions = manager.get_intentions_for_day(day).await?;
    if intentions.iter().any(|i| i.outcome) {
        let next = day.succ_opt().unwrap_or(day);
        debug!(%day, %next, "working_day: day already reviewed");
        let intentions = manager.get_intentions_for_day(next).await?;
        return Ok((next, intentions));
    }
    Ok((day, intentions))
}

fn goal_tags(goals: &GoalTable, intention: &Intention) -> String {
    intention
        .goals
        .iter()
        .filter_map(|id| goals.get(*id).map(|g| format!("[{}]", g.name)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print the working day's intentions
async fn cmd_today(manager: &StateManager, boundary: DayBoundary, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_today: called");
    let (day, intentions) = working_day(manager, boundary).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "day": day,
                "intentions": intentions,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            let goals = GoalTable::new(manager.get_goals(GoalFilter::All).await?);
            println!("{}", day.format("%A, %B %-d %Y").to_string().bold());
            if intentions.is_empty() {
                println!("{}", "No intentions yet".dimmed());
            }
            for intention in &intentions {
                let marker = if intention.cancelled {
                    "[-]".dimmed()
                } else if intention.done {
                    "[x]".green()
                } else {
                    "[ ]".yellow()
                };
                let mut line = format!("{} {}", marker, intention.content);
                let tags = goal_tags(&goals, intention);
                if !tags.is_empty() {
                    line.push_str(&format!(" {}", tags.cyan()));
                }
                if intention.pomos > 0 {
                    line.push_str(&format!(" {}", format!("({} pomos)", intention.pomos).dimmed()));
                }
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Parse lines and append them to the working day
async fn cmd_add(manager: &StateManager, boundary: DayBoundary, lines: &[String]) -> Result<()> {
    debug!(count = lines.len(), "cmd_add: called");
    let (day, existing) = working_day(manager, boundary).await?;
    let goals = GoalTable::new(manager.get_goals(GoalFilter::Active).await?);

    let parsed = parse_intentions(&goals, &lines.join("\n"), day)?;
    let count = parsed.len();
    let merged = merge_intentions(&existing, parsed, day);
    manager.upsert_intentions(merged).await?;

    info!(count, %day, "Added intentions from CLI");
    println!("{} Added {} intention(s) for {}", "✓".green(), count, day);
    Ok(())
}

/// A goal with the code it is addressed by in its own list
#[derive(Serialize)]
struct ListedGoal<'a> {
    code: usize,
    #[serde(flatten)]
    goal: &'a Goal,
}

fn listed(goals: &GoalTable) -> Vec<ListedGoal<'_>> {
    goals
        .goals()
        .iter()
        .enumerate()
        .map(|(i, goal)| ListedGoal { code: i + 1, goal })
        .collect()
}

fn print_goal(listed: &ListedGoal) {
    let goal = listed.goal;
    let mut line = format!("{:>3}. {}", listed.code, goal.name.bold());
    if !goal.description.is_empty() {
        line.push_str(&format!("  {}", goal.description.dimmed()));
    }
    if goal.archived {
        line.push_str(&format!("  {}", "(archived)".yellow()));
    }
    println!("{}", line);
}

/// List goals; active and archived goals are each coded within their own list
async fn cmd_goals_list(manager: &StateManager, filter: GoalFilter, format: OutputFormat) -> Result<()> {
    debug!(?filter, ?format, "cmd_goals_list: called");
    let active = match filter {
        GoalFilter::Active | GoalFilter::All => GoalTable::new(manager.get_goals(GoalFilter::Active).await?),
        GoalFilter::Archived => GoalTable::default(),
    };
    let archived = match filter {
        GoalFilter::Archived | GoalFilter::All => GoalTable::new(manager.get_goals(GoalFilter::Archived).await?),
        GoalFilter::Active => GoalTable::default(),
    };
    let active = listed(&active);
    let archived = listed(&archived);

    match format {
        OutputFormat::Json => {
            let all: Vec<&ListedGoal> = active.iter().chain(archived.iter()).collect();
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
        OutputFormat::Text => {
            if active.is_empty() && archived.is_empty() {
                println!("{}", "No goals".dimmed());
            }
            active.iter().for_each(print_goal);
            if filter == GoalFilter::All && !archived.is_empty() {
                println!("{}", "Archived".bold());
            }
            archived.iter().for_each(print_goal);
        }
    }
    Ok(())
}

async fn cmd_goals_add(manager: &StateManager, name: String, description: String, color: String) -> Result<()> {
    debug!(%name, "cmd_goals_add: called");
    let goal = manager
        .insert_goal(NewGoal::new(name).with_description(description).with_color(color))
        .await?;
    let active = GoalTable::new(manager.get_goals(GoalFilter::Active).await?);
    let code = active.code_of(goal.id).unwrap_or(active.len());
    println!("{} Added goal {}: {}", "✓".green(), code, goal.name.cyan());
    Ok(())
}

/// Goal at `code` in the list selected by `filter`
async fn find_goal(manager: &StateManager, filter: GoalFilter, code: i64) -> Result<Goal> {
    let goals = GoalTable::new(manager.get_goals(filter).await?);
    let kind = if filter == GoalFilter::Archived { "archived goal" } else { "goal" };
    goals
        .by_code(code)
        .cloned()
        .ok_or_else(|| eyre!("No {} with code {}", kind, code))
}

async fn cmd_goals_set_archived(manager: &StateManager, code: i64, archived: bool) -> Result<()> {
    debug!(code, archived, "cmd_goals_set_archived: called");
    // archiving picks from the active list, restoring from the archived one
    let from = if archived { GoalFilter::Active } else { GoalFilter::Archived };
    let mut goal = find_goal(manager, from, code).await?;
    goal.archived = archived;
    let name = goal.name.clone();
    manager.upsert_goals(vec![goal]).await?;

    let verb = if archived { "Archived" } else { "Restored" };
    println!("{} {} goal {}", "✓".green(), verb, name.cyan());
    Ok(())
}

async fn cmd_goals_remove(manager: &StateManager, code: i64) -> Result<()> {
    debug!(code, "cmd_goals_remove: called");
    let goal = find_goal(manager, GoalFilter::Active, code).await?;
    let name = goal.name.clone();
    let removed = manager.delete_goals(vec![goal]).await?;
    info!(code, removed, "Removed goal");
    println!("{} Removed goal {}: {}", "✓".green(), code, name);
    Ok(())
}

fn review_label(goals: &GoalTable, review: &DayReview) -> String {
    match review.goal {
        Some(id) => goals
            .get(id)
            .map_or_else(|| format!("goal {}", id), |g| g.name.clone()),
        None => "Misc".to_string(),
    }
}

/// Print stored reviews for a day
async fn cmd_review(
    manager: &StateManager,
    boundary: DayBoundary,
    date: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<()> {
    let date = date.unwrap_or_else(|| boundary.today());
    debug!(%date, ?format, "cmd_review: called");
    let reviews = manager.get_day_reviews(date).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reviews)?),
        OutputFormat::Text => {
            if reviews.is_empty() {
                println!("{}", format!("No review for {}", date).dimmed());
                return Ok(());
            }
            let goals = GoalTable::new(manager.get_goals(GoalFilter::All).await?);
            println!("{}", date.format("%A, %B %-d %Y").to_string().bold());
            for review in &reviews {
                let verdict = if review.enough { "enough".green() } else { "not enough".yellow() };
                println!("  {}: {}", review_label(&goals, review).cyan(), verdict);
                if !review.reflection.is_empty() {
                    println!("    {}", review.reflection);
                }
            }
        }
    }
    Ok(())
}
