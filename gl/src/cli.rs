//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Goalie - daily intentions against long-term goals
#[derive(Parser)]
#[command(
    name = "goalie",
    about = "Plan the day against your goals, track it, review it",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Database file, overriding the config
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Subcommand to execute; opens the TUI when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the working day's intentions
    Today {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Add intentions to the working day, one per argument
    ///
    /// Each line reads `<codes>) <intention>`, e.g. `1,2) call mom`.
    Add {
        #[arg(required = true, value_name = "LINE")]
        lines: Vec<String>,
    },

    /// Manage goals
    Goals {
        #[command(subcommand)]
        command: GoalsCommand,
    },

    /// Show stored day reviews
    Review {
        /// Day to show (YYYY-MM-DD); defaults to the current day
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Goal subcommands
#[derive(Debug, Subcommand)]
pub enum GoalsCommand {
    /// List goals
    List {
        /// Include archived goals
        #[arg(long, conflicts_with = "archived")]
        all: bool,

        /// Only archived goals
        #[arg(long)]
        archived: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a goal numbered after the last one
    Add {
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Color name or hex value (e.g. "green", "#ff8800")
        #[arg(long, default_value = "")]
        color: String,
    },

    /// Archive a goal by its code in `goals list`
    Archive { code: i64 },

    /// Restore a goal by its code in `goals list --archived`
    Unarchive { code: i64 },

    /// Delete a goal by its code in `goals list`
    Remove { code: i64 },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
