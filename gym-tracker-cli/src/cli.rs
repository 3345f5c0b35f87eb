// src/cli.rs
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use gym_tracker_lib::{QuickPrompt, Week};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track a two-week training schedule, lifts and progress", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print tables as CSV instead (logs, progress)
    #[arg(long, global = true)]
    pub export_csv: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the schedule
    Schedule {
        /// Only this week (1 or 2)
        #[arg(short, long)]
        week: Option<Week>,
    },
    /// Edit one scheduled day; all changes are applied together
    EditDay {
        /// Week (1 or 2)
        week: Week,
        /// Day number within the week, starting at 1
        day: usize,
        /// New focus label (e.g., "Push")
        #[arg(short, long)]
        focus: Option<String>,
        /// New day label (e.g., "Monday")
        #[arg(short, long)]
        label: Option<String>,
        /// Add an exercise: "NAME[:SETS[:REPS]]" (sets/reps default to 3 and 10)
        #[arg(short, long, value_name = "NAME[:SETS[:REPS]]")]
        add: Vec<String>,
        /// Remove the exercise with this id
        #[arg(short, long, value_name = "ID")]
        remove: Vec<String>,
        /// Change a field: "ID:FIELD:VALUE" where FIELD is name, sets or reps
        #[arg(short, long, value_name = "ID:FIELD:VALUE")]
        set: Vec<String>,
    },
    /// Log a weight for an exercise
    Log {
        /// Exercise name (e.g., "Bench Press")
        exercise: String,
        /// Weight in kg
        weight: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// List logged weights, newest first
    Logs {
        /// Only this exercise (exact name)
        #[arg(short, long)]
        exercise: Option<String>,
        /// Show only the newest N entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete a log entry
    DeleteLog {
        /// ID of the entry to delete
        id: String,
    },
    /// List every known exercise name
    Exercises,
    /// Show the progress chart data for an exercise
    Progress {
        exercise: String,
        /// Also write the chart as an SVG file
        #[arg(long, value_name = "PATH")]
        svg: Option<PathBuf>,
    },
    /// Ask the AI coach a question
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
        /// Include recent logs in the context
        #[arg(long)]
        logs: bool,
    },
    /// Send one of the built-in coach prompts (shorten, meal, analyze, form)
    Quick { kind: QuickPrompt },
    /// Show the path to the config file
    ConfigPath,
    /// Show the path to the database file
    DbPath,
    /// Generate shell completion script
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
