//src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use gym_tracker_lib::{
    chart, ChartError, ChartProjection, CoachSession, ContextKind, ExerciseField, GymTracker,
    LogEntry, Week, WorkoutDay,
};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args();
    debug!(?cli_args, "parsed arguments");
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut tracker = GymTracker::initialize().context("Failed to initialize gym tracker")?;
    let header_color = tracker.config.theme.header_color();

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Schedule { week } => {
            for week in week_list(week) {
                println!("{week}");
                print_week_table(tracker.week(week), header_color);
            }
        }
        cli::Commands::EditDay {
            week,
            day,
            focus,
            label,
            add,
            remove,
            set,
        } => {
            if day == 0 {
                bail!("Day numbers start at 1.");
            }
            let mut draft = tracker.begin_edit(week, day - 1)?;
            if let Some(focus) = focus {
                draft.set_focus(focus);
            }
            if let Some(label) = label {
                draft.set_day_label(label);
            }
            for id in &remove {
                if !draft.remove_exercise(id) {
                    bail!("No exercise with id '{id}' on {week} day {day}.");
                }
            }
            for arg in &set {
                let (id, field, value) = parse_set_arg(arg)?;
                if !draft.update_exercise(id, field, value) {
                    bail!("No exercise with id '{id}' on {week} day {day}.");
                }
            }
            for arg in &add {
                let mut parts = arg.splitn(3, ':');
                let name = parts.next().unwrap_or_default().trim();
                let id = draft.add_exercise();
                draft.update_exercise(&id, ExerciseField::Name, name);
                if let Some(sets) = parts.next() {
                    draft.update_exercise(&id, ExerciseField::Sets, sets.trim());
                }
                if let Some(reps) = parts.next() {
                    draft.update_exercise(&id, ExerciseField::Reps, reps.trim());
                }
            }
            tracker
                .commit_day(draft)
                .with_context(|| format!("Error saving {week} day {day}"))?;
            println!("Successfully updated {week} day {day}.");
            print_week_table(
                std::slice::from_ref(tracker.get_day(week, day - 1)?),
                header_color,
            );
        }
        cli::Commands::Log {
            exercise,
            weight,
            date,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let entry = tracker
                .add_log(date, exercise.trim(), &weight)
                .context("Error adding log entry")?;
            if entry.weight.is_nan() {
                eprintln!(
                    "Warning: '{weight}' is not a number; the entry was stored without a usable weight."
                );
            }
            println!(
                "Logged {} @ {}kg on {} ID: {}",
                entry.exercise,
                gym_tracker_lib::model::format_weight(entry.weight),
                entry.date.format("%Y-%m-%d"),
                entry.id
            );
        }
        cli::Commands::Logs { exercise, limit } => {
            let mut entries: Vec<LogEntry> = match exercise {
                Some(name) => tracker.logs_for_exercise(&name),
                None => tracker.logs().to_vec(),
            };
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            if entries.is_empty() {
                println!("No logs found.");
            } else if export_csv {
                print_log_csv(&entries)?;
            } else {
                print_log_table(&entries, header_color);
            }
        }
        cli::Commands::DeleteLog { id } => {
            if tracker.delete_log(&id)? {
                println!("Successfully deleted log entry ID {id}.");
            } else {
                println!("No log entry with ID {id}; nothing deleted.");
            }
        }
        cli::Commands::Exercises => {
            let names = tracker.exercise_names();
            if names.is_empty() {
                println!("No exercises yet.");
            }
            for name in names {
                println!("{name}");
            }
        }
        cli::Commands::Progress { exercise, svg } => match tracker.progress(&exercise) {
            Ok(projection) => {
                if export_csv {
                    print_projection_csv(&projection)?;
                } else {
                    print_projection_table(&exercise, &projection, header_color);
                }
                if let Some(path) = svg {
                    std::fs::write(&path, chart::render_svg(&projection))
                        .with_context(|| format!("Failed to write chart to {}", path.display()))?;
                    println!("Chart written to {}", path.display());
                }
            }
            Err(ChartError::InsufficientData { .. }) => {
                println!("Add at least 2 logs for '{exercise}' to see a graph.");
            }
        },
        cli::Commands::Ask { prompt, logs } => {
            let kind = if logs {
                ContextKind::Logs
            } else {
                ContextKind::General
            };
            ask_coach(&tracker, &prompt.join(" "), kind)?;
        }
        cli::Commands::Quick { kind } => {
            ask_coach(&tracker, kind.prompt(), kind.context_kind())?;
        }
        cli::Commands::ConfigPath => {
            println!("{}", tracker.get_config_path().display());
        }
        cli::Commands::DbPath => {
            println!("{}", tracker.get_db_path().display());
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Parses "ID:FIELD:VALUE"; the value may itself contain colons.
fn parse_set_arg(arg: &str) -> Result<(&str, ExerciseField, &str)> {
    let mut parts = arg.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(field), Some(value)) => Ok((id.trim(), field.parse()?, value.trim())),
        _ => bail!("Invalid --set '{arg}'. Expected ID:FIELD:VALUE."),
    }
}

fn ask_coach(tracker: &GymTracker, prompt: &str, kind: ContextKind) -> Result<()> {
    let client = tracker.gemini_client()?;
    let mut session = CoachSession::new(Arc::new(client));
    session.submit(prompt, &tracker.coach_context(kind))?;
    eprintln!("Asking the coach...");
    session.wait();
    println!("{}", session.last_reply().unwrap_or_default());
    Ok(())
}

/// The requested week, or both in order.
fn week_list(week: Option<Week>) -> Vec<Week> {
    week.map_or_else(|| vec![Week::One, Week::Two], |w| vec![w])
}

/// Prints the days of a week in a formatted table.
fn print_week_table(days: &[WorkoutDay], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Day").fg(header_color),
            Cell::new("Focus").fg(header_color),
            Cell::new("ID").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Sets x Reps").fg(header_color),
        ]);

    for day in days {
        if day.exercises.is_empty() {
            table.add_row(vec![
                Cell::new(&day.day),
                Cell::new(&day.focus),
                Cell::new("-"),
                Cell::new("No exercises"),
                Cell::new("-"),
            ]);
            continue;
        }
        for (i, ex) in day.exercises.iter().enumerate() {
            let (day_cell, focus_cell) = if i == 0 {
                (day.day.as_str(), day.focus.as_str())
            } else {
                ("", "")
            };
            table.add_row(vec![
                Cell::new(day_cell),
                Cell::new(focus_cell),
                Cell::new(&ex.id),
                Cell::new(&ex.name),
                Cell::new(format!("{} x {}", ex.sets, ex.reps)),
            ]);
        }
    }
    println!("{table}");
}

/// Prints log entries in a formatted table.
fn print_log_table(entries: &[LogEntry], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Date").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Weight (kg)").fg(header_color),
        ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.id),
            Cell::new(entry.date.format("%Y-%m-%d")),
            Cell::new(&entry.exercise),
            Cell::new(gym_tracker_lib::model::format_weight(entry.weight)),
        ]);
    }
    println!("{table}");
}

fn print_log_csv(entries: &[LogEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Id", "Date", "Exercise", "Weight_kg"])?;
    for entry in entries {
        writer.write_record([
            entry.id.clone(),
            entry.date.format("%Y-%m-%d").to_string(),
            entry.exercise.clone(),
            gym_tracker_lib::model::format_weight(entry.weight),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_projection_table(exercise: &str, projection: &ChartProjection, header_color: Color) {
    println!(
        "{exercise}: {} points, axis {:.1}kg - {:.1}kg",
        projection.points.len(),
        projection.min_weight,
        projection.max_weight
    );
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Date").fg(header_color),
            Cell::new("Weight").fg(header_color),
            Cell::new("x").fg(header_color),
            Cell::new("y").fg(header_color),
        ]);
    for point in &projection.points {
        table.add_row(vec![
            Cell::new(point.date_label()),
            Cell::new(point.weight_label()),
            Cell::new(format!("{:.1}", point.x)),
            Cell::new(format!("{:.1}", point.y)),
        ]);
    }
    println!("{table}");
}

fn print_projection_csv(projection: &ChartProjection) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Date", "Weight_kg", "X", "Y"])?;
    for point in &projection.points {
        writer.write_record([
            point.date.format("%Y-%m-%d").to_string(),
            gym_tracker_lib::model::format_weight(point.weight),
            format!("{:.3}", point.x),
            format!("{:.3}", point.y),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
