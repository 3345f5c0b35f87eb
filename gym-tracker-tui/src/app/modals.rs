// gym-tracker-tui/src/app/modals.rs
use super::actions::filter_exercise_suggestions;
use super::navigation_helpers::clamp_table_selection;
use super::state::{ActiveModal, AddLogField, App, EditDayField};
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use gym_tracker_lib::{DayDraft, ExerciseField};
use tracing::info;

// What to do with a modal once its key has been applied
enum ModalOutcome {
    Stay,
    Close,
    Submit,
}

// --- Edit Day ---

fn next_edit_day_field(field: EditDayField) -> EditDayField {
    match field {
        EditDayField::DayLabel => EditDayField::Focus,
        EditDayField::Focus => EditDayField::Exercises,
        EditDayField::Exercises => EditDayField::Save,
        EditDayField::Save => EditDayField::Cancel,
        EditDayField::Cancel => EditDayField::DayLabel,
    }
}

fn previous_edit_day_field(field: EditDayField) -> EditDayField {
    match field {
        EditDayField::DayLabel => EditDayField::Cancel,
        EditDayField::Focus => EditDayField::DayLabel,
        EditDayField::Exercises => EditDayField::Focus,
        EditDayField::Save => EditDayField::Exercises,
        EditDayField::Cancel => EditDayField::Save,
    }
}

fn next_exercise_column(column: ExerciseField) -> ExerciseField {
    match column {
        ExerciseField::Name => ExerciseField::Sets,
        ExerciseField::Sets => ExerciseField::Reps,
        ExerciseField::Reps => ExerciseField::Name,
    }
}

fn previous_exercise_column(column: ExerciseField) -> ExerciseField {
    match column {
        ExerciseField::Name => ExerciseField::Reps,
        ExerciseField::Sets => ExerciseField::Name,
        ExerciseField::Reps => ExerciseField::Sets,
    }
}

/// Applies `edit` to the text under the cursor: the day label, the focus,
/// or one cell of the selected exercise row.
fn edit_focused_text(
    draft: &mut DayDraft,
    field: EditDayField,
    row: usize,
    column: ExerciseField,
    edit: impl FnOnce(&mut String),
) {
    match field {
        EditDayField::DayLabel => {
            let mut text = draft.day().day.clone();
            edit(&mut text);
            draft.set_day_label(text);
        }
        EditDayField::Focus => {
            let mut text = draft.day().focus.clone();
            edit(&mut text);
            draft.set_focus(text);
        }
        EditDayField::Exercises => {
            let Some(ex) = draft.day().exercises.get(row) else {
                return;
            };
            let id = ex.id.clone();
            let mut text = match column {
                ExerciseField::Name => ex.name.clone(),
                ExerciseField::Sets => ex.sets.clone(),
                ExerciseField::Reps => ex.reps.clone(),
            };
            edit(&mut text);
            draft.update_exercise(&id, column, text);
        }
        EditDayField::Save | EditDayField::Cancel => {}
    }
}

pub fn handle_edit_day_modal_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let outcome = {
        let ActiveModal::EditDay {
            draft,
            focused_field,
            exercise_row,
            exercise_column,
            error_message,
        } = &mut app.active_modal
        else {
            return Ok(());
        };
        *error_message = None;
        let row_count = draft.day().exercises.len();

        match key.code {
            KeyCode::Esc => ModalOutcome::Close,
            KeyCode::Tab => {
                *focused_field = next_edit_day_field(*focused_field);
                ModalOutcome::Stay
            }
            KeyCode::BackTab => {
                *focused_field = previous_edit_day_field(*focused_field);
                ModalOutcome::Stay
            }
            KeyCode::Insert => {
                draft.add_exercise();
                *focused_field = EditDayField::Exercises;
                *exercise_row = row_count;
                *exercise_column = ExerciseField::Name;
                ModalOutcome::Stay
            }
            KeyCode::Delete if *focused_field == EditDayField::Exercises => {
                if let Some(id) = draft.day().exercises.get(*exercise_row).map(|ex| ex.id.clone()) {
                    draft.remove_exercise(&id);
                    *exercise_row = (*exercise_row).min(row_count.saturating_sub(2));
                } else {
                    *error_message = Some("No exercise to remove".to_string());
                }
                ModalOutcome::Stay
            }
            KeyCode::Up if *focused_field == EditDayField::Exercises => {
                *exercise_row = exercise_row.saturating_sub(1);
                ModalOutcome::Stay
            }
            KeyCode::Down if *focused_field == EditDayField::Exercises => {
                if *exercise_row + 1 < row_count {
                    *exercise_row += 1;
                }
                ModalOutcome::Stay
            }
            KeyCode::Left if *focused_field == EditDayField::Exercises => {
                *exercise_column = previous_exercise_column(*exercise_column);
                ModalOutcome::Stay
            }
            KeyCode::Right if *focused_field == EditDayField::Exercises => {
                *exercise_column = next_exercise_column(*exercise_column);
                ModalOutcome::Stay
            }
            KeyCode::Up => {
                *focused_field = previous_edit_day_field(*focused_field);
                ModalOutcome::Stay
            }
            KeyCode::Down => {
                *focused_field = next_edit_day_field(*focused_field);
                ModalOutcome::Stay
            }
            KeyCode::Enter => match *focused_field {
                EditDayField::Save => ModalOutcome::Submit,
                EditDayField::Cancel => ModalOutcome::Close,
                _ => {
                    *focused_field = next_edit_day_field(*focused_field);
                    ModalOutcome::Stay
                }
            },
            KeyCode::Backspace => {
                edit_focused_text(draft, *focused_field, *exercise_row, *exercise_column, |text| {
                    text.pop();
                });
                ModalOutcome::Stay
            }
            KeyCode::Char(c) => {
                edit_focused_text(draft, *focused_field, *exercise_row, *exercise_column, |text| {
                    text.push(c);
                });
                ModalOutcome::Stay
            }
            _ => ModalOutcome::Stay,
        }
    };

    match outcome {
        ModalOutcome::Stay => {}
        ModalOutcome::Close => app.active_modal = ActiveModal::None,
        ModalOutcome::Submit => {
            if let ActiveModal::EditDay {
                draft,
                focused_field,
                exercise_row,
                exercise_column,
                ..
            } = std::mem::replace(&mut app.active_modal, ActiveModal::None)
            {
                let (week, index) = (draft.week(), draft.index());
                // A failed save leaves the schedule as it was; keep the edits open for a retry
                if let Err(e) = app.tracker.commit_day(draft.clone()) {
                    app.active_modal = ActiveModal::EditDay {
                        draft,
                        focused_field,
                        exercise_row,
                        exercise_column,
                        error_message: Some(format!("Save failed: {e:#}")),
                    };
                    return Ok(());
                }
                info!(%week, day = index + 1, "day updated");
                clamp_table_selection(
                    &mut app.schedule_exercise_state,
                    app.tracker.week(week).get(index).map_or(0, |d| d.exercises.len()),
                );
                app.refresh_progress_exercises();
            }
        }
    }
    Ok(())
}

// --- Add Log ---

fn next_add_log_field(field: AddLogField) -> AddLogField {
    match field {
        AddLogField::Exercise => AddLogField::Weight,
        AddLogField::Weight => AddLogField::Date,
        AddLogField::Date => AddLogField::Confirm,
        AddLogField::Confirm => AddLogField::Cancel,
        AddLogField::Cancel => AddLogField::Exercise,
    }
}

fn previous_add_log_field(field: AddLogField) -> AddLogField {
    match field {
        AddLogField::Exercise => AddLogField::Cancel,
        AddLogField::Weight => AddLogField::Exercise,
        AddLogField::Date => AddLogField::Weight,
        AddLogField::Confirm => AddLogField::Date,
        AddLogField::Cancel => AddLogField::Confirm,
    }
}

/// Accepts YYYY-MM-DD or "today".
pub fn parse_date_input(input: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{trimmed}'. Use YYYY-MM-DD."))
}

pub fn handle_add_log_modal_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let all_names = app.tracker.exercise_names();
    let outcome = {
        let ActiveModal::AddLog {
            exercise_input,
            weight_input,
            date_input,
            focused_field,
            error_message,
            exercise_suggestions,
            suggestion_index,
        } = &mut app.active_modal
        else {
            return Ok(());
        };

        match key.code {
            KeyCode::Esc => ModalOutcome::Close,
            KeyCode::Tab => {
                *focused_field = next_add_log_field(*focused_field);
                ModalOutcome::Stay
            }
            KeyCode::BackTab => {
                *focused_field = previous_add_log_field(*focused_field);
                ModalOutcome::Stay
            }
            // Up/Down pick from the suggestions while the exercise field is focused
            KeyCode::Down | KeyCode::Up
                if *focused_field == AddLogField::Exercise && !exercise_suggestions.is_empty() =>
            {
                let len = exercise_suggestions.len();
                let next = match (key.code, *suggestion_index) {
                    (KeyCode::Down, Some(i)) => (i + 1) % len,
                    (KeyCode::Up, Some(i)) => (i + len - 1) % len,
                    (KeyCode::Up, None) => len - 1,
                    _ => 0,
                };
                *suggestion_index = Some(next);
                exercise_input.clone_from(&exercise_suggestions[next]);
                ModalOutcome::Stay
            }
            KeyCode::Down => {
                *focused_field = next_add_log_field(*focused_field);
                ModalOutcome::Stay
            }
            KeyCode::Up => {
                *focused_field = previous_add_log_field(*focused_field);
                ModalOutcome::Stay
            }
            KeyCode::Enter => match *focused_field {
                AddLogField::Cancel => ModalOutcome::Close,
                _ => ModalOutcome::Submit,
            },
            KeyCode::Backspace | KeyCode::Char(_) => {
                let target = match focused_field {
                    AddLogField::Exercise => Some(&mut *exercise_input),
                    AddLogField::Weight => Some(&mut *weight_input),
                    AddLogField::Date => Some(&mut *date_input),
                    AddLogField::Confirm | AddLogField::Cancel => None,
                };
                if let Some(text) = target {
                    match key.code {
                        KeyCode::Char(c) => text.push(c),
                        _ => {
                            text.pop();
                        }
                    }
                    *error_message = None;
                }
                if *focused_field == AddLogField::Exercise {
                    *exercise_suggestions = filter_exercise_suggestions(&all_names, exercise_input);
                    *suggestion_index = None;
                }
                ModalOutcome::Stay
            }
            _ => ModalOutcome::Stay,
        }
    };

    match outcome {
        ModalOutcome::Stay => {}
        ModalOutcome::Close => app.active_modal = ActiveModal::None,
        ModalOutcome::Submit => submit_add_log(app),
    }
    Ok(())
}

fn submit_add_log(app: &mut App) {
    let ActiveModal::AddLog {
        exercise_input,
        weight_input,
        date_input,
        ..
    } = &app.active_modal
    else {
        return;
    };
    let exercise = exercise_input.trim().to_string();
    let weight = weight_input.trim().to_string();

    let result = parse_date_input(date_input, App::today()).and_then(|date| {
        app.tracker
            .add_log(date, &exercise, &weight)
            .map_err(|e| format!("{e:#}"))
    });

    match result {
        Ok(entry) => {
            app.active_modal = ActiveModal::None;
            app.log_table_state.select(Some(0)); // New entries are listed first
            app.refresh_progress_exercises();
            if entry.weight.is_nan() {
                app.set_error(format!("'{weight}' is not a number"));
            }
        }
        Err(msg) => {
            if let ActiveModal::AddLog { error_message, .. } = &mut app.active_modal {
                *error_message = Some(msg);
            }
        }
    }
}

// --- Confirm Delete ---

pub fn handle_confirm_delete_modal_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let ActiveModal::ConfirmDeleteLog { log_id, .. } = &app.active_modal else {
        return Ok(());
    };
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            let log_id = log_id.clone();
            app.active_modal = ActiveModal::None;
            if let Err(e) = app.tracker.delete_log(&log_id) {
                app.set_error(format!("Delete failed: {e:#}"));
            }
            clamp_table_selection(&mut app.log_table_state, app.tracker.logs().len());
            app.refresh_progress_exercises();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.active_modal = ActiveModal::None;
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::open_edit_day_modal;
    use gym_tracker_lib::{Config, GymTracker, KeyValueStore, StorageError, Week};

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
    }

    fn read_only_app() -> App {
        let tracker = GymTracker::with_store(
            Config::default(),
            "config.toml".into(),
            "gym.sqlite".into(),
            Box::new(ReadOnlyStore),
        );
        App::new(tracker)
    }

    #[test]
    fn failed_day_save_keeps_the_edit_open() {
        let mut app = read_only_app();
        let focus_before = app.tracker.week(Week::One)[0].focus.clone();
        open_edit_day_modal(&mut app);

        for code in [KeyCode::Char('!'), KeyCode::Tab, KeyCode::Tab, KeyCode::Enter] {
            handle_edit_day_modal_input(&mut app, KeyEvent::from(code)).unwrap();
        }

        let ActiveModal::EditDay { draft, error_message, .. } = &app.active_modal else {
            panic!("edit modal should stay open");
        };
        assert_eq!(draft.day().focus, format!("{focus_before}!"));
        assert!(error_message.as_deref().is_some_and(|m| m.starts_with("Save failed")));
        assert_eq!(app.tracker.week(Week::One)[0].focus, focus_before);
    }

    #[test]
    fn failed_log_save_adds_nothing() {
        let mut app = read_only_app();
        app.active_modal = ActiveModal::AddLog {
            exercise_input: "Squat".to_string(),
            weight_input: "100".to_string(),
            date_input: "2024-01-01".to_string(),
            focused_field: AddLogField::Confirm,
            error_message: None,
            exercise_suggestions: Vec::new(),
            suggestion_index: None,
        };
        submit_add_log(&mut app);
        submit_add_log(&mut app);
        assert!(app.tracker.logs().is_empty());
        assert!(matches!(
            &app.active_modal,
            ActiveModal::AddLog { error_message: Some(_), .. }
        ));
    }

    #[test]
    fn date_input_accepts_today_and_iso_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(parse_date_input("today", today), Ok(today));
        assert_eq!(parse_date_input("", today), Ok(today));
        assert_eq!(
            parse_date_input("2024-01-31", today),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );
        assert!(parse_date_input("31/01/2024", today).is_err());
    }

    #[test]
    fn field_cycles_are_inverse() {
        for field in [
            EditDayField::DayLabel,
            EditDayField::Focus,
            EditDayField::Exercises,
            EditDayField::Save,
            EditDayField::Cancel,
        ] {
            assert_eq!(previous_edit_day_field(next_edit_day_field(field)), field);
        }
        for column in [ExerciseField::Name, ExerciseField::Sets, ExerciseField::Reps] {
            assert_eq!(previous_exercise_column(next_exercise_column(column)), column);
        }
    }
}
