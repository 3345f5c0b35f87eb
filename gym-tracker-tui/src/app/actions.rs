// gym-tracker-tui/src/app/actions.rs
use super::state::{ActiveModal, ActiveTab, AddLogField, App, EditDayField};
use gym_tracker_lib::{ContextKind, ExerciseField, QuickPrompt, Week};
use tracing::debug;

pub fn toggle_schedule_week(app: &mut App) {
    app.schedule_week = match app.schedule_week {
        Week::One => Week::Two,
        Week::Two => Week::One,
    };
    let days = app.tracker.week(app.schedule_week).len();
    let index = app.selected_day_index().min(days.saturating_sub(1));
    app.schedule_day_state.select((days > 0).then_some(index));
    app.schedule_exercise_state.select(Some(0));
}

pub fn open_edit_day_modal(app: &mut App) {
    let index = app.selected_day_index();
    match app.tracker.begin_edit(app.schedule_week, index) {
        Ok(draft) => {
            app.active_modal = ActiveModal::EditDay {
                draft,
                focused_field: EditDayField::Focus,
                exercise_row: 0,
                exercise_column: ExerciseField::Name,
                error_message: None,
            };
        }
        Err(e) => app.set_error(e.to_string()),
    }
}

pub fn open_add_log_modal(app: &mut App) {
    // Prefill with the selected entry's exercise, which is usually the next lift logged
    let exercise_input = app
        .log_table_state
        .selected()
        .and_then(|i| app.tracker.logs().get(i))
        .map(|entry| entry.exercise.clone())
        .unwrap_or_default();
    let exercise_suggestions = filter_exercise_suggestions(&app.tracker.exercise_names(), &exercise_input);
    app.active_modal = ActiveModal::AddLog {
        exercise_input,
        weight_input: String::new(),
        date_input: App::today().format("%Y-%m-%d").to_string(),
        focused_field: AddLogField::Exercise,
        error_message: None,
        exercise_suggestions,
        suggestion_index: None,
    };
}

pub fn open_delete_confirmation_modal(app: &mut App) {
    let Some(entry) = app
        .log_table_state
        .selected()
        .and_then(|i| app.tracker.logs().get(i))
    else {
        app.set_error("No log entry selected".to_string());
        return;
    };
    app.active_modal = ActiveModal::ConfirmDeleteLog {
        log_id: entry.id.clone(),
        exercise: entry.exercise.clone(),
        date: entry.date,
    };
}

/// Switches to the progress tab with the selected log entry's exercise chosen.
pub fn show_progress_for_selected_log(app: &mut App) {
    let Some(exercise) = app
        .log_table_state
        .selected()
        .and_then(|i| app.tracker.logs().get(i))
        .map(|entry| entry.exercise.clone())
    else {
        return;
    };
    app.refresh_progress_exercises();
    if let Some(index) = app.progress_exercises.iter().position(|n| *n == exercise) {
        app.progress_list_state.select(Some(index));
        app.refresh_projection();
    }
    app.active_tab = ActiveTab::Progress;
}

pub fn submit_coach_input(app: &mut App) {
    let prompt = app.coach_input.trim().to_string();
    let kind = if app.coach_include_logs {
        ContextKind::Logs
    } else {
        ContextKind::General
    };
    if send_to_coach(app, &prompt, kind) {
        app.coach_input.clear();
    }
}

pub fn send_quick_prompt(app: &mut App, quick: QuickPrompt) {
    debug!(prompt = %quick, "quick prompt");
    send_to_coach(app, quick.prompt(), quick.context_kind());
}

/// Returns true if the request was started.
fn send_to_coach(app: &mut App, prompt: &str, kind: ContextKind) -> bool {
    let context = app.tracker.coach_context(kind);
    let Some(session) = app.coach.as_mut() else {
        let reason = app
            .coach_unavailable
            .clone()
            .unwrap_or_else(|| "Coach is unavailable".to_string());
        app.set_error(reason);
        return false;
    };
    match session.submit(prompt, &context) {
        Ok(()) => {
            app.coach_scroll = 0;
            true
        }
        Err(e) => {
            app.set_error(e.to_string());
            false
        }
    }
}

/// Known names containing `input` (case-insensitive); all of them for blank input.
pub fn filter_exercise_suggestions(all_names: &[String], input: &str) -> Vec<String> {
    let needle = input.trim().to_lowercase();
    all_names
        .iter()
        .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_match_case_insensitively() {
        let names = vec![
            "Bench Press".to_string(),
            "Incline DB Press".to_string(),
            "Squat".to_string(),
        ];
        assert_eq!(
            filter_exercise_suggestions(&names, "press"),
            vec!["Bench Press".to_string(), "Incline DB Press".to_string()]
        );
        assert_eq!(filter_exercise_suggestions(&names, "  ").len(), 3);
        assert!(filter_exercise_suggestions(&names, "row").is_empty());
    }
}
