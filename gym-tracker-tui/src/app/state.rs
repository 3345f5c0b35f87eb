// gym-tracker-tui/src/app/state.rs
use chrono::{Local, NaiveDate};
use gym_tracker_lib::{
    ChartError, ChartProjection, CoachSession, DayDraft, ExerciseField, GymTracker, Week,
};
use ratatui::widgets::{ListState, TableState};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

// Represents the active UI tab
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveTab {
    Schedule,
    Log,
    Progress,
    Coach,
}

// Which pane has focus in the schedule tab
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleFocus {
    DayList,
    ExerciseTable,
}

// Fields within the Edit Day modal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditDayField {
    DayLabel,
    Focus,
    Exercises,
    Save,
    Cancel,
}

// Fields within the Add Log modal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddLogField {
    Exercise,
    Weight,
    Date,
    Confirm,
    Cancel,
}

// Represents the state of active modals
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveModal {
    None,
    Help,
    EditDay {
        draft: DayDraft,
        focused_field: EditDayField,
        exercise_row: usize,
        exercise_column: ExerciseField,
        error_message: Option<String>,
    },
    AddLog {
        exercise_input: String,
        weight_input: String,
        date_input: String,
        focused_field: AddLogField,
        error_message: Option<String>,
        // Known names matching the current exercise input
        exercise_suggestions: Vec<String>,
        suggestion_index: Option<usize>,
    },
    ConfirmDeleteLog {
        log_id: String,
        exercise: String,
        date: NaiveDate,
    },
}

// Holds the application state
pub struct App {
    pub tracker: GymTracker,
    pub active_tab: ActiveTab,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    pub last_error: Option<String>, // For status bar errors
    pub error_clear_time: Option<Instant>,

    // === Schedule Tab State ===
    pub schedule_week: Week,
    pub schedule_focus: ScheduleFocus,
    pub schedule_day_state: ListState,
    pub schedule_exercise_state: TableState,

    // === Log Tab State ===
    pub log_table_state: TableState,

    // === Progress Tab State ===
    pub progress_exercises: Vec<String>,
    pub progress_list_state: ListState,
    pub progress_projection: Option<Result<ChartProjection, ChartError>>,

    // === Coach Tab State ===
    pub coach: Option<CoachSession>,
    pub coach_unavailable: Option<String>, // Why no session could be built
    pub coach_input: String,
    pub coach_include_logs: bool,
    pub coach_scroll: u16,
}

impl App {
    pub fn new(tracker: GymTracker) -> Self {
        let (coach, coach_unavailable) = match tracker.gemini_client() {
            Ok(client) => (Some(CoachSession::new(Arc::new(client))), None),
            Err(e) => {
                warn!(error = %e, "coach disabled");
                (None, Some(e.to_string()))
            }
        };
        let mut app = App {
            tracker,
            active_tab: ActiveTab::Schedule,
            should_quit: false,
            active_modal: ActiveModal::None,
            last_error: None,
            error_clear_time: None,
            schedule_week: Week::One,
            schedule_focus: ScheduleFocus::DayList,
            schedule_day_state: ListState::default(),
            schedule_exercise_state: TableState::default(),
            log_table_state: TableState::default(),
            progress_exercises: Vec::new(),
            progress_list_state: ListState::default(),
            progress_projection: None,
            coach,
            coach_unavailable,
            coach_input: String::new(),
            coach_include_logs: false,
            coach_scroll: 0,
        };
        app.schedule_day_state.select(Some(0));
        app.schedule_exercise_state.select(Some(0));
        app.log_table_state.select(Some(0));
        app.refresh_progress_exercises();
        app
    }

    // Method to set status bar errors
    pub fn set_error(&mut self, msg: String) {
        self.last_error = Some(msg);
        self.error_clear_time = Some(Instant::now() + ERROR_DISPLAY_TIME);
    }

    /// Per-frame housekeeping: expire status errors and pick up coach replies.
    pub fn tick(&mut self) {
        self.clear_expired_error();
        if let Some(session) = self.coach.as_mut() {
            if session.poll() {
                // Keep the newest message in view
                self.coach_scroll = 0;
            }
        }
    }

    fn clear_expired_error(&mut self) {
        if let Some(clear_time) = self.error_clear_time {
            if Instant::now() >= clear_time {
                self.last_error = None;
                self.error_clear_time = None;
            }
        }
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn selected_day_index(&self) -> usize {
        self.schedule_day_state.selected().unwrap_or(0)
    }

    /// Re-reads the exercise list and recomputes the chart for the selection.
    pub fn refresh_progress_exercises(&mut self) {
        let selected = self.selected_progress_exercise().map(str::to_owned);
        self.progress_exercises = self.tracker.exercise_names();
        let index = selected
            .and_then(|name| self.progress_exercises.iter().position(|n| *n == name))
            .or(if self.progress_exercises.is_empty() {
                None
            } else {
                Some(0)
            });
        self.progress_list_state.select(index);
        self.refresh_projection();
    }

    pub fn selected_progress_exercise(&self) -> Option<&str> {
        self.progress_list_state
            .selected()
            .and_then(|i| self.progress_exercises.get(i))
            .map(String::as_str)
    }

    pub fn refresh_projection(&mut self) {
        self.progress_projection = self
            .selected_progress_exercise()
            .map(|name| self.tracker.progress(name));
    }
}
