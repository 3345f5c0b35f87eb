// src/lib.rs
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

// --- Declare modules ---
pub mod chart;
pub mod coach;
mod config;
pub mod defaults;
pub mod logs;
pub mod model;
pub mod schedule;
pub mod storage;

// --- Expose public types ---
pub use chart::{ChartError, ChartGeometry, ChartProjection, PlotPoint};
pub use coach::{
    CoachError, CoachSession, CoachState, CompletionClient, ContextKind, GeminiClient,
    QuickPrompt,
};
pub use config::{
    get_config_path as get_config_path_util, parse_color, CoachConfig, Config, ConfigError,
    StandardColor, Theme,
};
pub use logs::{LogError, LogStore};
pub use model::{ChatMessage, ChatRole, ExerciseDetail, ExerciseField, LogEntry, Week, WorkoutDay};
pub use schedule::{DayDraft, Schedule, ScheduleError};
pub use storage::{
    get_db_path as get_db_path_util, KeyValueStore, MemoryStore, SqliteStore, StorageError,
};

/// Top-level application state: configuration, both schedule weeks and the
/// weight log, mirrored to a key-value store on every change.
pub struct GymTracker {
    pub config: Config,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
    schedule: Schedule,
    logs: LogStore,
    store: Box<dyn KeyValueStore>,
}

impl GymTracker {
    /// Loads config and the SQLite store from their standard locations.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or opening fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = storage::get_db_path().context("Failed to determine database path")?;
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        Ok(Self::with_store(config, config_path, db_path, Box::new(store)))
    }

    /// Builds the tracker over any store, reading persisted state.
    /// Absent or malformed values fall back to the built-in weeks and an empty log.
    pub fn with_store(
        config: Config,
        config_path: PathBuf,
        db_path: PathBuf,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let week1 = storage::load_json_or(store.as_ref(), storage::WEEK1_KEY, defaults::default_week1);
        let week2 = storage::load_json_or(store.as_ref(), storage::WEEK2_KEY, defaults::default_week2);
        let logs: Vec<LogEntry> = storage::load_json_or(store.as_ref(), storage::LOGS_KEY, Vec::new);
        debug!(
            week1_days = week1.len(),
            week2_days = week2.len(),
            log_entries = logs.len(),
            "loaded state"
        );

        Self {
            config,
            config_path,
            db_path,
            schedule: Schedule::new(week1, week2),
            logs: LogStore::new(logs),
            store,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    // --- Schedule ---

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn week(&self, week: Week) -> &[WorkoutDay] {
        self.schedule.week(week)
    }

    /// # Errors
    /// `ScheduleError::DayOutOfRange` for a bad index.
    pub fn get_day(&self, week: Week, index: usize) -> Result<&WorkoutDay, ScheduleError> {
        self.schedule.get_day(week, index)
    }

    /// Replaces one day and persists that week.
    /// # Errors
    /// Bad index, or the week could not be written. Either way the schedule is unchanged.
    pub fn replace_day(&mut self, week: Week, index: usize, day: WorkoutDay) -> Result<()> {
        let previous = self.schedule.get_day(week, index)?.clone();
        self.schedule.replace_day(week, index, day)?;
        if let Err(e) = self.persist_week(week) {
            self.schedule.replace_day(week, index, previous)?;
            return Err(e);
        }
        Ok(())
    }

    /// Stages a copy of a day for editing. Drop the draft to cancel.
    /// # Errors
    /// `ScheduleError::DayOutOfRange` for a bad index.
    pub fn begin_edit(&self, week: Week, index: usize) -> Result<DayDraft, ScheduleError> {
        self.schedule.begin_edit(week, index)
    }

    /// Writes a draft back into its slot and persists the week.
    /// # Errors
    /// Bad index, or the week could not be written.
    pub fn commit_day(&mut self, draft: DayDraft) -> Result<()> {
        let (week, index, day) = draft.into_parts();
        self.replace_day(week, index, day)
    }

    // --- Logs ---

    /// Newest first.
    pub fn logs(&self) -> &[LogEntry] {
        self.logs.entries()
    }

    /// Records a weight for `exercise` on `date`. Weight text that is not a
    /// number is stored as NaN.
    /// # Errors
    /// `LogError` for blank input, or the log could not be written. Either way
    /// nothing is added.
    pub fn add_log(&mut self, date: NaiveDate, exercise: &str, weight_text: &str) -> Result<LogEntry> {
        let previous = self.logs.clone();
        let entry = self.logs.add(date, exercise, weight_text)?;
        self.persist_logs_or_restore(previous)?;
        Ok(entry)
    }

    /// Deletes a log entry. Returns whether anything was removed; unknown ids are a no-op.
    /// # Errors
    /// The log could not be written; the entry is kept.
    pub fn delete_log(&mut self, id: &str) -> Result<bool> {
        let previous = self.logs.clone();
        let removed = self.logs.delete(id);
        self.persist_logs_or_restore(previous)?;
        Ok(removed)
    }

    pub fn logs_for_exercise(&self, name: &str) -> Vec<LogEntry> {
        self.logs.filter_by_exercise(name)
    }

    /// Distinct non-empty exercise names from the logs and both weeks, sorted.
    pub fn exercise_names(&self) -> Vec<String> {
        logs::known_exercise_names(self.logs.exercise_names().chain(self.schedule.exercise_names()))
    }

    /// Chart projection of one exercise's history.
    /// # Errors
    /// `ChartError::InsufficientData` with fewer than two plottable entries.
    pub fn progress(&self, exercise: &str) -> Result<ChartProjection, ChartError> {
        chart::project(&self.logs.filter_by_exercise(exercise))
    }

    // --- Coach ---

    /// Context text for a coach request, from the current schedule and logs.
    pub fn coach_context(&self, kind: ContextKind) -> String {
        coach::build_context(
            self.schedule.week(Week::One),
            self.schedule.week(Week::Two),
            self.logs.recent(self.config.coach.recent_log_limit),
            kind,
        )
    }

    /// A Gemini client from config and the environment.
    /// # Errors
    /// `CoachError::MissingApiKey` when no key is configured.
    pub fn gemini_client(&self) -> Result<GeminiClient, CoachError> {
        GeminiClient::from_config(&self.config.coach, &self.config_path.display().to_string())
    }

    // --- Persistence ---

    /// Hands back the underlying store, e.g. to reopen it.
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    fn persist_week(&mut self, week: Week) -> Result<()> {
        let key = match week {
            Week::One => storage::WEEK1_KEY,
            Week::Two => storage::WEEK2_KEY,
        };
        storage::save_week(self.store.as_mut(), key, self.schedule.week(week))
            .with_context(|| format!("Failed to save {week}"))
    }

    fn persist_logs_or_restore(&mut self, previous: LogStore) -> Result<()> {
        let saved = storage::save_logs(self.store.as_mut(), self.logs.entries())
            .context("Failed to save logs");
        if saved.is_err() {
            self.logs = previous;
        }
        saved
    }
}
