use anyhow::Result;
use chrono::NaiveDate;
use gym_tracker_lib::{
    chart, storage, ChartError, Config, ContextKind, ExerciseField, GymTracker, KeyValueStore,
    MemoryStore, SqliteStore, StorageError, Week,
};
use std::cell::Cell;
use std::rc::Rc;

// A memory store whose writes can be made to fail
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: Rc<Cell<bool>>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }
}

fn create_flaky_tracker() -> (GymTracker, Rc<Cell<bool>>) {
    let fail_writes = Rc::new(Cell::new(false));
    let store = FlakyStore {
        inner: MemoryStore::default(),
        fail_writes: Rc::clone(&fail_writes),
    };
    (reopen(Box::new(store)), fail_writes)
}

// Helper function to create a tracker over an in-memory database
fn create_test_tracker() -> Result<GymTracker> {
    let store = SqliteStore::open_in_memory()?;
    Ok(reopen(Box::new(store)))
}

fn reopen(store: Box<dyn KeyValueStore>) -> GymTracker {
    GymTracker::with_store(
        Config::default(),
        "test_config.toml".into(),
        ":memory:".into(),
        store,
    )
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

#[test]
fn test_default_schedule_loads_without_persisted_data() -> Result<()> {
    let tracker = create_test_tracker()?;

    for week in [Week::One, Week::Two] {
        let days = tracker.week(week);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].focus, "Anterior (Front)");
        assert_eq!(days[0].day, "Day 1");
    }
    assert!(tracker.logs().is_empty());
    Ok(())
}

#[test]
fn test_replace_day_round_trip() -> Result<()> {
    let mut tracker = create_test_tracker()?;

    let mut day = tracker.get_day(Week::Two, 4)?.clone();
    day.focus = "Pull (Heavy)".to_string();
    day.exercises[0].reps = "3".to_string();
    day.exercises.push(gym_tracker_lib::ExerciseDetail {
        id: "x1".to_string(),
        name: String::new(), // Empty fields are allowed
        sets: String::new(),
        reps: String::new(),
    });

    tracker.replace_day(Week::Two, 4, day.clone())?;
    assert_eq!(tracker.get_day(Week::Two, 4)?, &day);
    // Neighbouring days and the other week are untouched
    assert_eq!(tracker.get_day(Week::Two, 3)?.focus, "Push");
    assert_eq!(tracker.get_day(Week::One, 4)?.focus, "Arnold - Shoulders & Arms");

    assert!(tracker.replace_day(Week::One, 7, day).is_err());
    Ok(())
}

#[test]
fn test_draft_commit_and_cancel() -> Result<()> {
    let mut tracker = create_test_tracker()?;

    // Cancel: drop the draft
    {
        let mut draft = tracker.begin_edit(Week::One, 2)?;
        draft.set_focus("Should not stick");
        draft.add_exercise();
    }
    assert_eq!(tracker.get_day(Week::One, 2)?.focus, "Active Rest");
    assert_eq!(tracker.get_day(Week::One, 2)?.exercises.len(), 2);

    // Commit
    let mut draft = tracker.begin_edit(Week::One, 2)?;
    draft.set_focus("Conditioning");
    let new_id = draft.add_exercise();
    assert!(draft.update_exercise(&new_id, ExerciseField::Name, "Sled Push"));
    assert!(draft.update_exercise(&new_id, ExerciseField::Sets, "4"));
    assert!(draft.remove_exercise("12"));
    tracker.commit_day(draft)?;

    let day = tracker.get_day(Week::One, 2)?;
    assert_eq!(day.focus, "Conditioning");
    let names: Vec<&str> = day.exercise_names().collect();
    assert_eq!(names, vec!["Boxing / Bag Work", "Sled Push"]);
    assert_eq!(day.exercises[1].sets, "4");
    assert_eq!(day.exercises[1].reps, "10");
    Ok(())
}

#[test]
fn test_add_and_delete_logs_newest_first() -> Result<()> {
    let mut tracker = create_test_tracker()?;

    let a = tracker.add_log(date("2024-01-01"), "Squat", "100")?;
    let b = tracker.add_log(date("2024-01-02"), "Bench Press", "60")?;
    let c = tracker.add_log(date("2024-01-03"), "Deadlift", "140")?;

    let ids: Vec<&str> = tracker.logs().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec![c.id.as_str(), b.id.as_str(), a.id.as_str()]);

    assert!(tracker.delete_log(&b.id)?);
    assert!(!tracker.delete_log(&b.id)?); // Already gone: no-op
    assert!(!tracker.delete_log("does-not-exist")?);

    let ids: Vec<&str> = tracker.logs().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec![c.id.as_str(), a.id.as_str()]);
    Ok(())
}

#[test]
fn test_blank_log_input_is_rejected() -> Result<()> {
    let mut tracker = create_test_tracker()?;
    let result = tracker.add_log(date("2024-01-01"), "", "60");
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Exercise name cannot be empty"));
    assert!(tracker.logs().is_empty());
    Ok(())
}

#[test]
fn test_exercise_names_merge_logs_and_schedule() -> Result<()> {
    let mut tracker = create_test_tracker()?;
    tracker.add_log(date("2024-01-01"), "Zercher Squat", "80")?;
    tracker.add_log(date("2024-01-02"), "Bench Press", "60")?; // Also in both weeks

    let mut draft = tracker.begin_edit(Week::One, 0)?;
    draft.add_exercise(); // Blank name must not show up
    tracker.commit_day(draft)?;

    let names = tracker.exercise_names();
    assert!(names.iter().all(|n| !n.is_empty()));
    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(names, sorted);
    assert_eq!(names.iter().filter(|n| *n == "Bench Press").count(), 1);
    assert!(names.contains(&"Zercher Squat".to_string()));
    assert!(names.contains(&"Full Recovery".to_string()));
    Ok(())
}

#[test]
fn test_bench_press_progress_scenario() -> Result<()> {
    let mut tracker = create_test_tracker()?;
    tracker.add_log(date("2024-01-01"), "Bench Press", "60")?;
    tracker.add_log(date("2024-01-08"), "Bench Press", "62.5")?;
    tracker.add_log(date("2024-01-05"), "Squat", "100")?;

    let filtered = tracker.logs_for_exercise("Bench Press");
    assert_eq!(filtered.len(), 2);
    // Store order is newest first
    assert_eq!(filtered[0].weight, 62.5);

    let projection = tracker.progress("Bench Press")?;
    assert_eq!(projection.points.len(), 2);
    assert_eq!(projection.points[0].date, date("2024-01-01"));
    assert_eq!(projection.points[1].date, date("2024-01-08"));
    // Heavier weight plots higher, i.e. smaller y
    assert!(projection.points[1].y < projection.points[0].y);
    assert_eq!(projection.points[0].x, 40.0);
    assert_eq!(projection.points[1].x, 560.0);
    Ok(())
}

#[test]
fn test_projection_ignores_input_order() -> Result<()> {
    let mut tracker = create_test_tracker()?;
    for (d, w) in [("2024-02-01", "70"), ("2024-01-01", "65"), ("2024-03-01", "72.5")] {
        tracker.add_log(date(d), "Overhead Press", w)?;
    }
    let entries = tracker.logs_for_exercise("Overhead Press");
    let mut reversed = entries.clone();
    reversed.reverse();

    let first = chart::project(&entries)?;
    assert_eq!(first, chart::project(&reversed)?);
    assert_eq!(first, chart::project(&entries)?);
    let dates: Vec<NaiveDate> = first.points.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![date("2024-01-01"), date("2024-02-01"), date("2024-03-01")]);
    Ok(())
}

#[test]
fn test_progress_with_one_entry_is_insufficient() -> Result<()> {
    let mut tracker = create_test_tracker()?;
    tracker.add_log(date("2024-01-01"), "Plank", "0")?;
    assert_eq!(
        tracker.progress("Plank"),
        Err(ChartError::InsufficientData { found: 1 })
    );
    assert_eq!(
        tracker.progress("Never Logged"),
        Err(ChartError::InsufficientData { found: 0 })
    );
    Ok(())
}

#[test]
fn test_state_survives_reopen() -> Result<()> {
    let mut tracker = create_test_tracker()?;
    let entry = tracker.add_log(date("2024-01-01"), "Squat", "100")?;
    let mut draft = tracker.begin_edit(Week::Two, 6)?;
    draft.set_focus("Mobility");
    tracker.commit_day(draft)?;

    let tracker = reopen(tracker.into_store());
    assert_eq!(tracker.logs(), &[entry]);
    assert_eq!(tracker.get_day(Week::Two, 6)?.focus, "Mobility");
    assert_eq!(tracker.get_day(Week::One, 6)?.focus, "Rest");
    Ok(())
}

#[test]
fn test_nan_weight_is_stored_and_survives_reopen() -> Result<()> {
    let mut tracker = create_test_tracker()?;
    let entry = tracker.add_log(date("2024-01-01"), "Squat", "abc")?;
    assert!(entry.weight.is_nan());

    let tracker = reopen(tracker.into_store());
    assert_eq!(tracker.logs().len(), 1);
    assert!(tracker.logs()[0].weight.is_nan());
    Ok(())
}

#[test]
fn test_corrupt_storage_falls_back_to_defaults() -> Result<()> {
    let mut store = MemoryStore::default();
    store.set(storage::WEEK1_KEY, "[{\"day\": 1")?;
    store.set(storage::LOGS_KEY, "not json at all")?;
    store.set(storage::WEEK2_KEY, "[]")?;

    let tracker = reopen(Box::new(store));
    assert_eq!(tracker.week(Week::One).len(), 7);
    assert!(tracker.logs().is_empty());
    // A readable value is used as-is, even if empty
    assert!(tracker.week(Week::Two).is_empty());
    Ok(())
}

#[test]
fn test_stored_json_uses_plain_field_names() -> Result<()> {
    let mut tracker = create_test_tracker()?;
    tracker.add_log(date("2024-01-01"), "Squat", "100")?;
    let store = tracker.into_store();

    let logs = store.get(storage::LOGS_KEY)?.expect("logs written");
    let value: serde_json::Value = serde_json::from_str(&logs)?;
    assert_eq!(value[0]["date"], "2024-01-01");
    assert_eq!(value[0]["exercise"], "Squat");
    assert_eq!(value[0]["weight"], 100.0);

    // Weeks are only written once edited
    assert!(store.get(storage::WEEK1_KEY)?.is_none());
    Ok(())
}

#[test]
fn test_coach_context_respects_log_limit() -> Result<()> {
    let mut tracker = create_test_tracker()?;
    tracker.config.coach.recent_log_limit = 2;
    tracker.add_log(date("2024-01-01"), "Squat", "100")?;
    tracker.add_log(date("2024-01-02"), "Squat", "102.5")?;
    tracker.add_log(date("2024-01-03"), "Squat", "105")?;

    let context = tracker.coach_context(ContextKind::Logs);
    assert!(context.contains("Current User Schedule Week 2: [{\"day\":\"Day 1\""));
    assert!(context.ends_with("User logs:\n2024-01-03: Squat @ 105kg\n2024-01-02: Squat @ 102.5kg"));

    let general = tracker.coach_context(ContextKind::General);
    assert!(!general.contains("Squat @"));
    Ok(())
}

#[test]
fn test_failed_log_writes_leave_log_unchanged() -> Result<()> {
    let (mut tracker, fail_writes) = create_flaky_tracker();
    let kept = tracker.add_log(date("2024-01-01"), "Squat", "100")?;

    fail_writes.set(true);
    assert!(tracker.add_log(date("2024-01-02"), "Squat", "105").is_err());
    assert!(tracker.add_log(date("2024-01-02"), "Squat", "105").is_err());
    assert_eq!(tracker.logs(), &[kept.clone()]);

    assert!(tracker.delete_log(&kept.id).is_err());
    assert_eq!(tracker.logs(), &[kept.clone()]);

    fail_writes.set(false);
    assert!(tracker.delete_log(&kept.id)?);
    assert!(tracker.logs().is_empty());
    Ok(())
}

#[test]
fn test_failed_day_write_leaves_schedule_unchanged() -> Result<()> {
    let (mut tracker, fail_writes) = create_flaky_tracker();
    let before = tracker.get_day(Week::One, 0)?.clone();

    let mut draft = tracker.begin_edit(Week::One, 0)?;
    draft.set_focus("Cardio");
    fail_writes.set(true);
    assert!(tracker.commit_day(draft).is_err());
    assert_eq!(tracker.get_day(Week::One, 0)?, &before);
    Ok(())
}

#[test]
fn test_infinite_weight_is_stored_as_nan() -> Result<()> {
    let mut tracker = create_test_tracker()?;
    let entry = tracker.add_log(date("2024-01-01"), "Squat", "inf")?;
    assert!(entry.weight.is_nan());

    let tracker = reopen(tracker.into_store());
    assert!(tracker.logs()[0].weight.is_nan());
    Ok(())
}
