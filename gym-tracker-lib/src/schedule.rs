//src/schedule.rs
use crate::defaults::{default_week1, default_week2};
use crate::model::{ExerciseDetail, ExerciseField, Week, WorkoutDay};
use rand::Rng;
use thiserror::Error;

const EXERCISE_ID_LEN: usize = 9;
const EXERCISE_ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const NEW_EXERCISE_SETS: &str = "3";
const NEW_EXERCISE_REPS: &str = "10";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{week} has no day at position {index} (it has {len} days)")]
    DayOutOfRange { week: Week, index: usize, len: usize },
}

/// The two training weeks. Day order is positional and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    week1: Vec<WorkoutDay>,
    week2: Vec<WorkoutDay>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new(default_week1(), default_week2())
    }
}

impl Schedule {
    pub const fn new(week1: Vec<WorkoutDay>, week2: Vec<WorkoutDay>) -> Self {
        Self { week1, week2 }
    }

    pub fn week(&self, week: Week) -> &[WorkoutDay] {
        match week {
            Week::One => &self.week1,
            Week::Two => &self.week2,
        }
    }

    fn week_mut(&mut self, week: Week) -> &mut Vec<WorkoutDay> {
        match week {
            Week::One => &mut self.week1,
            Week::Two => &mut self.week2,
        }
    }

    /// Returns the day at `index` in `week`.
    /// # Errors
    /// `ScheduleError::DayOutOfRange` if `index` is past the end of the week.
    pub fn get_day(&self, week: Week, index: usize) -> Result<&WorkoutDay, ScheduleError> {
        let days = self.week(week);
        days.get(index).ok_or(ScheduleError::DayOutOfRange {
            week,
            index,
            len: days.len(),
        })
    }

    /// Overwrites the day at `index`. The contents are not validated.
    /// # Errors
    /// `ScheduleError::DayOutOfRange` if `index` is past the end of the week.
    pub fn replace_day(
        &mut self,
        week: Week,
        index: usize,
        day: WorkoutDay,
    ) -> Result<(), ScheduleError> {
        let days = self.week_mut(week);
        let len = days.len();
        let slot = days
            .get_mut(index)
            .ok_or(ScheduleError::DayOutOfRange { week, index, len })?;
        *slot = day;
        Ok(())
    }

    /// Stages a deep copy of a day for editing. Dropping the draft cancels.
    /// # Errors
    /// `ScheduleError::DayOutOfRange` if `index` is past the end of the week.
    pub fn begin_edit(&self, week: Week, index: usize) -> Result<DayDraft, ScheduleError> {
        let day = self.get_day(week, index)?.clone();
        Ok(DayDraft { week, index, day })
    }

    /// Every exercise name across both weeks, in schedule order (may repeat).
    pub fn exercise_names(&self) -> impl Iterator<Item = &str> {
        self.week1
            .iter()
            .chain(self.week2.iter())
            .flat_map(WorkoutDay::exercise_names)
    }
}

/// A staged, mutable copy of one scheduled day, bound to its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDraft {
    week: Week,
    index: usize,
    day: WorkoutDay,
}

impl DayDraft {
    pub const fn week(&self) -> Week {
        self.week
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn day(&self) -> &WorkoutDay {
        &self.day
    }

    pub fn set_focus(&mut self, focus: impl Into<String>) {
        self.day.focus = focus.into();
    }

    pub fn set_day_label(&mut self, label: impl Into<String>) {
        self.day.day = label.into();
    }

    /// Appends a blank exercise row with default sets/reps and returns its id.
    pub fn add_exercise(&mut self) -> String {
        let id = self.fresh_exercise_id();
        self.day.exercises.push(ExerciseDetail {
            id: id.clone(),
            name: String::new(),
            sets: NEW_EXERCISE_SETS.to_string(),
            reps: NEW_EXERCISE_REPS.to_string(),
        });
        id
    }

    /// Returns false if no exercise has that id.
    pub fn remove_exercise(&mut self, id: &str) -> bool {
        let before = self.day.exercises.len();
        self.day.exercises.retain(|ex| ex.id != id);
        self.day.exercises.len() != before
    }

    /// Returns false if no exercise has that id.
    pub fn update_exercise(&mut self, id: &str, field: ExerciseField, value: impl Into<String>) -> bool {
        let Some(ex) = self.day.exercises.iter_mut().find(|ex| ex.id == id) else {
            return false;
        };
        let value = value.into();
        match field {
            ExerciseField::Name => ex.name = value,
            ExerciseField::Sets => ex.sets = value,
            ExerciseField::Reps => ex.reps = value,
        }
        true
    }

    pub(crate) fn into_parts(self) -> (Week, usize, WorkoutDay) {
        (self.week, self.index, self.day)
    }

    fn fresh_exercise_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id: String = (0..EXERCISE_ID_LEN)
                .map(|_| {
                    let idx = rng.gen_range(0..EXERCISE_ID_CHARSET.len());
                    char::from(EXERCISE_ID_CHARSET[idx])
                })
                .collect();
            if !self.day.exercises.iter().any(|ex| ex.id == id) {
                return id;
            }
        }
    }
}
