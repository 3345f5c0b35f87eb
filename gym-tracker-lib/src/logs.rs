//src/logs.rs
use crate::model::LogEntry;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LogError {
    #[error("Exercise name cannot be empty.")]
    EmptyExercise,
    #[error("Weight cannot be empty.")]
    EmptyWeight,
}

/// Weight-log entries, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogStore {
    entries: Vec<LogEntry>,
}

impl LogStore {
    pub const fn new(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a new entry stamped with the current time.
    /// # Errors
    /// `LogError` if the exercise or weight text is blank.
    pub fn add(&mut self, date: NaiveDate, exercise: &str, weight_text: &str) -> Result<LogEntry, LogError> {
        self.add_at(Utc::now(), date, exercise, weight_text)
    }

    /// Same as [`LogStore::add`] with an explicit creation time, which the id is derived from.
    /// # Errors
    /// `LogError` if the exercise or weight text is blank.
    pub fn add_at(
        &mut self,
        created: DateTime<Utc>,
        date: NaiveDate,
        exercise: &str,
        weight_text: &str,
    ) -> Result<LogEntry, LogError> {
        if exercise.trim().is_empty() {
            return Err(LogError::EmptyExercise);
        }
        if weight_text.trim().is_empty() {
            return Err(LogError::EmptyWeight);
        }

        let weight = parse_weight(weight_text);
        if weight.is_nan() {
            warn!(input = weight_text, "weight is not a number, storing NaN");
        }

        let entry = LogEntry {
            id: self.unique_id(created.timestamp_millis()),
            date,
            exercise: exercise.to_string(),
            weight,
        };
        self.entries.insert(0, entry.clone());
        Ok(entry)
    }

    /// Removes the entry with that id. Returns false (and changes nothing) if absent.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Exact-name matches, in store order (newest first).
    pub fn filter_by_exercise(&self, name: &str) -> Vec<LogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.exercise == name)
            .cloned()
            .collect()
    }

    /// The newest `limit` entries.
    pub fn recent(&self, limit: usize) -> &[LogEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn exercise_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.exercise.as_str())
    }

    fn unique_id(&self, millis: i64) -> String {
        let mut candidate = millis;
        while self.entries.iter().any(|e| e.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }
}

/// Parses weight text; anything that is not a finite number becomes NaN.
pub fn parse_weight(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite())
        .unwrap_or(f64::NAN)
}

/// Distinct, non-empty names from any number of sources, sorted.
pub fn known_exercise_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut store = LogStore::default();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = store.add_at(now, date("2024-01-01"), "Squat", "100").unwrap();
        let b = store.add_at(now, date("2024-01-01"), "Squat", "105").unwrap();
        assert_eq!(a.id, "1700000000000");
        assert_eq!(b.id, "1700000000001");
        assert_eq!(store.entries()[0], b);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut store = LogStore::default();
        assert_eq!(
            store.add(date("2024-01-01"), "  ", "60"),
            Err(LogError::EmptyExercise)
        );
        assert_eq!(
            store.add(date("2024-01-01"), "Bench Press", ""),
            Err(LogError::EmptyWeight)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn non_numeric_weight_is_stored_as_nan() {
        let mut store = LogStore::default();
        let entry = store.add(date("2024-01-01"), "Bench Press", "heavy").unwrap();
        assert!(entry.weight.is_nan());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn infinite_weight_text_is_not_a_number() {
        for text in ["inf", "-Infinity", "1e400", "NaN"] {
            assert!(parse_weight(text).is_nan(), "{text}");
        }
        assert_eq!(parse_weight(" 82.5 "), 82.5);
    }

    #[test]
    fn recent_is_clamped() {
        let mut store = LogStore::default();
        store.add(date("2024-01-01"), "Row", "50").unwrap();
        assert_eq!(store.recent(20).len(), 1);
        assert!(store.recent(0).is_empty());
    }

    #[test]
    fn known_names_are_distinct_sorted_and_non_empty() {
        let names = known_exercise_names(["Squat", "", "Bench Press", "Squat", "Deadlift"]);
        assert_eq!(names, vec!["Bench Press", "Deadlift", "Squat"]);
    }
}
