//src/model.rs
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExerciseDetail {
    pub id: String, // Unique within its day
    pub name: String,
    pub sets: String, // Free text: "3", "-", ...
    pub reps: String, // Free text: "8-12", "Failure", "60s", ...
}

/// Which text field of an `ExerciseDetail` to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseField {
    Name,
    Sets,
    Reps,
}

impl FromStr for ExerciseField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "sets" => Ok(Self::Sets),
            "reps" => Ok(Self::Reps),
            _ => Err(ModelError::InvalidField(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkoutDay {
    pub day: String,
    pub focus: String,
    pub exercises: Vec<ExerciseDetail>,
}

impl WorkoutDay {
    pub fn exercise_names(&self) -> impl Iterator<Item = &str> {
        self.exercises.iter().map(|ex| ex.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Week {
    One,
    Two,
}

impl Week {
    pub const fn number(self) -> u8 {
        match self {
            Week::One => 1,
            Week::Two => 2,
        }
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Week {}", self.number())
    }
}

impl FromStr for Week {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "week1" | "one" => Ok(Week::One),
            "2" | "week2" | "two" => Ok(Week::Two),
            _ => Err(ModelError::InvalidWeek(s.to_string())),
        }
    }
}

/// One recorded (date, exercise, weight) observation.
///
/// `weight` may be NaN when the entered text was not a number. JSON has no
/// NaN, so it is written as `null` and read back as NaN.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub id: String,
    pub date: NaiveDate,
    pub exercise: String,
    #[serde(
        serialize_with = "serialize_weight",
        deserialize_with = "deserialize_weight"
    )]
    pub weight: f64,
}

// NaN != NaN, so compare weights bitwise-ish: two NaNs are the same entry value.
impl PartialEq for LogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.date == other.date
            && self.exercise == other.exercise
            && (self.weight == other.weight || (self.weight.is_nan() && other.weight.is_nan()))
    }
}

fn serialize_weight<S: Serializer>(weight: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if weight.is_finite() {
        serializer.serialize_f64(*weight)
    } else {
        serializer.serialize_none()
    }
}

fn deserialize_weight<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid week '{0}'. Use 1 or 2.")]
    InvalidWeek(String),
    #[error("Invalid exercise field '{0}'. Use name, sets or reps.")]
    InvalidField(String),
}

/// Formats a weight the way it is shown to users and sent to the coach:
/// whole numbers without a fraction ("60"), others as-is ("62.5").
pub fn format_weight(weight: f64) -> String {
    format!("{weight}")
}
