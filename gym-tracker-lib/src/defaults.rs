//src/defaults.rs
use crate::model::{ExerciseDetail, WorkoutDay};

fn ex(id: &str, name: &str, sets: &str, reps: &str) -> ExerciseDetail {
    ExerciseDetail {
        id: id.to_string(),
        name: name.to_string(),
        sets: sets.to_string(),
        reps: reps.to_string(),
    }
}

fn day(label: &str, focus: &str, exercises: Vec<ExerciseDetail>) -> WorkoutDay {
    WorkoutDay {
        day: label.to_string(),
        focus: focus.to_string(),
        exercises,
    }
}

/// Anterior/Posterior + Arnold split.
pub fn default_week1() -> Vec<WorkoutDay> {
    vec![
        day(
            "Day 1",
            "Anterior (Front)",
            vec![
                ex("1", "Bench Press", "3", "8-12"),
                ex("2", "Squats", "3", "8-10"),
                ex("3", "Overhead Press", "3", "10-12"),
                ex("4", "Leg Extensions", "3", "12-15"),
                ex("5", "Plank", "3", "60s"),
            ],
        ),
        day(
            "Day 2",
            "Posterior (Back)",
            vec![
                ex("6", "Deadlift", "3", "5-8"),
                ex("7", "Pull Ups", "3", "Failure"),
                ex("8", "Barbell Rows", "3", "8-12"),
                ex("9", "Hamstring Curls", "3", "12-15"),
                ex("10", "Face Pulls", "3", "15-20"),
            ],
        ),
        day(
            "Day 3",
            "Active Rest",
            vec![
                ex("11", "Boxing / Bag Work", "5", "3 mins"),
                ex("12", "Light Cardio", "1", "30 mins"),
            ],
        ),
        day(
            "Day 4",
            "Arnold - Chest & Back",
            vec![
                ex("13", "Incline Bench", "3", "8-12"),
                ex("14", "T-Bar Row", "3", "10-12"),
                ex("15", "Dumbbell Flys", "3", "12-15"),
                ex("16", "Lat Pulldowns", "3", "10-12"),
            ],
        ),
        day(
            "Day 5",
            "Arnold - Shoulders & Arms",
            vec![
                ex("17", "Arnold Press", "3", "10-12"),
                ex("18", "Lateral Raises", "4", "15"),
                ex("19", "Barbell Curls", "3", "10-12"),
                ex("20", "Skullcrushers", "3", "10-12"),
            ],
        ),
        day(
            "Day 6",
            "Arnold - Legs",
            vec![
                ex("21", "Front Squat", "3", "8-10"),
                ex("22", "Lunges", "3", "12/leg"),
                ex("23", "Calf Raises", "4", "15-20"),
            ],
        ),
        day(
            "Day 7",
            "Rest",
            vec![ex("24", "Stretching / Mobility", "1", "20 mins")],
        ),
    ]
}

/// Anterior/Posterior + Push/Pull/Legs split.
pub fn default_week2() -> Vec<WorkoutDay> {
    vec![
        day(
            "Day 1",
            "Anterior (Front)",
            vec![
                ex("w2-1", "Dumbbell Press", "3", "8-12"),
                ex("w2-2", "Leg Press", "3", "10-12"),
                ex("w2-3", "Military Press", "3", "8-10"),
            ],
        ),
        day(
            "Day 2",
            "Posterior (Back)",
            vec![
                ex("w2-4", "Rack Pulls", "3", "6-8"),
                ex("w2-5", "Chin Ups", "3", "Failure"),
                ex("w2-6", "Glute Bridges", "3", "12"),
            ],
        ),
        day(
            "Day 3",
            "Active Rest",
            vec![ex("w2-7", "Cardio & Boxing", "1", "45 mins")],
        ),
        day(
            "Day 4",
            "Push",
            vec![
                ex("w2-8", "Bench Press", "3", "5-8"),
                ex("w2-9", "Dumbbell Shoulder Press", "3", "8-12"),
                ex("w2-10", "Tricep Pushdowns", "3", "12-15"),
            ],
        ),
        day(
            "Day 5",
            "Pull",
            vec![
                ex("w2-11", "Deadlift", "3", "5"),
                ex("w2-12", "Lat Pulldown", "3", "10-12"),
                ex("w2-13", "Hammer Curls", "3", "12"),
            ],
        ),
        day(
            "Day 6",
            "Legs",
            vec![
                ex("w2-14", "Squat", "3", "5-8"),
                ex("w2-15", "RDL", "3", "8-10"),
                ex("w2-16", "Leg Extensions", "3", "15"),
            ],
        ),
        day(
            "Day 7",
            "Rest",
            vec![ex("w2-17", "Full Recovery", "-", "-")],
        ),
    ]
}
