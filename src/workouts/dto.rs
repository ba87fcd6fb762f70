use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::model::{Exercise, Workout, WorkoutType};
use crate::error::ApiError;
use crate::extractors::{require_non_negative, require_text};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateWorkoutRequest {
    pub title: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default, with = "crate::dates::flexible::option")]
    pub date: Option<OffsetDateTime>,
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: WorkoutType,
    pub calories_burned: Option<f64>,
    pub notes: Option<String>,
}

fn check_exercises(exercises: &[Exercise]) -> Result<(), ApiError> {
    for e in exercises {
        require_text(&e.name, "exercise name")?;
        require_non_negative(e.weight, "exercise weight")?;
    }
    Ok(())
}

impl CreateWorkoutRequest {
    pub fn into_workout(self, now: OffsetDateTime) -> Result<Workout, ApiError> {
        check_exercises(&self.exercises)?;
        Ok(Workout {
            title: require_text(&self.title, "title")?,
            exercises: self.exercises,
            date: self.date.unwrap_or(now),
            duration: require_non_negative(self.duration, "duration")?,
            kind: self.kind,
            calories_burned: self
                .calories_burned
                .map(|c| require_non_negative(c, "caloriesBurned"))
                .transpose()?,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateWorkoutRequest {
    pub title: Option<String>,
    pub exercises: Option<Vec<Exercise>>,
    #[serde(default, with = "crate::dates::flexible::option")]
    pub date: Option<OffsetDateTime>,
    pub duration: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<WorkoutType>,
    pub calories_burned: Option<f64>,
    pub notes: Option<String>,
}

impl UpdateWorkoutRequest {
    pub fn apply(self, w: &mut Workout) -> Result<(), ApiError> {
        if let Some(title) = self.title {
            w.title = require_text(&title, "title")?;
        }
        if let Some(exercises) = self.exercises {
            check_exercises(&exercises)?;
            w.exercises = exercises;
        }
        if let Some(date) = self.date {
            w.date = date;
        }
        if let Some(duration) = self.duration {
            w.duration = require_non_negative(duration, "duration")?;
        }
        if let Some(kind) = self.kind {
            w.kind = kind;
        }
        if let Some(calories) = self.calories_burned {
            w.calories_burned = Some(require_non_negative(calories, "caloriesBurned")?);
        }
        if let Some(notes) = self.notes {
            w.notes = Some(notes);
        }
        Ok(())
    }
}

/// One row of `GET /workouts/stats/summary`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTypeSummary {
    #[serde(rename = "type")]
    pub kind: WorkoutType,
    pub count: u64,
    pub total_duration: f64,
    pub total_calories: f64,
}
