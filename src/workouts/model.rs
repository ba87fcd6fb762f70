use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::{Collection, Document};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Flexibility,
    Hiit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub title: String,
    pub exercises: Vec<Exercise>,
    #[serde(with = "crate::dates::flexible")]
    pub date: OffsetDateTime,
    /// minutes
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: WorkoutType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Document for Workout {
    const COLLECTION: Collection = Collection::Workouts;
}
