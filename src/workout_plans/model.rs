use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::{Collection, Document};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PlanGoalType {
    Strength,
    Muscle,
    Endurance,
    WeightLoss,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Alternative {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `reps` ("8-12") and `weight` ("bodyweight") are free text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlannedExercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub weight: String,
    /// seconds
    pub rest_between_sets: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

fn default_rest() -> u32 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScheduleDay {
    pub day: Weekday,
    #[serde(default)]
    pub exercises: Vec<PlannedExercise>,
    #[serde(default = "default_rest")]
    pub rest_between_exercises: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlanGoal {
    #[serde(rename = "type")]
    pub kind: PlanGoalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub week: u32,
    pub day: Weekday,
    pub completed: bool,
    #[serde(with = "crate::dates::flexible")]
    pub date: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub level: PlanLevel,
    /// weeks
    pub duration: u32,
    pub schedule: Vec<ScheduleDay>,
    pub goals: Vec<PlanGoal>,
    pub equipment: Vec<String>,
    /// minutes
    pub estimated_time: u32,
    pub is_active: bool,
    #[serde(default)]
    pub progress: Vec<SessionRecord>,
}

impl Document for WorkoutPlan {
    const COLLECTION: Collection = Collection::WorkoutPlans;
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanStats {
    pub total_workouts: u64,
    pub completed_workouts: u64,
    pub completion_rate: i64,
}

impl PlanStats {
    /// Summed over every recorded session of every plan.
    pub fn tally<'a>(plans: impl IntoIterator<Item = &'a WorkoutPlan>) -> Self {
        let mut stats = Self::default();
        for session in plans.into_iter().flat_map(|p| p.progress.iter()) {
            stats.total_workouts += 1;
            if session.completed {
                stats.completed_workouts += 1;
            }
        }
        if stats.total_workouts > 0 {
            stats.completion_rate =
                (stats.completed_workouts as f64 / stats.total_workouts as f64 * 100.0).round() as i64;
        }
        stats
    }
}
