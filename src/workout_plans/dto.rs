use serde::Deserialize;
use time::OffsetDateTime;

use super::model::{PlanGoal, PlanLevel, ScheduleDay, SessionRecord, Weekday, WorkoutPlan};
use crate::error::ApiError;
use crate::extractors::require_text;

fn check_schedule(schedule: &[ScheduleDay]) -> Result<(), ApiError> {
    for day in schedule {
        for exercise in &day.exercises {
            require_text(&exercise.name, "exercise name")?;
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub level: PlanLevel,
    pub duration: u32,
    #[serde(default)]
    pub schedule: Vec<ScheduleDay>,
    #[serde(default)]
    pub goals: Vec<PlanGoal>,
    #[serde(default)]
    pub equipment: Vec<String>,
    pub estimated_time: u32,
    pub is_active: Option<bool>,
}

impl CreatePlanRequest {
    /// Plans are active unless the client says otherwise.
    pub fn into_plan(self) -> Result<WorkoutPlan, ApiError> {
        check_schedule(&self.schedule)?;
        Ok(WorkoutPlan {
            name: require_text(&self.name, "name")?,
            description: self.description,
            level: self.level,
            duration: self.duration,
            schedule: self.schedule,
            goals: self.goals,
            equipment: self.equipment,
            estimated_time: self.estimated_time,
            is_active: self.is_active.unwrap_or(true),
            progress: Vec::new(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub level: Option<PlanLevel>,
    pub duration: Option<u32>,
    pub schedule: Option<Vec<ScheduleDay>>,
    pub goals: Option<Vec<PlanGoal>>,
    pub equipment: Option<Vec<String>>,
    pub estimated_time: Option<u32>,
    pub is_active: Option<bool>,
}

impl UpdatePlanRequest {
    /// Returns true when this update switches the plan on.
    pub fn apply(self, plan: &mut WorkoutPlan) -> Result<bool, ApiError> {
        if let Some(name) = self.name {
            plan.name = require_text(&name, "name")?;
        }
        if let Some(description) = self.description {
            plan.description = Some(description);
        }
        if let Some(level) = self.level {
            plan.level = level;
        }
        if let Some(duration) = self.duration {
            plan.duration = duration;
        }
        if let Some(schedule) = self.schedule {
            check_schedule(&schedule)?;
            plan.schedule = schedule;
        }
        if let Some(goals) = self.goals {
            plan.goals = goals;
        }
        if let Some(equipment) = self.equipment {
            plan.equipment = equipment;
        }
        if let Some(minutes) = self.estimated_time {
            plan.estimated_time = minutes;
        }
        let activated = self.is_active == Some(true) && !plan.is_active;
        if let Some(active) = self.is_active {
            plan.is_active = active;
        }
        Ok(activated)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecordSessionRequest {
    pub week: u32,
    pub day: Weekday,
    pub completed: bool,
    pub notes: Option<String>,
}

impl RecordSessionRequest {
    pub fn into_record(self, now: OffsetDateTime) -> SessionRecord {
        SessionRecord {
            week: self.week,
            day: self.day,
            completed: self.completed,
            date: now,
            notes: self.notes,
        }
    }
}
