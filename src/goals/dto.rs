use serde::Deserialize;
use time::OffsetDateTime;

use super::model::{Goal, GoalStatus, GoalType};
use crate::error::ApiError;
use crate::extractors::require_text;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateGoalRequest {
    #[serde(rename = "type")]
    pub kind: Option<GoalType>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    #[serde(default, with = "crate::dates::flexible::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "crate::dates::flexible::option")]
    pub target_date: Option<OffsetDateTime>,
}

impl CreateGoalRequest {
    fn missing_fields(&self) -> Vec<String> {
        let blank = |s: &Option<String>| s.as_deref().map_or(true, |v| v.trim().is_empty());
        [
            ("type", self.kind.is_none()),
            ("name", blank(&self.name)),
            ("targetValue", self.target_value.is_none()),
            ("currentValue", self.current_value.is_none()),
            ("unit", blank(&self.unit)),
            ("targetDate", self.target_date.is_none()),
        ]
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| name.to_string())
        .collect()
    }

    /// New goals always start `in-progress` with an empty history.
    pub fn into_goal(self, now: OffsetDateTime) -> Result<Goal, ApiError> {
        let missing = self.missing_fields();
        match (
            self.kind,
            self.name,
            self.target_value,
            self.current_value,
            self.unit,
            self.target_date,
        ) {
            (Some(kind), Some(name), Some(target_value), Some(current_value), Some(unit), Some(target_date))
                if missing.is_empty() =>
            {
                Ok(Goal {
                    kind,
                    name: require_text(&name, "name")?,
                    description: self.description,
                    target_value,
                    current_value,
                    unit: require_text(&unit, "unit")?,
                    start_date: self.start_date.unwrap_or(now),
                    target_date,
                    status: GoalStatus::InProgress,
                    progress: Vec::new(),
                })
            }
            _ => Err(ApiError::MissingFields(missing)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateGoalRequest {
    #[serde(rename = "type")]
    pub kind: Option<GoalType>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    #[serde(default, with = "crate::dates::flexible::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "crate::dates::flexible::option")]
    pub target_date: Option<OffsetDateTime>,
    pub status: Option<GoalStatus>,
}

impl UpdateGoalRequest {
    pub fn apply(self, goal: &mut Goal) -> Result<(), ApiError> {
        if let Some(kind) = self.kind {
            goal.kind = kind;
        }
        if let Some(name) = self.name {
            goal.name = require_text(&name, "name")?;
        }
        if let Some(description) = self.description {
            goal.description = Some(description);
        }
        if let Some(v) = self.target_value {
            goal.target_value = v;
        }
        if let Some(v) = self.current_value {
            goal.current_value = v;
        }
        if let Some(unit) = self.unit {
            goal.unit = require_text(&unit, "unit")?;
        }
        if let Some(d) = self.start_date {
            goal.start_date = d;
        }
        if let Some(d) = self.target_date {
            goal.target_date = d;
        }
        if let Some(status) = self.status {
            goal.status = status;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoalProgressRequest {
    pub value: f64,
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_are_listed_in_order() {
        let req: CreateGoalRequest = serde_json::from_value(json!({ "name": "Run 5k", "unit": " " })).unwrap();
        match req.into_goal(OffsetDateTime::now_utc()).unwrap_err() {
            ApiError::MissingFields(f) => assert_eq!(
                f,
                vec!["type", "targetValue", "currentValue", "unit", "targetDate"]
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn client_cannot_seed_status_on_create() {
        let res: Result<CreateGoalRequest, _> = serde_json::from_value(json!({
            "type": "weight", "name": "Cut", "targetValue": 75, "currentValue": 80,
            "unit": "kg", "targetDate": "2024-09-01", "status": "completed"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn complete_request_builds_in_progress_goal() {
        let req: CreateGoalRequest = serde_json::from_value(json!({
            "type": "endurance", "name": "Run 10k", "targetValue": 10, "currentValue": 4,
            "unit": "km", "targetDate": "2024-09-01"
        }))
        .unwrap();
        let now = OffsetDateTime::now_utc();
        let goal = req.into_goal(now).unwrap();
        assert_eq!(goal.status, GoalStatus::InProgress);
        assert_eq!(goal.start_date, now);
        assert!(goal.progress.is_empty());
    }
}
