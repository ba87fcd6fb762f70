use serde::Deserialize;
use time::OffsetDateTime;

use super::model::{Measurements, ProgressEntry, ProgressType, WorkoutDetails};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProgressRequest {
    #[serde(default, with = "crate::dates::flexible::option")]
    pub date: Option<OffsetDateTime>,
    #[serde(rename = "type")]
    pub kind: ProgressType,
    pub value: f64,
    pub notes: Option<String>,
    pub workout_details: Option<WorkoutDetails>,
    pub measurements: Option<Measurements>,
}

impl CreateProgressRequest {
    pub fn into_entry(self, now: OffsetDateTime) -> Result<ProgressEntry, ApiError> {
        if !self.value.is_finite() {
            return Err(ApiError::Validation("value must be a number".into()));
        }
        Ok(ProgressEntry {
            date: self.date.unwrap_or(now),
            kind: self.kind,
            value: self.value,
            notes: self.notes,
            workout_details: self.workout_details,
            measurements: self.measurements,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProgressRequest {
    #[serde(default, with = "crate::dates::flexible::option")]
    pub date: Option<OffsetDateTime>,
    #[serde(rename = "type")]
    pub kind: Option<ProgressType>,
    pub value: Option<f64>,
    pub notes: Option<String>,
    pub workout_details: Option<WorkoutDetails>,
    pub measurements: Option<Measurements>,
}

impl UpdateProgressRequest {
    pub fn apply(self, entry: &mut ProgressEntry) {
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(kind) = self.kind {
            entry.kind = kind;
        }
        if let Some(value) = self.value {
            entry.value = value;
        }
        if let Some(notes) = self.notes {
            entry.notes = Some(notes);
        }
        if let Some(details) = self.workout_details {
            entry.workout_details = Some(details);
        }
        if let Some(m) = self.measurements {
            entry.measurements = Some(m);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn measurement_entry_keeps_only_given_sizes() {
        let req: CreateProgressRequest = serde_json::from_value(json!({
            "type": "measurements", "value": 0, "date": "2024-04-02",
            "measurements": { "waist": 82.5 }
        }))
        .unwrap();
        let entry = req.into_entry(OffsetDateTime::now_utc()).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["measurements"], json!({ "waist": 82.5 }));
        assert_eq!(json["date"], "2024-04-02T00:00:00Z");
        assert!(json.get("workoutDetails").is_none());
    }

    #[test]
    fn patch_leaves_untouched_fields() {
        let mut entry = serde_json::from_value::<CreateProgressRequest>(json!({ "type": "weight", "value": 80 }))
            .unwrap()
            .into_entry(OffsetDateTime::now_utc())
            .unwrap();
        let patch: UpdateProgressRequest = serde_json::from_value(json!({ "value": 79.4 })).unwrap();
        patch.apply(&mut entry);
        assert_eq!(entry.value, 79.4);
        assert_eq!(entry.kind, ProgressType::Weight);
    }
}
