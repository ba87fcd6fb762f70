use serde::Deserialize;
use time::OffsetDateTime;

use super::model::{Achievement, AchievementCategory, AchievementProgress, Criteria};
use crate::error::ApiError;
use crate::extractors::{require_non_negative, require_text};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAchievementRequest {
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub criteria: Criteria,
    pub icon: String,
    pub progress: AchievementProgress,
    #[serde(default, with = "crate::dates::flexible::option")]
    pub date_earned: Option<OffsetDateTime>,
}

impl CreateAchievementRequest {
    /// `isCompleted` follows from the starting progress.
    pub fn into_achievement(self, now: OffsetDateTime) -> Result<Achievement, ApiError> {
        let progress = AchievementProgress {
            current: require_non_negative(self.progress.current, "progress.current")?,
            target: require_non_negative(self.progress.target, "progress.target")?,
        };
        Ok(Achievement {
            name: require_text(&self.name, "name")?,
            description: require_text(&self.description, "description")?,
            category: self.category,
            criteria: self.criteria,
            icon: require_text(&self.icon, "icon")?,
            date_earned: self.date_earned.unwrap_or(now),
            is_completed: progress.current >= progress.target,
            progress,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AchievementProgressRequest {
    pub current: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn current_defaults_to_zero() {
        let req: CreateAchievementRequest = serde_json::from_value(json!({
            "name": "First run", "description": "Log a run", "category": "milestone",
            "criteria": { "type": "count", "value": 1 }, "icon": "shoe",
            "progress": { "target": 1 }
        }))
        .unwrap();
        let a = req.into_achievement(OffsetDateTime::now_utc()).unwrap();
        assert_eq!(a.progress.current, 0.0);
        assert!(!a.is_completed);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let res: Result<CreateAchievementRequest, _> = serde_json::from_value(json!({
            "name": "x", "description": "y", "category": "social",
            "criteria": { "type": "count", "value": 1 }, "icon": "i",
            "progress": { "target": 1 }
        }));
        assert!(res.is_err());
    }
}
