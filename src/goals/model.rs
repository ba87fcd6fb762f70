use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::{Collection, Document, Stored};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Weight,
    Strength,
    Endurance,
    Nutrition,
}

impl GoalType {
    /// Whether logging a value at or past the target completes the goal.
    pub fn completes_on_target(self) -> bool {
        !matches!(self, GoalType::Nutrition)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    #[default]
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub value: f64,
    #[serde(with = "crate::dates::flexible")]
    pub date: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: String,
    #[serde(with = "crate::dates::flexible")]
    pub start_date: OffsetDateTime,
    #[serde(with = "crate::dates::flexible")]
    pub target_date: OffsetDateTime,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub progress: Vec<ProgressEntry>,
}

impl Goal {
    /// `round(current / target * 100)` clamped to `0..=100`; 0 for a zero target.
    pub fn progress_percentage(&self) -> i64 {
        if self.target_value == 0.0 {
            return 0;
        }
        let pct = (self.current_value / self.target_value * 100.0).round();
        pct.clamp(0.0, 100.0) as i64
    }

    pub fn record(&mut self, value: f64, note: Option<String>, at: OffsetDateTime) {
        self.progress.push(ProgressEntry { value, date: at, note });
        self.current_value = value;
        if self.kind.completes_on_target() && value >= self.target_value {
            self.status = GoalStatus::Completed;
        }
    }
}

impl Document for Goal {
    const COLLECTION: Collection = Collection::Goals;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    #[serde(flatten)]
    pub goal: Stored<Goal>,
    pub progress_percentage: i64,
}

impl From<Stored<Goal>> for GoalResponse {
    fn from(goal: Stored<Goal>) -> Self {
        let progress_percentage = goal.doc.progress_percentage();
        Self { goal, progress_percentage }
    }
}

/// Count per status; every status is present even when zero.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct GoalStats {
    #[serde(rename = "in-progress")]
    pub in_progress: u64,
    pub completed: u64,
    pub failed: u64,
}

impl GoalStats {
    pub fn count<'a>(goals: impl IntoIterator<Item = &'a Goal>) -> Self {
        let mut stats = Self::default();
        for g in goals {
            match g.status {
                GoalStatus::InProgress => stats.in_progress += 1,
                GoalStatus::Completed => stats.completed += 1,
                GoalStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn goal(kind: GoalType, current: f64, target: f64) -> Goal {
        Goal {
            kind,
            name: "Bench 100".into(),
            description: None,
            target_value: target,
            current_value: current,
            unit: "kg".into(),
            start_date: datetime!(2024-01-01 0:00 UTC),
            target_date: datetime!(2024-06-01 0:00 UTC),
            status: GoalStatus::InProgress,
            progress: vec![],
        }
    }

    #[test]
    fn percentage_is_rounded_and_clamped() {
        assert_eq!(goal(GoalType::Strength, 33.0, 100.0).progress_percentage(), 33);
        assert_eq!(goal(GoalType::Strength, 2.0, 3.0).progress_percentage(), 67);
        assert_eq!(goal(GoalType::Strength, 150.0, 100.0).progress_percentage(), 100);
        assert_eq!(goal(GoalType::Weight, -5.0, 100.0).progress_percentage(), 0);
        assert_eq!(goal(GoalType::Weight, 5.0, 0.0).progress_percentage(), 0);
    }

    #[test]
    fn reaching_target_completes_measurable_goals() {
        let at = datetime!(2024-03-01 9:00 UTC);
        for kind in [GoalType::Weight, GoalType::Strength, GoalType::Endurance] {
            let mut g = goal(kind, 80.0, 100.0);
            g.record(99.0, None, at);
            assert_eq!(g.status, GoalStatus::InProgress);
            g.record(100.0, Some("PR".into()), at);
            assert_eq!(g.status, GoalStatus::Completed);
            assert_eq!(g.current_value, 100.0);
            assert_eq!(g.progress.len(), 2);
        }
    }

    #[test]
    fn nutrition_goals_never_auto_complete() {
        let mut g = goal(GoalType::Nutrition, 0.0, 2000.0);
        g.record(2500.0, None, datetime!(2024-03-01 9:00 UTC));
        assert_eq!(g.status, GoalStatus::InProgress);
    }

    #[test]
    fn stats_always_carry_all_statuses() {
        let json = serde_json::to_value(GoalStats::count(std::iter::empty())).unwrap();
        assert_eq!(json, serde_json::json!({ "in-progress": 0, "completed": 0, "failed": 0 }));
    }
}
