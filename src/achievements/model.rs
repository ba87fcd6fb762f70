use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::{Collection, Document};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Workout,
    Nutrition,
    Consistency,
    Milestone,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CriteriaType {
    Count,
    Duration,
    Weight,
    Streak,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Criteria {
    #[serde(rename = "type")]
    pub kind: CriteriaType,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AchievementProgress {
    #[serde(default)]
    pub current: f64,
    pub target: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub criteria: Criteria,
    pub icon: String,
    #[serde(with = "crate::dates::flexible")]
    pub date_earned: OffsetDateTime,
    pub progress: AchievementProgress,
    #[serde(default)]
    pub is_completed: bool,
}

impl Achievement {
    /// Completion is sticky: the first crossing stamps `dateEarned`, later
    /// updates only move `current`.
    pub fn advance(&mut self, current: f64, now: OffsetDateTime) -> bool {
        self.progress.current = current;
        if !self.is_completed && current >= self.progress.target {
            self.is_completed = true;
            self.date_earned = now;
            return true;
        }
        false
    }
}

impl Document for Achievement {
    const COLLECTION: Collection = Collection::Achievements;
}

fn percentage(completed: u64, total: u64) -> i64 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as i64
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct CategoryStats {
    pub total: u64,
    pub completed: u64,
    pub percentage: i64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AchievementStats {
    pub total: u64,
    pub completed: u64,
    pub percentage: i64,
    pub by_category: BTreeMap<AchievementCategory, CategoryStats>,
}

impl AchievementStats {
    pub fn tally<'a>(items: impl IntoIterator<Item = &'a Achievement>) -> Self {
        let mut total = 0;
        let mut completed = 0;
        let mut by_category: BTreeMap<AchievementCategory, CategoryStats> = BTreeMap::new();
        for a in items {
            let entry = by_category.entry(a.category).or_default();
            entry.total += 1;
            total += 1;
            if a.is_completed {
                entry.completed += 1;
                completed += 1;
            }
        }
        for entry in by_category.values_mut() {
            entry.percentage = percentage(entry.completed, entry.total);
        }
        Self {
            total,
            completed,
            percentage: percentage(completed, total),
            by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn achievement(category: AchievementCategory, current: f64, target: f64, done: bool) -> Achievement {
        Achievement {
            name: "Ten workouts".into(),
            description: "Log ten workouts".into(),
            category,
            criteria: Criteria {
                kind: CriteriaType::Count,
                value: target,
                unit: None,
            },
            icon: "trophy".into(),
            date_earned: datetime!(2024-01-01 0:00 UTC),
            progress: AchievementProgress { current, target },
            is_completed: done,
        }
    }

    #[test]
    fn completes_once_and_keeps_first_date() {
        let mut a = achievement(AchievementCategory::Workout, 3.0, 10.0, false);
        let first = datetime!(2024-02-01 10:00 UTC);
        assert!(!a.advance(9.0, first));
        assert!(a.advance(10.0, first));
        assert_eq!(a.date_earned, first);

        assert!(!a.advance(12.0, datetime!(2024-03-01 10:00 UTC)));
        assert_eq!(a.date_earned, first);
        assert_eq!(a.progress.current, 12.0);
        assert!(a.is_completed);
    }

    #[test]
    fn stats_break_down_by_category() {
        let items = vec![
            achievement(AchievementCategory::Workout, 10.0, 10.0, true),
            achievement(AchievementCategory::Workout, 1.0, 10.0, false),
            achievement(AchievementCategory::Workout, 1.0, 10.0, false),
            achievement(AchievementCategory::Milestone, 1.0, 1.0, true),
        ];
        let stats = AchievementStats::tally(&items);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.percentage, 50);
        let workout = &stats.by_category[&AchievementCategory::Workout];
        assert_eq!((workout.total, workout.completed, workout.percentage), (3, 1, 33));
        assert!(!stats.by_category.contains_key(&AchievementCategory::Nutrition));
    }

    #[test]
    fn empty_stats_report_zero_percent() {
        let stats = AchievementStats::tally(std::iter::empty());
        assert_eq!(stats.percentage, 0);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["byCategory"], serde_json::json!({}));
    }
}
