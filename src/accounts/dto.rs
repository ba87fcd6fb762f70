use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::energy;
use super::model::{Account, ActivityLevel, Gender, NutritionGoals, Profile};
use crate::error::ApiError;

/// Public part of the account returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub profile: Profile,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Account> for PublicAccount {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
            name: a.name,
            profile: a.profile,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GoalsInput {
    pub calorie_goal: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

impl GoalsInput {
    fn apply(&self, goals: &mut NutritionGoals) {
        if let Some(v) = self.calorie_goal {
            goals.calorie_goal = v;
        }
        if let Some(v) = self.protein {
            goals.protein = v;
        }
        if let Some(v) = self.carbs {
            goals.carbs = v;
        }
        if let Some(v) = self.fat {
            goals.fat = v;
        }
    }
}

/// Profile fields as sent by the client.
///
/// `bmr`, `tdee` and `lastUpdated` are accepted for compatibility with
/// clients that compute them locally, but the server always derives its
/// own values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileInput {
    pub age: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub goals: Option<GoalsInput>,
    pub workout_days: Option<Vec<String>>,
    pub last_updated: Option<serde_json::Value>,
}

fn positive(value: Option<f64>, field: &str) -> Result<Option<f64>, ApiError> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(ApiError::Validation(format!(
            "{field} must be a positive number"
        ))),
        other => Ok(other),
    }
}

impl ProfileInput {
    /// Names of required profile fields that are absent, in wire form.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.age.is_none() {
            missing.push("age".to_string());
        }
        if self.weight.is_none() {
            missing.push("weight".to_string());
        }
        if self.height.is_none() {
            missing.push("height".to_string());
        }
        if self.gender.is_none() {
            missing.push("gender".to_string());
        }
        if self.activity_level.is_none() {
            missing.push("activityLevel".to_string());
        }
        missing
    }

    fn check_numbers(&self) -> Result<(), ApiError> {
        positive(self.age, "age")?;
        positive(self.weight, "weight")?;
        positive(self.height, "height")?;
        Ok(())
    }

    /// Build a complete profile; callers check [`Self::missing_fields`] first.
    pub fn into_profile(self, now: OffsetDateTime) -> Result<Profile, ApiError> {
        self.check_numbers()?;
        let missing = self.missing_fields();
        let (Some(age), Some(weight), Some(height), Some(gender), Some(activity_level)) =
            (self.age, self.weight, self.height, self.gender, self.activity_level)
        else {
            return Err(ApiError::IncompleteProfile(missing));
        };
        let estimate = energy::estimate(weight, height, age, gender, activity_level);
        let mut goals = estimate.goals;
        if let Some(input) = &self.goals {
            input.apply(&mut goals);
        }
        Ok(Profile {
            age,
            weight,
            height,
            gender,
            activity_level,
            bmr: estimate.bmr,
            tdee: estimate.tdee,
            goals,
            workout_days: self.workout_days.unwrap_or_default(),
            last_updated: Some(now),
        })
    }

    /// Overlay the provided fields on an existing profile.
    ///
    /// BMR, TDEE and default goals are re-derived whenever a body metric
    /// or the activity level changes; explicit goals in the same request
    /// win over the derived ones.
    pub fn merge_into(self, profile: &mut Profile, now: OffsetDateTime) -> Result<(), ApiError> {
        self.check_numbers()?;
        let metrics_changed = self.age.is_some()
            || self.weight.is_some()
            || self.height.is_some()
            || self.gender.is_some()
            || self.activity_level.is_some();

        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(weight) = self.weight {
            profile.weight = weight;
        }
        if let Some(height) = self.height {
            profile.height = height;
        }
        if let Some(gender) = self.gender {
            profile.gender = gender;
        }
        if let Some(level) = self.activity_level {
            profile.activity_level = level;
        }
        if metrics_changed {
            let estimate = energy::estimate(
                profile.weight,
                profile.height,
                profile.age,
                profile.gender,
                profile.activity_level,
            );
            profile.bmr = estimate.bmr;
            profile.tdee = estimate.tdee;
            profile.goals = estimate.goals;
        }
        if let Some(goals) = &self.goals {
            goals.apply(&mut profile.goals);
        }
        if let Some(days) = self.workout_days {
            profile.workout_days = days;
        }
        profile.last_updated = Some(now);
        Ok(())
    }
}

/// Request body for `PATCH /users/profile`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub profile: Option<ProfileInput>,
}
