use serde::Deserialize;
use time::{Duration, OffsetDateTime};

use super::model::{LoggedMeal, NutritionLog};
use crate::error::ApiError;
use crate::extractors::{require_non_negative, require_text};

fn check_meals(meals: &[LoggedMeal]) -> Result<(), ApiError> {
    for meal in meals {
        require_text(&meal.name, "meal name")?;
        for food in &meal.foods {
            require_text(&food.name, "food name")?;
            for (value, field) in [
                (food.calories, "calories"),
                (food.protein, "protein"),
                (food.carbs, "carbs"),
                (food.fat, "fat"),
                (food.serving_size, "servingSize"),
            ] {
                require_non_negative(value, field)?;
            }
        }
    }
    Ok(())
}

/// Totals are never accepted from the client; they follow `meals`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateNutritionRequest {
    #[serde(default, with = "crate::dates::flexible::option")]
    pub date: Option<OffsetDateTime>,
    #[serde(default)]
    pub meals: Vec<LoggedMeal>,
}

impl CreateNutritionRequest {
    pub fn into_log(self, now: OffsetDateTime) -> Result<NutritionLog, ApiError> {
        check_meals(&self.meals)?;
        Ok(NutritionLog::new(self.date.unwrap_or(now), self.meals))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateNutritionRequest {
    #[serde(default, with = "crate::dates::flexible::option")]
    pub date: Option<OffsetDateTime>,
    pub meals: Option<Vec<LoggedMeal>>,
}

impl UpdateNutritionRequest {
    pub fn apply(self, log: &mut NutritionLog) -> Result<(), ApiError> {
        if let Some(date) = self.date {
            log.date = date;
        }
        if let Some(meals) = self.meals {
            check_meals(&meals)?;
            log.set_meals(meals);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub days: Option<i64>,
}

impl StatsQuery {
    pub const DEFAULT_DAYS: i64 = 7;
    /// A century of history.
    pub const MAX_DAYS: i64 = 36_500;

    pub fn days(&self) -> Result<i64, ApiError> {
        match self.days {
            None => Ok(Self::DEFAULT_DAYS),
            Some(d) if (1..=Self::MAX_DAYS).contains(&d) => Ok(d),
            Some(d) => Err(ApiError::Validation(format!(
                "days must be between 1 and {}, got {d}",
                Self::MAX_DAYS
            ))),
        }
    }

    /// Start of the window ending at `now`.
    pub fn since(&self, now: OffsetDateTime) -> Result<OffsetDateTime, ApiError> {
        let days = self.days()?;
        now.checked_sub(Duration::days(days))
            .ok_or_else(|| ApiError::Validation(format!("days out of range: {days}")))
    }
}
