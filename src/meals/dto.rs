use serde::Deserialize;
use time::OffsetDateTime;

use super::model::Meal;
use crate::error::ApiError;
use crate::extractors::{require_non_negative, require_text};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMealRequest {
    pub name: Option<String>,
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
    #[serde(default, with = "crate::dates::flexible::option")]
    pub date: Option<OffsetDateTime>,
}

impl CreateMealRequest {
    pub fn into_meal(self, now: OffsetDateTime) -> Result<Meal, ApiError> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name".to_string());
        }
        if self.calories.is_none() {
            missing.push("calories".to_string());
        }
        let (Some(name), Some(calories)) = (self.name, self.calories) else {
            return Err(ApiError::MissingFields(missing));
        };

        Ok(Meal {
            name: require_text(&name, "name")?,
            calories: require_non_negative(calories, "calories")?,
            protein: require_non_negative(self.protein, "protein")?,
            carbs: require_non_negative(self.carbs, "carbs")?,
            fats: require_non_negative(self.fats, "fats")?,
            date: self.date.unwrap_or(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: serde_json::Value) -> CreateMealRequest {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn macros_default_to_zero() {
        let now = OffsetDateTime::now_utc();
        let meal = parse(json!({ "name": "Apple", "calories": 95 }))
            .into_meal(now)
            .unwrap();
        assert_eq!(meal.protein, 0.0);
        assert_eq!(meal.fats, 0.0);
        assert_eq!(meal.date, now);
    }

    #[test]
    fn missing_name_and_calories_are_named() {
        let err = parse(json!({ "protein": 3 }))
            .into_meal(OffsetDateTime::now_utc())
            .unwrap_err();
        match err {
            ApiError::MissingFields(f) => assert_eq!(f, vec!["name", "calories"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<CreateMealRequest, _> =
            serde_json::from_value(json!({ "name": "x", "calories": 1, "userId": "abc" }));
        assert!(res.is_err());
    }
}
