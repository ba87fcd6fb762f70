use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::{Collection, Document};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServingUnit {
    G,
    Ml,
    Oz,
    Piece,
    Serving,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Food {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving_size: f64,
    pub unit: ServingUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoggedMeal {
    pub name: String,
    #[serde(with = "crate::dates::flexible")]
    pub time: OffsetDateTime,
    #[serde(default)]
    pub foods: Vec<Food>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

impl Totals {
    pub fn of(meals: &[LoggedMeal]) -> Self {
        meals
            .iter()
            .flat_map(|m| m.foods.iter())
            .fold(Totals::default(), |acc, f| Totals {
                total_calories: acc.total_calories + f.calories,
                total_protein: acc.total_protein + f.protein,
                total_carbs: acc.total_carbs + f.carbs,
                total_fat: acc.total_fat + f.fat,
            })
    }
}

/// One day's itemised intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionLog {
    #[serde(with = "crate::dates::flexible")]
    pub date: OffsetDateTime,
    pub meals: Vec<LoggedMeal>,
    #[serde(flatten)]
    pub totals: Totals,
}

impl NutritionLog {
    pub fn new(date: OffsetDateTime, meals: Vec<LoggedMeal>) -> Self {
        let totals = Totals::of(&meals);
        Self { date, meals, totals }
    }

    pub fn set_meals(&mut self, meals: Vec<LoggedMeal>) {
        self.totals = Totals::of(&meals);
        self.meals = meals;
    }
}

impl Document for NutritionLog {
    const COLLECTION: Collection = Collection::Nutrition;
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionStats {
    pub average_calories: i64,
    pub average_protein: i64,
    pub average_carbs: i64,
    pub average_fat: i64,
    pub total_logs: usize,
}

impl NutritionStats {
    pub fn over<'a>(logs: impl IntoIterator<Item = &'a NutritionLog>) -> Self {
        let mut sum = Totals::default();
        let mut n = 0usize;
        for log in logs {
            sum.total_calories += log.totals.total_calories;
            sum.total_protein += log.totals.total_protein;
            sum.total_carbs += log.totals.total_carbs;
            sum.total_fat += log.totals.total_fat;
            n += 1;
        }
        if n == 0 {
            return Self {
                average_calories: 0,
                average_protein: 0,
                average_carbs: 0,
                average_fat: 0,
                total_logs: 0,
            };
        }
        let avg = |total: f64| (total / n as f64).round() as i64;
        Self {
            average_calories: avg(sum.total_calories),
            average_protein: avg(sum.total_protein),
            average_carbs: avg(sum.total_carbs),
            average_fat: avg(sum.total_fat),
            total_logs: n,
        }
    }
}
