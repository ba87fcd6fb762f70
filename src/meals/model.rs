use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::{Collection, Document};

/// A quick calorie entry; for itemised logging see `nutrition`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    #[serde(with = "crate::dates::flexible")]
    pub date: OffsetDateTime,
}

impl Document for Meal {
    const COLLECTION: Collection = Collection::Meals;
}
