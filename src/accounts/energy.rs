//! Basal metabolic rate and daily energy expenditure.
//!
//! BMR uses the Mifflin–St Jeor equation. TDEE scales the rounded BMR by
//! the activity multiplier. Default macro targets are derived from TDEE:
//! 1.6 g protein per kg, 50 % of energy from carbs (4 kcal/g) and 25 %
//! from fat (9 kcal/g).

use super::model::{ActivityLevel, Gender, NutritionGoals};

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyEstimate {
    pub bmr: i64,
    pub tdee: i64,
    pub goals: NutritionGoals,
}

pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age_years: f64, gender: Gender) -> f64 {
    let offset = match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years + offset
}

pub fn estimate(
    weight_kg: f64,
    height_cm: f64,
    age_years: f64,
    gender: Gender,
    activity: ActivityLevel,
) -> EnergyEstimate {
    let bmr = basal_metabolic_rate(weight_kg, height_cm, age_years, gender).round();
    let tdee = (bmr * activity.multiplier()).round();
    EnergyEstimate {
        bmr: bmr as i64,
        tdee: tdee as i64,
        goals: default_goals(weight_kg, tdee),
    }
}

pub fn default_goals(weight_kg: f64, tdee: f64) -> NutritionGoals {
    NutritionGoals {
        calorie_goal: tdee,
        protein: (1.6 * weight_kg).round(),
        carbs: (0.5 * tdee / 4.0).round(),
        fat: (0.25 * tdee / 9.0).round(),
    }
}
