//! Fitness tracking backend: accounts with bearer-token sessions and
//! per-account collections of workouts, meals, nutrition logs, goals,
//! achievements, workout plans and progress entries.

pub mod accounts;
pub mod achievements;
pub mod app;
pub mod auth;
pub mod config;
pub mod dates;
pub mod error;
pub mod extractors;
pub mod goals;
pub mod meals;
pub mod nutrition;
pub mod progress;
pub mod state;
pub mod store;
pub mod workout_plans;
pub mod workouts;
