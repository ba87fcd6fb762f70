use axum::{
    routing::{get, patch},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod model;

pub fn router() -> Router<AppState> {
    use handlers::*;
    Router::new()
        .route("/achievements", get(list_achievements).post(create_achievement))
        .route("/achievements/stats", get(achievement_stats))
        .route("/achievements/recent", get(recent_achievements))
        .route("/achievements/category/:category", get(achievements_by_category))
        .route("/achievements/:id/progress", patch(update_progress))
}
