use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod model;

pub fn router() -> Router<AppState> {
    use handlers::*;
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/stats", get(goal_stats))
        .route("/goals/type/:type", get(goals_by_type))
        .route("/goals/:id", patch(update_goal).delete(delete_goal))
        .route("/goals/:id/progress", post(record_progress))
}
