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
        .route("/workout-plans", get(list_plans).post(create_plan))
        .route("/workout-plans/active", get(active_plan))
        .route("/workout-plans/stats", get(plan_stats))
        .route("/workout-plans/:id", patch(update_plan).delete(delete_plan))
        .route("/workout-plans/:id/progress", post(record_session))
}
