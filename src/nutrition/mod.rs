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
        .route("/nutrition", get(list_logs).post(create_log))
        .route("/nutrition/range", get(logs_in_range))
        .route("/nutrition/stats", get(nutrition_stats))
        .route("/nutrition/:id", patch(update_log).delete(delete_log))
}
