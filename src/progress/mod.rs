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
        .route("/progress", get(list_progress).post(create_progress))
        .route("/progress/type/:type", get(progress_by_type))
        .route("/progress/:id", patch(update_progress).delete(delete_progress))
}
