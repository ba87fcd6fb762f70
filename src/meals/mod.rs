use axum::{
    routing::{delete, get},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod model;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/meals", get(handlers::list_meals).post(handlers::create_meal))
        .route("/meals/range", get(handlers::meals_in_range))
        .route("/meals/:id", delete(handlers::delete_meal))
}
