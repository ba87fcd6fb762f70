use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod energy;
pub mod handlers;
pub mod model;

pub fn router() -> Router<AppState> {
    handlers::profile_routes()
}
