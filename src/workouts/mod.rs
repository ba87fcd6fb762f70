use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod model;

pub fn router() -> Router<AppState> {
    use handlers::*;
    Router::new()
        .route("/workouts", get(list_workouts).post(create_workout))
        .route("/workouts/range", get(workouts_in_range))
        .route("/workouts/stats/summary", get(workout_summary))
        .route(
            "/workouts/:id",
            get(get_workout).patch(update_workout).delete(delete_workout),
        )
}
