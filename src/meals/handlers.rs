use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::CreateMealRequest;
use super::model::Meal;
use crate::{
    auth::CurrentAccount,
    dates::DateRangeQuery,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery, MessageResponse},
    state::AppState,
    store::Stored,
};

#[instrument(skip(state, account))]
pub async fn list_meals(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<Stored<Meal>>>, ApiError> {
    let mut meals = state.documents::<Meal>(account.id).list().await?;
    meals.sort_by(|a, b| b.doc.date.cmp(&a.doc.date));
    Ok(Json(meals))
}

/// Oldest first, for day-by-day charts.
#[instrument(skip(state, account))]
pub async fn meals_in_range(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(range): ApiQuery<DateRangeQuery>,
) -> Result<Json<Vec<Stored<Meal>>>, ApiError> {
    let (start, end) = range.bounds()?;
    let mut meals: Vec<_> = state
        .documents::<Meal>(account.id)
        .list()
        .await?
        .into_iter()
        .filter(|m| m.doc.date >= start && m.doc.date <= end)
        .collect();
    meals.sort_by(|a, b| a.doc.date.cmp(&b.doc.date));
    Ok(Json(meals))
}

#[instrument(skip(state, account, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(payload): ApiJson<CreateMealRequest>,
) -> Result<(StatusCode, Json<Stored<Meal>>), ApiError> {
    let meal = payload.into_meal(OffsetDateTime::now_utc())?;
    let saved = state.documents::<Meal>(account.id).insert(meal).await?;
    info!(account_id = %account.id, meal_id = %saved.id, "meal logged");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state, account))]
pub async fn delete_meal(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.documents::<Meal>(account.id).delete(id).await? {
        return Err(ApiError::NotFound("Meal"));
    }
    Ok(MessageResponse::new("Meal deleted"))
}
