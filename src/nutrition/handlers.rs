use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::dto::{CreateNutritionRequest, StatsQuery, UpdateNutritionRequest};
use super::model::{NutritionLog, NutritionStats};
use crate::{
    auth::CurrentAccount,
    dates::DateRangeQuery,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery, MessageResponse},
    state::AppState,
    store::Stored,
};

const KIND: &str = "Nutrition log";

#[instrument(skip(state, account))]
pub async fn list_logs(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<Stored<NutritionLog>>>, ApiError> {
    let mut logs = state.documents::<NutritionLog>(account.id).list().await?;
    logs.sort_by(|a, b| b.doc.date.cmp(&a.doc.date));
    Ok(Json(logs))
}

#[instrument(skip(state, account))]
pub async fn logs_in_range(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(range): ApiQuery<DateRangeQuery>,
) -> Result<Json<Vec<Stored<NutritionLog>>>, ApiError> {
    let (start, end) = range.bounds()?;
    let mut logs: Vec<_> = state
        .documents::<NutritionLog>(account.id)
        .list()
        .await?
        .into_iter()
        .filter(|l| l.doc.date >= start && l.doc.date <= end)
        .collect();
    logs.sort_by(|a, b| a.doc.date.cmp(&b.doc.date));
    Ok(Json(logs))
}

#[instrument(skip(state, account, payload))]
pub async fn create_log(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(payload): ApiJson<CreateNutritionRequest>,
) -> Result<(StatusCode, Json<Stored<NutritionLog>>), ApiError> {
    let log = payload.into_log(OffsetDateTime::now_utc())?;
    let saved = state.documents::<NutritionLog>(account.id).insert(log).await?;
    info!(account_id = %account.id, log_id = %saved.id, calories = saved.doc.totals.total_calories, "nutrition logged");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state, account, payload))]
pub async fn update_log(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateNutritionRequest>,
) -> Result<Json<Stored<NutritionLog>>, ApiError> {
    let logs = state.documents::<NutritionLog>(account.id);
    let mut current = logs.get(id).await?.ok_or(ApiError::NotFound(KIND))?;
    payload.apply(&mut current.doc)?;
    logs.replace(id, &current.doc)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(KIND))
}

#[instrument(skip(state, account))]
pub async fn delete_log(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.documents::<NutritionLog>(account.id).delete(id).await? {
        return Err(ApiError::NotFound(KIND));
    }
    Ok(MessageResponse::new("Nutrition log deleted"))
}

/// Averages over logs dated within the last `days` days.
#[instrument(skip(state, account))]
pub async fn nutrition_stats(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> Result<Json<NutritionStats>, ApiError> {
    let since = query.since(OffsetDateTime::now_utc())?;
    let logs = state.documents::<NutritionLog>(account.id).list().await?;
    let stats = NutritionStats::over(logs.iter().map(|l| &l.doc).filter(|l| l.date >= since));
    debug!(%since, total_logs = stats.total_logs, "nutrition stats");
    Ok(Json(stats))
}
