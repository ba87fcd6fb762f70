use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{AchievementProgressRequest, CreateAchievementRequest};
use super::model::{Achievement, AchievementCategory, AchievementStats};
use crate::{
    auth::CurrentAccount,
    error::ApiError,
    extractors::{parse_enum, ApiJson, ApiPath},
    state::AppState,
    store::Stored,
};

const RECENT_LIMIT: usize = 5;

fn latest_first(items: &mut [Stored<Achievement>]) {
    items.sort_by(|a, b| b.doc.date_earned.cmp(&a.doc.date_earned));
}

#[instrument(skip(state, account))]
pub async fn list_achievements(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<Stored<Achievement>>>, ApiError> {
    let mut items = state.documents::<Achievement>(account.id).list().await?;
    latest_first(&mut items);
    Ok(Json(items))
}

#[instrument(skip(state, account))]
pub async fn achievements_by_category(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(raw): ApiPath<String>,
) -> Result<Json<Vec<Stored<Achievement>>>, ApiError> {
    let category: AchievementCategory = parse_enum(&raw, "achievement category")?;
    let mut items: Vec<_> = state
        .documents::<Achievement>(account.id)
        .list()
        .await?
        .into_iter()
        .filter(|a| a.doc.category == category)
        .collect();
    latest_first(&mut items);
    Ok(Json(items))
}

#[instrument(skip(state, account, payload))]
pub async fn create_achievement(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(payload): ApiJson<CreateAchievementRequest>,
) -> Result<(StatusCode, Json<Stored<Achievement>>), ApiError> {
    let achievement = payload.into_achievement(OffsetDateTime::now_utc())?;
    let saved = state
        .documents::<Achievement>(account.id)
        .insert(achievement)
        .await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state, account, payload))]
pub async fn update_progress(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AchievementProgressRequest>,
) -> Result<Json<Stored<Achievement>>, ApiError> {
    let achievements = state.documents::<Achievement>(account.id);
    let mut current = achievements
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Achievement"))?;
    if current.doc.advance(payload.current, OffsetDateTime::now_utc()) {
        info!(account_id = %account.id, achievement_id = %id, "achievement earned");
    }
    achievements
        .replace(id, &current.doc)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Achievement"))
}

#[instrument(skip(state, account))]
pub async fn achievement_stats(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<AchievementStats>, ApiError> {
    let items = state.documents::<Achievement>(account.id).list().await?;
    Ok(Json(AchievementStats::tally(items.iter().map(|a| &a.doc))))
}

#[instrument(skip(state, account))]
pub async fn recent_achievements(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<Stored<Achievement>>>, ApiError> {
    let mut items: Vec<_> = state
        .documents::<Achievement>(account.id)
        .list()
        .await?
        .into_iter()
        .filter(|a| a.doc.is_completed)
        .collect();
    latest_first(&mut items);
    items.truncate(RECENT_LIMIT);
    Ok(Json(items))
}
