use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateGoalRequest, GoalProgressRequest, UpdateGoalRequest};
use super::model::{Goal, GoalResponse, GoalStats, GoalStatus, GoalType};
use crate::{
    auth::CurrentAccount,
    error::ApiError,
    extractors::{parse_enum, ApiJson, ApiPath, MessageResponse},
    state::AppState,
    store::Stored,
};

fn respond(mut goals: Vec<Stored<Goal>>) -> Json<Vec<GoalResponse>> {
    goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(goals.into_iter().map(GoalResponse::from).collect())
}

#[instrument(skip(state, account))]
pub async fn list_goals(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<GoalResponse>>, ApiError> {
    let goals = state.documents::<Goal>(account.id).list().await?;
    Ok(respond(goals))
}

#[instrument(skip(state, account))]
pub async fn goals_by_type(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(raw): ApiPath<String>,
) -> Result<Json<Vec<GoalResponse>>, ApiError> {
    let kind: GoalType = parse_enum(&raw, "goal type")?;
    let goals = state
        .documents::<Goal>(account.id)
        .list()
        .await?
        .into_iter()
        .filter(|g| g.doc.kind == kind)
        .collect();
    Ok(respond(goals))
}

#[instrument(skip(state, account, payload))]
pub async fn create_goal(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(payload): ApiJson<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalResponse>), ApiError> {
    let goal = payload.into_goal(OffsetDateTime::now_utc())?;
    let saved = state.documents::<Goal>(account.id).insert(goal).await?;
    info!(account_id = %account.id, goal_id = %saved.id, "goal created");
    Ok((StatusCode::CREATED, Json(saved.into())))
}

#[instrument(skip(state, account, payload))]
pub async fn update_goal(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateGoalRequest>,
) -> Result<Json<GoalResponse>, ApiError> {
    let goals = state.documents::<Goal>(account.id);
    let mut current = goals.get(id).await?.ok_or(ApiError::NotFound("Goal"))?;
    payload.apply(&mut current.doc)?;
    let saved = goals
        .replace(id, &current.doc)
        .await?
        .ok_or(ApiError::NotFound("Goal"))?;
    Ok(Json(saved.into()))
}

#[instrument(skip(state, account))]
pub async fn delete_goal(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.documents::<Goal>(account.id).delete(id).await? {
        return Err(ApiError::NotFound("Goal"));
    }
    Ok(MessageResponse::new("Goal deleted"))
}

#[instrument(skip(state, account, payload))]
pub async fn record_progress(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<GoalProgressRequest>,
) -> Result<Json<GoalResponse>, ApiError> {
    let goals = state.documents::<Goal>(account.id);
    let mut current = goals.get(id).await?.ok_or(ApiError::NotFound("Goal"))?;
    let was = current.doc.status;
    current
        .doc
        .record(payload.value, payload.note, OffsetDateTime::now_utc());
    if was != GoalStatus::Completed && current.doc.status == GoalStatus::Completed {
        info!(account_id = %account.id, goal_id = %id, "goal completed");
    }
    let saved = goals
        .replace(id, &current.doc)
        .await?
        .ok_or(ApiError::NotFound("Goal"))?;
    Ok(Json(saved.into()))
}

#[instrument(skip(state, account))]
pub async fn goal_stats(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<GoalStats>, ApiError> {
    let goals = state.documents::<Goal>(account.id).list().await?;
    Ok(Json(GoalStats::count(goals.iter().map(|g| &g.doc))))
}
