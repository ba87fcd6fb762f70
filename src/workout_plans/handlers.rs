use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::dto::{CreatePlanRequest, RecordSessionRequest, UpdatePlanRequest};
use super::model::{PlanStats, WorkoutPlan};
use crate::{
    auth::CurrentAccount,
    error::ApiError,
    extractors::{ApiJson, ApiPath, MessageResponse},
    state::AppState,
    store::{Documents, Stored},
};

const KIND: &str = "Workout plan";

/// Switch off every active plan of this account except `keep`.
async fn deactivate_others(
    plans: &Documents<'_, WorkoutPlan>,
    keep: Option<Uuid>,
) -> Result<(), ApiError> {
    for mut plan in plans.list().await? {
        if plan.doc.is_active && Some(plan.id) != keep {
            plan.doc.is_active = false;
            plans.replace(plan.id, &plan.doc).await?;
            debug!(plan_id = %plan.id, "plan deactivated");
        }
    }
    Ok(())
}

#[instrument(skip(state, account))]
pub async fn list_plans(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<Stored<WorkoutPlan>>>, ApiError> {
    let mut plans = state.documents::<WorkoutPlan>(account.id).list().await?;
    plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(plans))
}

/// The newest active plan, should more than one ever be active.
#[instrument(skip(state, account))]
pub async fn active_plan(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Stored<WorkoutPlan>>, ApiError> {
    state
        .documents::<WorkoutPlan>(account.id)
        .list()
        .await?
        .into_iter()
        .filter(|p| p.doc.is_active)
        .max_by_key(|p| p.created_at)
        .map(Json)
        .ok_or(ApiError::NotFound("Active workout plan"))
}

#[instrument(skip(state, account, payload))]
pub async fn create_plan(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(payload): ApiJson<CreatePlanRequest>,
) -> Result<(StatusCode, Json<Stored<WorkoutPlan>>), ApiError> {
    let plan = payload.into_plan()?;
    let plans = state.documents::<WorkoutPlan>(account.id);
    if plan.is_active {
        deactivate_others(&plans, None).await?;
    }
    let saved = plans.insert(plan).await?;
    info!(account_id = %account.id, plan_id = %saved.id, active = saved.doc.is_active, "workout plan created");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state, account, payload))]
pub async fn update_plan(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdatePlanRequest>,
) -> Result<Json<Stored<WorkoutPlan>>, ApiError> {
    let plans = state.documents::<WorkoutPlan>(account.id);
    let mut current = plans.get(id).await?.ok_or(ApiError::NotFound(KIND))?;
    if payload.apply(&mut current.doc)? {
        deactivate_others(&plans, Some(id)).await?;
    }
    plans
        .replace(id, &current.doc)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(KIND))
}

#[instrument(skip(state, account))]
pub async fn delete_plan(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.documents::<WorkoutPlan>(account.id).delete(id).await? {
        return Err(ApiError::NotFound(KIND));
    }
    Ok(MessageResponse::new("Workout plan deleted"))
}

#[instrument(skip(state, account, payload))]
pub async fn record_session(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<RecordSessionRequest>,
) -> Result<Json<Stored<WorkoutPlan>>, ApiError> {
    let plans = state.documents::<WorkoutPlan>(account.id);
    let mut current = plans.get(id).await?.ok_or(ApiError::NotFound(KIND))?;
    current
        .doc
        .progress
        .push(payload.into_record(OffsetDateTime::now_utc()));
    plans
        .replace(id, &current.doc)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(KIND))
}

#[instrument(skip(state, account))]
pub async fn plan_stats(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<PlanStats>, ApiError> {
    let plans = state.documents::<WorkoutPlan>(account.id).list().await?;
    Ok(Json(PlanStats::tally(plans.iter().map(|p| &p.doc))))
}
