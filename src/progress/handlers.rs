use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateProgressRequest, UpdateProgressRequest};
use super::model::{ProgressEntry, ProgressType};
use crate::{
    auth::CurrentAccount,
    error::ApiError,
    extractors::{parse_enum, ApiJson, ApiPath, MessageResponse},
    state::AppState,
    store::Stored,
};

fn newest_first(mut entries: Vec<Stored<ProgressEntry>>) -> Json<Vec<Stored<ProgressEntry>>> {
    entries.sort_by(|a, b| b.doc.date.cmp(&a.doc.date));
    Json(entries)
}

#[instrument(skip(state, account))]
pub async fn list_progress(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<Stored<ProgressEntry>>>, ApiError> {
    let entries = state.documents::<ProgressEntry>(account.id).list().await?;
    Ok(newest_first(entries))
}

#[instrument(skip(state, account))]
pub async fn progress_by_type(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(raw): ApiPath<String>,
) -> Result<Json<Vec<Stored<ProgressEntry>>>, ApiError> {
    let kind: ProgressType = parse_enum(&raw, "progress type")?;
    let entries = state
        .documents::<ProgressEntry>(account.id)
        .list()
        .await?
        .into_iter()
        .filter(|e| e.doc.kind == kind)
        .collect();
    Ok(newest_first(entries))
}

#[instrument(skip(state, account, payload))]
pub async fn create_progress(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(payload): ApiJson<CreateProgressRequest>,
) -> Result<(StatusCode, Json<Stored<ProgressEntry>>), ApiError> {
    let entry = payload.into_entry(OffsetDateTime::now_utc())?;
    let saved = state.documents::<ProgressEntry>(account.id).insert(entry).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state, account, payload))]
pub async fn update_progress(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateProgressRequest>,
) -> Result<Json<Stored<ProgressEntry>>, ApiError> {
    let entries = state.documents::<ProgressEntry>(account.id);
    let mut current = entries.get(id).await?.ok_or(ApiError::NotFound("Progress"))?;
    payload.apply(&mut current.doc);
    entries
        .replace(id, &current.doc)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Progress"))
}

#[instrument(skip(state, account))]
pub async fn delete_progress(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.documents::<ProgressEntry>(account.id).delete(id).await? {
        return Err(ApiError::NotFound("Progress"));
    }
    Ok(MessageResponse::new("Progress deleted"))
}
