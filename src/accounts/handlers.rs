use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::dto::{PublicAccount, UpdateProfileRequest};
use crate::{
    auth::{
        password::{hash_password, is_strong_enough},
        CurrentAccount,
    },
    error::ApiError,
    extractors::{require_text, ApiJson},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/users/profile", get(get_profile).patch(update_profile))
}

#[instrument(skip(account))]
pub async fn get_profile(CurrentAccount(account): CurrentAccount) -> Json<PublicAccount> {
    Json(account.into())
}

/// Only `name`, `password` and `profile` may change. A new password is
/// re-hashed and revokes every token issued before it.
#[instrument(skip(state, account, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<Json<PublicAccount>, ApiError> {
    let now = OffsetDateTime::now_utc();

    if let Some(name) = payload.name.as_deref() {
        account.name = require_text(name, "name")?;
    }

    if let Some(password) = payload.password.as_deref() {
        if !is_strong_enough(password) {
            warn!(account_id = %account.id, "password too short");
            return Err(ApiError::WeakCredential);
        }
        account.password_hash =
            hash_password(password).map_err(|e| ApiError::internal("hash_password failed", e))?;
        account.token_version += 1;
        info!(account_id = %account.id, "password changed; sessions revoked");
    }

    if let Some(profile) = payload.profile {
        profile.merge_into(&mut account.profile, now)?;
    }

    let account = state.store.update_account(account).await?;
    Ok(Json(account.into()))
}
