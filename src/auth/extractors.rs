use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::{accounts::model::Account, error::ApiError, state::AppState};

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers.get(AUTHORIZATION).ok_or(ApiError::MissingCredential)?;
    let raw = value.to_str().map_err(|_| ApiError::MalformedCredential)?;
    let (scheme, token) = raw
        .trim()
        .split_once(' ')
        .ok_or(ApiError::MalformedCredential)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::MalformedCredential);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::MalformedCredential);
    }
    Ok(token)
}

/// The authenticated caller, resolved from the bearer token.
///
/// Rejects before the handler body runs, so a failed check never reaches
/// business logic.
pub struct CurrentAccount(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify_access(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            ApiError::InvalidCredential
        })?;

        let account = state
            .store
            .get_account(claims.sub)
            .await
            .map_err(|e| ApiError::internal("resolve account for token", e))?
            .ok_or_else(|| {
                warn!(account_id = %claims.sub, "token subject has no account");
                ApiError::UnknownSubject
            })?;

        if account.token_version != claims.ver {
            warn!(account_id = %account.id, "token revoked");
            return Err(ApiError::InvalidCredential);
        }

        Ok(CurrentAccount(account))
    }
}
