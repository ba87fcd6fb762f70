use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, LoginRequest, SignupRequest},
    jwt::JwtKeys,
    password::{hash_password, is_strong_enough, verify_password},
};
use crate::{
    accounts::model::Account,
    error::ApiError,
    state::AppState,
    store::StoreError,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn issue_session(state: &AppState, account: Account) -> Result<AuthResponse, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let pair = keys
        .sign_pair(account.id, account.token_version)
        .map_err(|e| ApiError::internal("jwt sign failed", e))?;
    Ok(AuthResponse {
        user: account.into(),
        token: pair.access,
        refresh_token: pair.refresh,
    })
}

/// Validate, hash, persist and issue the first session.
///
/// Checks run in order email, duplicate, password, profile; nothing is
/// written unless all of them pass.
pub async fn register(state: &AppState, req: SignupRequest) -> Result<AuthResponse, ApiError> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::InvalidEmail);
    }

    if state
        .store
        .find_account_by_email(&email)
        .await
        .map_err(|e| ApiError::internal("find_account_by_email failed", e))?
        .is_some()
    {
        warn!(email = %email, "email already registered");
        return Err(ApiError::DuplicateAccount);
    }

    if !is_strong_enough(&req.password) {
        warn!("password too short");
        return Err(ApiError::WeakCredential);
    }

    let name = req.name.as_deref().map(str::trim).unwrap_or_default().to_string();
    let mut missing = Vec::new();
    if name.is_empty() {
        missing.push("name".to_string());
    }
    missing.extend(req.profile.missing_fields());
    if !missing.is_empty() {
        warn!(?missing, "incomplete profile");
        return Err(ApiError::IncompleteProfile(missing));
    }

    let now = OffsetDateTime::now_utc();
    let profile = req.profile.into_profile(now)?;
    let password_hash =
        hash_password(&req.password).map_err(|e| ApiError::internal("hash_password failed", e))?;

    let account = Account {
        id: Uuid::new_v4(),
        email,
        password_hash,
        name,
        profile,
        token_version: 0,
        created_at: now,
        updated_at: now,
    };

    let account = match state.store.insert_account(account).await {
        Ok(a) => a,
        Err(StoreError::Conflict(_)) => {
            warn!("email registered concurrently");
            return Err(ApiError::DuplicateAccount);
        }
        Err(e) => return Err(ApiError::internal("create account failed", e)),
    };

    info!(account_id = %account.id, email = %account.email, "account registered");
    issue_session(state, account)
}

/// Unknown email and wrong password produce the same error.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<AuthResponse, ApiError> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::InvalidEmail);
    }

    let account = match state.store.find_account_by_email(&email).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::InvalidCredential);
        }
        Err(e) => return Err(ApiError::internal("find_account_by_email failed", e)),
    };

    let ok = verify_password(&req.password, &account.password_hash)
        .map_err(|e| ApiError::internal("verify_password failed", e))?;
    if !ok {
        warn!(account_id = %account.id, "login invalid password");
        return Err(ApiError::InvalidCredential);
    }

    info!(account_id = %account.id, "account logged in");
    issue_session(state, account)
}

pub async fn refresh(state: &AppState, refresh_token: &str) -> Result<AuthResponse, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let claims = keys.verify_refresh(refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        ApiError::InvalidCredential
    })?;

    let account = state
        .store
        .get_account(claims.sub)
        .await
        .map_err(|e| ApiError::internal("get_account failed", e))?
        .ok_or(ApiError::UnknownSubject)?;

    if account.token_version != claims.ver {
        warn!(account_id = %account.id, "refresh token revoked");
        return Err(ApiError::InvalidCredential);
    }

    issue_session(state, account)
}

/// Invalidate every token issued so far for this account.
pub async fn revoke_sessions(state: &AppState, mut account: Account) -> Result<Account, ApiError> {
    account.token_version += 1;
    let account = state.store.update_account(account).await?;
    info!(account_id = %account.id, "sessions revoked");
    Ok(account)
}
