mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{call, get, json_request, signup};
use fittrack::accounts::model::Account;
use fittrack::app::build_app;
use fittrack::auth::jwt::JwtKeys;
use fittrack::auth::{Claims, TokenKind};
use fittrack::config::AppConfig;
use fittrack::state::AppState;
use fittrack::store::memory::MemoryStore;
use fittrack::store::{Collection, DocumentStore, StoreError, StoreResult, StoredDocument};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

fn workout() -> serde_json::Value {
    json!({ "title": "Intervals", "duration": 30, "type": "hiit" })
}

fn state_with(store: MemoryStore) -> AppState {
    AppState::from_parts(Arc::new(store), Arc::new(AppConfig::for_tests()))
}

#[tokio::test]
async fn missing_header_is_rejected() {
    let app = build_app(AppState::in_memory());
    let (status, body) = call(&app, get("/api/workouts", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "missing_credential");
}

#[tokio::test]
async fn non_bearer_scheme_is_malformed() {
    let app = build_app(AppState::in_memory());
    let req = Request::builder()
        .uri("/api/workouts")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "malformed_credential");
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let app = build_app(AppState::in_memory());
    let (status, body) = call(&app, get("/api/workouts", Some("not.a.jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_credential");
}

#[tokio::test]
async fn token_for_missing_account_is_unknown_subject() {
    let state = AppState::in_memory();
    let keys = JwtKeys::from(&state.config.jwt);
    let token = keys.sign_access(Uuid::new_v4(), 0).unwrap();
    let app = build_app(state);

    let (status, body) = call(&app, get("/api/workouts", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unknown_subject");
}

#[tokio::test]
async fn expired_token_has_no_side_effect() {
    let store = MemoryStore::new();
    let state = state_with(store.clone());
    let config = state.config.clone();
    let app = build_app(state);
    signup(&app, "late@example.com").await;
    let account = store
        .find_account_by_email("late@example.com")
        .await
        .unwrap()
        .unwrap();

    let past = time::OffsetDateTime::now_utc().unix_timestamp() - 3600;
    let claims = Claims {
        sub: account.id,
        iat: (past - 600) as usize,
        exp: past as usize,
        iss: config.jwt.issuer.clone(),
        aud: config.jwt.audience.clone(),
        kind: TokenKind::Access,
        ver: account.token_version,
    };
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
    )
    .unwrap();

    let (status, body) = call(&app, json_request("POST", "/api/workouts", Some(&expired), workout())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_credential");
    assert_eq!(store.document_count().await, 0);
}

#[tokio::test]
async fn tampered_token_has_no_side_effect() {
    let store = MemoryStore::new();
    let app = build_app(state_with(store.clone()));
    let token = signup(&app, "tamper@example.com").await;

    let (head, sig) = token.rsplit_once('.').unwrap();
    let first = sig.chars().next().unwrap();
    let swapped = if first == 'A' { 'B' } else { 'A' };
    let forged = format!("{head}.{swapped}{}", &sig[1..]);

    let (status, _) = call(&app, json_request("POST", "/api/workouts", Some(&forged), workout())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(store.document_count().await, 0);

    let (status, _) = call(&app, json_request("POST", "/api/workouts", Some(&token), workout())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(store.document_count().await, 1);
}

#[tokio::test]
async fn health_needs_no_credential() {
    let app = build_app(AppState::in_memory());
    let response = tower::ServiceExt::oneshot(app, get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// Every lookup fails as an unreachable database would.
struct FailingStore;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::Unexpected(anyhow::anyhow!("connection refused")))
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert_account(&self, _: Account) -> StoreResult<Account> {
        down()
    }
    async fn find_account_by_email(&self, _: &str) -> StoreResult<Option<Account>> {
        down()
    }
    async fn get_account(&self, _: Uuid) -> StoreResult<Option<Account>> {
        down()
    }
    async fn update_account(&self, _: Account) -> StoreResult<Account> {
        down()
    }
    async fn insert_document(&self, _: StoredDocument) -> StoreResult<StoredDocument> {
        down()
    }
    async fn get_document(&self, _: Collection, _: Uuid, _: Uuid) -> StoreResult<Option<StoredDocument>> {
        down()
    }
    async fn list_documents(&self, _: Collection, _: Uuid) -> StoreResult<Vec<StoredDocument>> {
        down()
    }
    async fn replace_document(
        &self,
        _: Collection,
        _: Uuid,
        _: Uuid,
        _: serde_json::Value,
    ) -> StoreResult<Option<StoredDocument>> {
        down()
    }
    async fn delete_document(&self, _: Collection, _: Uuid, _: Uuid) -> StoreResult<bool> {
        down()
    }
    async fn health_check(&self) -> StoreResult<()> {
        down()
    }
    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn store_outage_is_a_generic_server_error() {
    let state = AppState::from_parts(Arc::new(FailingStore), Arc::new(AppConfig::for_tests()));
    let token = JwtKeys::from(&state.config.jwt)
        .sign_access(Uuid::new_v4(), 0)
        .unwrap();
    let app = build_app(state);

    let (status, body) = call(&app, get("/api/workouts", Some(&token))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "internal");
    assert_eq!(body["message"], "Something went wrong");
    assert!(!body.to_string().contains("connection refused"));

    let response = tower::ServiceExt::oneshot(app, get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
