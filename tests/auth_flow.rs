mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{app, call, get, json_request, signup, signup_body};
use fittrack::app::build_app;
use fittrack::config::AppConfig;
use fittrack::state::AppState;
use fittrack::store::memory::MemoryStore;
use fittrack::store::DocumentStore;
use serde_json::json;

#[tokio::test]
async fn signup_issues_tokens_and_derived_profile() {
    let app = app();
    let (status, body) = call(
        &app,
        json_request("POST", "/api/users/signup", None, signup_body("Sam@Example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refreshToken"].as_str().is_some_and(|t| !t.is_empty()));

    let user = &body["user"];
    assert_eq!(user["email"], "sam@example.com");
    assert_eq!(user["profile"]["bmr"], 1674);
    assert_eq!(user["profile"]["tdee"], 2595);
    assert_eq!(user["profile"]["goals"]["calorieGoal"], 2595.0);
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn duplicate_signup_is_rejected_without_write() {
    let store = MemoryStore::new();
    let state = AppState::from_parts(Arc::new(store.clone()), Arc::new(AppConfig::for_tests()));
    let app = build_app(state);

    signup(&app, "dup@example.com").await;
    let (status, body) = call(
        &app,
        json_request("POST", "/api/users/signup", None, signup_body("DUP@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "duplicate_account");
    assert_eq!(store.account_count().await, 1);
}

#[tokio::test]
async fn stored_hash_is_not_the_password() {
    let store = MemoryStore::new();
    let state = AppState::from_parts(Arc::new(store.clone()), Arc::new(AppConfig::for_tests()));
    let app = build_app(state);

    signup(&app, "hash@example.com").await;
    let account = store
        .find_account_by_email("hash@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(account.password_hash, "correct-horse");
    assert!(account.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn weak_password_and_bad_email_are_rejected() {
    let app = app();

    let mut body = signup_body("weak@example.com");
    body["password"] = json!("short");
    let (status, resp) = call(&app, json_request("POST", "/api/users/signup", None, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["code"], "weak_credential");

    let (status, resp) = call(
        &app,
        json_request("POST", "/api/users/signup", None, signup_body("not-an-email")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["code"], "invalid_email");
}

#[tokio::test]
async fn incomplete_profile_names_missing_fields() {
    let app = app();
    let body = json!({
        "email": "partial@example.com",
        "password": "correct-horse",
        "name": "Partial",
        "profile": { "age": 30, "weight": 60 }
    });
    let (status, resp) = call(&app, json_request("POST", "/api/users/signup", None, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["code"], "incomplete_profile");
    assert_eq!(resp["fields"], json!(["height", "gender", "activityLevel"]));
}

#[tokio::test]
async fn login_failures_look_the_same() {
    let app = app();
    signup(&app, "login@example.com").await;

    let (s1, wrong_pw) = call(
        &app,
        json_request(
            "POST",
            "/api/users/login",
            None,
            json!({ "email": "login@example.com", "password": "incorrect-horse" }),
        ),
    )
    .await;
    let (s2, unknown) = call(
        &app,
        json_request(
            "POST",
            "/api/users/login",
            None,
            json!({ "email": "nobody@example.com", "password": "incorrect-horse" }),
        ),
    )
    .await;
    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw, unknown);
}

#[tokio::test]
async fn login_after_signup_reaches_profile() {
    let app = app();
    signup(&app, "back@example.com").await;

    let (status, body) = call(
        &app,
        json_request(
            "POST",
            "/api/users/login",
            None,
            json!({ "email": "back@example.com", "password": "correct-horse" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let (status, me) = call(&app, get("/api/users/profile", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "back@example.com");
    assert_eq!(me["name"], "Sam Runner");
}

#[tokio::test]
async fn refresh_rotates_and_refuses_access_tokens() {
    let app = app();
    let (_, body) = call(
        &app,
        json_request("POST", "/api/users/signup", None, signup_body("refresh@example.com")),
    )
    .await;
    let access = body["token"].as_str().unwrap().to_string();
    let refresh = body["refreshToken"].as_str().unwrap().to_string();

    let (status, rotated) = call(
        &app,
        json_request("POST", "/api/users/refresh", None, json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_access = rotated["token"].as_str().unwrap();
    let (status, _) = call(&app, get("/api/users/profile", Some(new_access))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &app,
        json_request("POST", "/api/users/refresh", None, json!({ "refreshToken": access })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, get("/api/users/profile", Some(&refresh))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_outstanding_tokens() {
    let app = app();
    let token = signup(&app, "bye@example.com").await;

    let (status, body) = call(&app, json_request("POST", "/api/users/logout", Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out");

    let (status, body) = call(&app, get("/api/users/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_credential");
}

#[tokio::test]
async fn profile_update_recomputes_energy_and_password_change_revokes() {
    let app = app();
    let token = signup(&app, "edit@example.com").await;

    let (status, body) = call(
        &app,
        json_request(
            "PATCH",
            "/api/users/profile",
            Some(&token),
            json!({ "name": "Sam R.", "profile": { "weight": 76.9 } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["name"], "Sam R.");
    assert_eq!(body["profile"]["bmr"], 1743);
    assert_eq!(body["profile"]["tdee"], 2702);
    assert!(body["profile"]["lastUpdated"].is_string());

    let (status, body) = call(
        &app,
        json_request("PATCH", "/api/users/profile", Some(&token), json!({ "email": "x@y.z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = call(
        &app,
        json_request(
            "PATCH",
            "/api/users/profile",
            Some(&token),
            json!({ "password": "a-new-long-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, get("/api/users/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &app,
        json_request(
            "POST",
            "/api/users/login",
            None,
            json!({ "email": "edit@example.com", "password": "a-new-long-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
