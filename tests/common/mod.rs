#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use fittrack::app::build_app;
use fittrack::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

pub fn app() -> Router {
    build_app(AppState::in_memory())
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

/// Send a request and return status plus decoded JSON body.
pub async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("response");
    let status = response.status();
    (status, read_json(response).await)
}

pub fn signup_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "correct-horse",
        "name": "Sam Runner",
        "profile": {
            "age": 25,
            "weight": 70,
            "height": 175,
            "gender": "male",
            "activityLevel": "moderate"
        }
    })
}

/// Register `email` and return the access token.
pub async fn signup(app: &Router, email: &str) -> String {
    let (status, body) = call(
        app,
        json_request("POST", "/api/users/signup", None, signup_body(email)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().expect("token").to_string()
}
