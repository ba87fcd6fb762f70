use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;

/// JSON body whose deserialization failures become a 400 `validation_error`
/// instead of axum's plain-text 422.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

/// Path parameters; a segment that fails to parse is a 400 `validation_error`.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

/// Query string counterpart of [`ApiPath`].
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

/// Parse a path segment into one of the lowercase serde enums.
pub fn parse_enum<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| ApiError::Validation(format!("unknown {what}: {raw}")))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Reject blank required strings after trimming.
pub fn require_text(value: &str, field: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub fn require_non_negative(value: f64, field: &str) -> Result<f64, ApiError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::Validation(format!("{field} must be a non-negative number")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "kebab-case")]
    enum Status {
        InProgress,
        Done,
    }

    #[derive(Debug, Deserialize)]
    struct Window {
        days: Option<i64>,
    }

    fn parts(uri: &str) -> Parts {
        axum::http::Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn bad_query_value_is_a_validation_error() {
        let mut ok = parts("/stats?days=3");
        let ApiQuery(window) = ApiQuery::<Window>::from_request_parts(&mut ok, &()).await.unwrap();
        assert_eq!(window.days, Some(3));

        let mut bad = parts("/stats?days=abc");
        assert!(matches!(
            ApiQuery::<Window>::from_request_parts(&mut bad, &()).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn parse_enum_accepts_wire_names() {
        assert_eq!(parse_enum::<Status>("in-progress", "status").unwrap(), Status::InProgress);
        assert!(matches!(
            parse_enum::<Status>("nope", "status"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("  Leg day ", "title").unwrap(), "Leg day");
        assert!(require_text("   ", "title").is_err());
    }

    #[test]
    fn negative_numbers_are_rejected() {
        assert!(require_non_negative(-1.0, "calories").is_err());
        assert!(require_non_negative(f64::NAN, "calories").is_err());
        assert_eq!(require_non_negative(0.0, "calories").unwrap(), 0.0);
    }
}
