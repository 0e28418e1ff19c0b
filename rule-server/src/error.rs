use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Maps engine/store failures onto HTTP status codes. This is the only
/// place the core's error taxonomy (spec §7) meets a wire format; nothing
/// upstream of here needs to know about axum.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] rule_engine::EngineError),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Engine(rule_engine::EngineError::Store(
                rule_store::StoreError::RuleNotFound(_),
            )) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Engine(rule_engine::EngineError::Store(
                rule_store::StoreError::VersionNotFound { .. },
            )) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Engine(rule_engine::EngineError::Store(
                rule_store::StoreError::DuplicateName(_),
            )) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Engine(rule_engine::EngineError::Store(
                rule_store::StoreError::MissingField(_),
            )) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Engine(rule_engine::EngineError::Store(
                rule_store::StoreError::InvalidCondition(_),
            )) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Engine(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}
