//! HTTP error responses. Every error body is `{"detail": "..."}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use advisor_ai::{AiError, ChatError, StoreError};
use advisor_common::SessionId;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authorization token required")]
    MissingToken,
    #[error("invalid token format, use: Bearer <token>")]
    MalformedToken,
    #[error("{0}")]
    BadRequest(String),
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("model is rate limited, try again later")]
    RateLimited,
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken | ApiError::MalformedToken => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Model(AiError::RateLimited) => ApiError::RateLimited,
            ChatError::Model(e) => ApiError::Upstream(e.to_string()),
            ChatError::Store(e) => e.into(),
            ChatError::Disconnected => ApiError::Internal("client disconnected".into()),
        }
    }
}
