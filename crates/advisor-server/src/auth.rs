//! Bearer credential passthrough.
//!
//! The token is never validated here. It is handed to the scheduling tools
//! verbatim and the backend decides whether it is any good.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;

/// The raw token from `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(ApiError::MissingToken)?;
        parse_bearer(header.to_str().map_err(|_| ApiError::MalformedToken)?)
    }
}

fn parse_bearer(value: &str) -> Result<BearerToken, ApiError> {
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(BearerToken(token.to_string())),
        _ => Err(ApiError::MalformedToken),
    }
}
