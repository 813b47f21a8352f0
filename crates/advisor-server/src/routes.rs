//! Chat API routes.

use std::convert::Infallible;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use advisor_common::{new_correlation_id, SessionId};

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::protocol::{
    CreateSessionRequest, ListSessionsResponse, SendMessageRequest, SendMessageResponse,
    SessionResponse,
};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat/session", post(create_session))
        .route("/chat/session/:session_id", delete(delete_session))
        .route("/chat/sessions", get(list_sessions))
        .route("/chat/message", post(send_message))
        .route("/chat/stream", post(stream_message))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn create_session(
    State(state): State<AppState>,
    _token: BearerToken,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(req) = body?;
    state.sessions.create(&req.session_id).await?;
    Ok(Json(SessionResponse {
        session_id: req.session_id,
    }))
}

async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<ListSessionsResponse>, ApiError> {
    let sessions = state.sessions.list().await?;
    Ok(Json(ListSessionsResponse { sessions }))
}

async fn delete_session(
    State(state): State<AppState>,
    _token: BearerToken,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.sessions.delete(&SessionId::from(session_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn send_message(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let Json(req) = body?;
    ensure_chat_request(&state, &req).await?;

    let request_id = new_correlation_id();
    info!(request = %request_id, session = %req.session_id, "chat message");

    let reply = state
        .sessions
        .send(&req.session_id, &req.message, &token)
        .await?;
    Ok(Json(SendMessageResponse {
        session_id: req.session_id,
        reply: reply.text,
        capped: reply.capped,
    }))
}

/// Each SSE `data:` line carries one JSON chat event.
async fn stream_message(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Json(req) = body?;
    ensure_chat_request(&state, &req).await?;

    let request_id = new_correlation_id();
    info!(request = %request_id, session = %req.session_id, "chat stream");

    let rx = state
        .sessions
        .send_stream(req.session_id, req.message, token);
    let stream = ReceiverStream::new(rx).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
        Ok(Event::default().data(data))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

async fn ensure_chat_request(state: &AppState, req: &SendMessageRequest) -> Result<(), ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".into()));
    }
    if !state.sessions.exists(&req.session_id).await? {
        return Err(ApiError::SessionNotFound(req.session_id.clone()));
    }
    Ok(())
}
