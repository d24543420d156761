//! API request handlers

use std::sync::Arc;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::session::SessionManager;
use crate::api::types::*;
use crate::rag::RagService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rag: Arc<RagService>,
    pub sessions: Arc<SessionManager>,
}

/// Health check handler
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthResponse>>, StatusCode> {
    let collection = state.rag.retriever().collection();
    match collection.count().await {
        Ok(entries) => Ok(Json(ApiResponse::success(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            collection: collection.name().to_string(),
            entries,
        }))),
        Err(e) => {
            error!("Error counting collection entries: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Answer one message, creating a session when none is given
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatResponse>>, (StatusCode, Json<ApiResponse<ChatResponse>>)> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("message must not be empty")),
        ));
    }

    let handle = match req.session_id.as_deref() {
        Some(id) => state.sessions.get_session(id).ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(format!("Session '{id}' not found or expired"))),
            )
        })?,
        None => state.sessions.create_session(),
    };

    // Held until the turn is recorded; a second message on this session waits here
    let mut session = handle.lock().await;
    info!("POST /api/chat (session {})", session.session_id);

    let reply = state.rag.respond(message).await;
    session.add_turn(message, &reply);
    let session_id = session.session_id.clone();
    drop(session);

    Ok(Json(ApiResponse::success(ChatResponse {
        session_id,
        answer: reply.answer,
        citations: reply.citations,
        is_error: reply.is_error,
    })))
}

/// Session history
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionResponse>>, StatusCode> {
    info!("GET /api/sessions/{}", session_id);

    match state.sessions.snapshot(&session_id).await {
        Some(session) => Ok(Json(ApiResponse::success(SessionResponse {
            session_id: session.session_id,
            history: session.history,
        }))),
        None => Err(StatusCode::NOT_FOUND),
    }
}
