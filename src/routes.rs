//! REST surface for the dialogue core.
//!
//! One inbound operation drives the conversation (`POST /api/chat`); the
//! rest mirror the original app's sidebar: reset, profile editing, and a
//! status view for debugging.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dialogue::{DialogueEngine, Phase, ShareStage, UserProfile};
use crate::emotion::EmotionKind;
use crate::error::SessionError;
use crate::session::SessionStore;

/// Shared state for the chat routes.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DialogueEngine>,
    pub sessions: SessionStore,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Omit to start a new conversation.
    pub conversation_id: Option<Uuid>,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub conversation_id: Uuid,
    pub reply: String,
    pub phase: Phase,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub phase: Phase,
    pub share_stage: Option<ShareStage>,
    pub detected_emotion: Option<EmotionKind>,
    pub profile: UserProfile,
    pub history_len: usize,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub name: String,
    pub age: u8,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

fn session_error_response(err: SessionError) -> axum::response::Response {
    match err {
        SessionError::NotFound(_) => error_response(StatusCode::NOT_FOUND, err.to_string()),
        SessionError::InvalidAge { .. } => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

/// POST /api/chat
///
/// Submit one utterance. Creates the conversation when no id is given. The
/// per-session mutex is held across the whole turn, including the LLM call,
/// so turns against one conversation never interleave.
async fn submit_utterance(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let (id, session) = match state.sessions.get_or_create(request.conversation_id).await {
        Ok(found) => found,
        Err(e) => return session_error_response(e),
    };

    let mut conversation = session.state.lock().await;
    let reply = state
        .engine
        .process_turn(&mut conversation, &request.text)
        .await;

    Json(ChatResponse {
        conversation_id: id,
        reply,
        phase: conversation.phase,
    })
    .into_response()
}

/// POST /api/chat/{id}/reset
///
/// Restore the conversation to its documented defaults.
async fn reset_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.sessions.reset(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => session_error_response(e),
    }
}

/// GET /api/chat/{id}
///
/// Current control state and profile — the original app's sidebar view.
async fn get_status(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let session = match state.sessions.get(id).await {
        Ok(s) => s,
        Err(e) => return session_error_response(e),
    };
    let conversation = session.state.lock().await;
    Json(StatusResponse {
        created_at: session.created_at,
        phase: conversation.phase,
        share_stage: conversation.share_stage,
        detected_emotion: conversation.detected_emotion,
        profile: conversation.profile.clone(),
        history_len: conversation.history.len(),
    })
    .into_response()
}

/// PUT /api/chat/{id}/profile
///
/// Update the child's name/age. Settable at any time; the core reads it when
/// building the `intro` instruction.
async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ProfileRequest>,
) -> impl IntoResponse {
    let profile = match UserProfile::validate(&request.name, request.age) {
        Ok(p) => p,
        Err(e) => return session_error_response(e),
    };
    let session = match state.sessions.get(id).await {
        Ok(s) => s,
        Err(e) => return session_error_response(e),
    };
    session.state.lock().await.profile = profile;
    StatusCode::NO_CONTENT.into_response()
}

/// Build the chat routes.
pub fn chat_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(submit_utterance))
        .route("/api/chat/{id}/reset", post(reset_conversation))
        .route("/api/chat/{id}", get(get_status))
        .route("/api/chat/{id}/profile", put(update_profile))
        .with_state(state)
}
