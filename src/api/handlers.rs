//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    DraftRequest, ErrorResponse, PromptInfo, PromptsResponse, StatusResponse, SubmitResponse,
};
use super::AppState;
use crate::prompts::{self, SUGGESTED_PROMPTS};
use crate::runtime::SessionSnapshot;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        // Session read side
        .route("/api/session", get(get_session))
        .route("/api/session/stream", get(stream_session))
        // User actions
        .route("/api/session/draft", post(update_draft))
        .route("/api/session/submit", post(submit))
        .route("/api/session/clear", post(clear))
        // Suggested prompts
        .route("/api/prompts", get(list_prompts))
        .route("/api/prompts/:index", post(use_prompt))
        .with_state(state)
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        message: "Legal Ally session running",
        session_id: state.session.session_id(),
        state: state.session.state().name(),
    })
}

// ============================================================
// Session
// ============================================================

async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

async fn stream_session(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before taking the snapshot so no change falls in between
    let rx = state.session.subscribe();
    sse_stream(state.session.snapshot(), rx)
}

async fn update_draft(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> Json<SessionSnapshot> {
    state.session.update_draft(req.text);
    Json(state.session.snapshot())
}

/// Accept the draft and resolve it in the background; clients learn the
/// answer from the stream or the next snapshot.
async fn submit(State(state): State<AppState>) -> Json<SubmitResponse> {
    let Some(pending) = state.session.begin_submit() else {
        return Json(SubmitResponse { accepted: false });
    };

    let session = state.session.clone();
    tokio::spawn(async move {
        let outcome = session.complete(pending).await;
        tracing::debug!(outcome = ?outcome, "Submission resolved");
    });

    Json(SubmitResponse { accepted: true })
}

async fn clear(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.session.clear();
    Json(state.session.snapshot())
}

// ============================================================
// Suggested prompts
// ============================================================

async fn list_prompts() -> Json<PromptsResponse> {
    let prompts = SUGGESTED_PROMPTS
        .iter()
        .enumerate()
        .map(|(index, p)| PromptInfo {
            index,
            title: p.title,
            subtitle: p.subtitle,
        })
        .collect();
    Json(PromptsResponse { prompts })
}

/// Put a suggested prompt into the draft. Never submits.
async fn use_prompt(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let prompt = prompts::get(index)
        .ok_or_else(|| AppError::NotFound(format!("No suggested prompt {index}")))?;
    state.session.update_draft(prompt.draft_text());
    Ok(Json(state.session.snapshot()))
}

// ============================================================
// Errors
// ============================================================

#[derive(Debug)]
enum AppError {
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
