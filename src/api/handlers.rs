//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{AcceptedResponse, ErrorResponse, TurnRequest};
use super::AppState;
use crate::runtime::DispatchError;
use crate::state_machine::{SessionSnapshot, TransitionError};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Read-only view
        .route("/api/session", get(get_session))
        .route("/api/session/stream", get(stream_session))
        // One route per trigger
        .route("/api/session/draw-components", post(draw_components))
        .route("/api/session/generate-idea", post(generate_idea))
        .route("/api/session/turn", post(submit_turn))
        .route("/api/session/proceed", post(proceed))
        .route("/api/session/reset", post(reset_session))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session View
// ============================================================

async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

async fn stream_session(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before capturing so no change slips between the two
    let updates = state.session.subscribe();
    sse_stream(state.session.snapshot(), updates)
}

// ============================================================
// Triggers
// ============================================================

async fn draw_components(
    State(state): State<AppState>,
) -> Result<Json<AcceptedResponse>, AppError> {
    state.session.draw_components().await?;
    Ok(accepted(&state))
}

async fn generate_idea(State(state): State<AppState>) -> Result<Json<AcceptedResponse>, AppError> {
    state.session.generate_idea().await?;
    Ok(accepted(&state))
}

async fn submit_turn(
    State(state): State<AppState>,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<AcceptedResponse>, AppError> {
    let Json(req) = payload?;
    state.session.submit_turn(req.text).await?;
    Ok(accepted(&state))
}

async fn proceed(State(state): State<AppState>) -> Result<Json<AcceptedResponse>, AppError> {
    state.session.proceed().await?;
    Ok(accepted(&state))
}

async fn reset_session(State(state): State<AppState>) -> Result<Json<AcceptedResponse>, AppError> {
    state.session.reset_session().await?;
    Ok(accepted(&state))
}

fn accepted(state: &AppState) -> Json<AcceptedResponse> {
    Json(AcceptedResponse::new(state.session.snapshot()))
}

async fn get_version() -> &'static str {
    concat!("hcd-mentor ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Rejected(e @ TransitionError::Validation(_)) => {
                AppError::BadRequest(e.to_string())
            }
            DispatchError::Rejected(e) => AppError::Conflict(e.to_string()),
            DispatchError::Stopped => AppError::Internal(DispatchError::Stopped.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
