use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::models::session::SubmitAnswerRequest;
use crate::services::game_manager::SessionError;
use crate::services::AppState;

fn session_error_response(e: SessionError) -> (StatusCode, String) {
    match e {
        SessionError::NotFound => (StatusCode::NOT_FOUND, "Session not found".to_string()),
        SessionError::AlreadyComplete => (
            StatusCode::CONFLICT,
            "Session is already complete".to_string(),
        ),
    }
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state
        .games
        .snapshot(session_id)
        .await
        .map_err(session_error_response)?;
    Ok((StatusCode::OK, Json(session)))
}

pub async fn get_current_trial(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let trial = state
        .games
        .current_trial(session_id)
        .await
        .map_err(session_error_response)?;
    Ok((StatusCode::OK, Json(trial)))
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    tracing::info!("Answer submitted for session {session_id}");

    let response = state
        .games
        .submit_answer(session_id, &req.answer)
        .await
        .map_err(session_error_response)?;
    Ok((StatusCode::OK, Json(response)))
}

pub async fn finish_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Finishing session {session_id}");

    let record = state
        .games
        .finish(session_id)
        .await
        .map_err(session_error_response)?;
    Ok((StatusCode::OK, Json(record)))
}
