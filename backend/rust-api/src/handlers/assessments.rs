use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use crate::models::session::{ClassifyRequest, ClassifyResponse, RouteAssessmentRequest};
use crate::services::{classifier, routing, AppState};

/// Routes one assessment attempt: standard quiz for students without
/// adaptation data, an adaptive game session for everyone else. Adaptive
/// failures degrade instead of erroring, so this endpoint only rejects
/// malformed requests.
pub async fn route_assessment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RouteAssessmentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    tracing::info!(
        "Routing assessment {} for student {}",
        req.assessment.id,
        req.student.id
    );

    let response = routing::route_assessment(&state, &req).await;
    Ok((StatusCode::OK, Json(response)))
}

/// Standalone classification endpoint for external collaborators, e.g.
/// the login screen's "has adaptation" badge.
pub async fn classify_adaptation(
    Json(req): Json<ClassifyRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let details = classifier::parse_adaptation_details(req.adaptation_details.as_ref());
    let response = match details {
        Some(details) => ClassifyResponse {
            has_adaptation: true,
            category: Some(classifier::determine_adaptation_type(Some(&details))),
        },
        None => ClassifyResponse {
            has_adaptation: false,
            category: None,
        },
    };
    Ok((StatusCode::OK, Json(response)))
}
