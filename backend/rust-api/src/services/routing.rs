use anyhow::{bail, Result};
use serde_json::Value;
use uuid::Uuid;

use crate::metrics::ASSESSMENTS_ROUTED_TOTAL;
use crate::models::session::{
    AssessmentPath, RouteAssessmentRequest, RouteAssessmentResponse,
};
use crate::models::{AdaptationCategory, GameType};

use super::classifier;
use super::content_client::FeedbackBank;
use super::games::{create_game, create_game_of_type, GameBankEntry};
use super::policy;
use super::AppState;

/// Screen keys consumed by the front end's navigation collaborator.
pub const SCREEN_STANDARD_QUIZ: &str = "quiz";
pub const SCREEN_ADAPTIVE_GAMES: &str = "adaptiveGames";

pub struct AdaptiveStart {
    pub session_id: Uuid,
    pub game_type: GameType,
    pub trial: Value,
    pub degraded: bool,
}

/// The single fork point of the whole subsystem: a student without
/// adaptation details goes to the standard quiz untouched; anyone else is
/// classified, matched to an activity, and handed a running game session.
pub async fn route_assessment(
    state: &AppState,
    req: &RouteAssessmentRequest,
) -> RouteAssessmentResponse {
    let details = classifier::parse_adaptation_details(req.student.adaptation_details.as_ref());

    let Some(details) = details else {
        ASSESSMENTS_ROUTED_TOTAL
            .with_label_values(&["standard"])
            .inc();
        tracing::info!(
            "Routing student {} to the standard quiz (no adaptation data)",
            req.student.id
        );
        return RouteAssessmentResponse {
            path: AssessmentPath::Standard,
            screen: SCREEN_STANDARD_QUIZ,
            category: None,
            game_type: None,
            rationale: None,
            session_id: None,
            trial: None,
            degraded: false,
        };
    };

    let category = classifier::determine_adaptation_type(Some(&details));
    let choice = policy::determine_optimal_activity(category);
    let requested = req.game_type.as_deref().unwrap_or(choice.game_type.as_str());

    let start = start_adaptive_game(
        state,
        category,
        requested,
        &req.student.id,
        &req.assessment.id,
        req.student.grade.as_deref(),
    )
    .await;

    ASSESSMENTS_ROUTED_TOTAL
        .with_label_values(&["adaptive"])
        .inc();
    tracing::info!(
        "Routing student {} to adaptive game {} (category {category})",
        req.student.id,
        start.game_type
    );

    RouteAssessmentResponse {
        path: AssessmentPath::Adaptive,
        screen: SCREEN_ADAPTIVE_GAMES,
        category: Some(category),
        game_type: Some(start.game_type),
        rationale: Some(choice.rationale),
        session_id: Some(start.session_id),
        trial: Some(start.trial),
        degraded: start.degraded,
    }
}

/// Starts the requested mini-game session. Never fails: any setup error is
/// caught here and the session starts on the degraded fallback path
/// instead, because a blocked assessment is worse than a plain one for
/// this audience.
pub async fn start_adaptive_game(
    state: &AppState,
    category: AdaptationCategory,
    requested: &str,
    student_id: &str,
    assessment_id: &str,
    grade: Option<&str>,
) -> AdaptiveStart {
    match try_start(state, category, requested, student_id, assessment_id, grade).await {
        Ok(start) => start,
        Err(e) => {
            tracing::error!(
                "Adaptive setup failed for student {student_id} ({requested}), \
                 starting degraded fallback session: {e:#}"
            );
            let game = create_game_of_type(GameType::Memory, None);
            let (session_id, trial) = state
                .games
                .start_session(
                    student_id.to_string(),
                    assessment_id.to_string(),
                    category,
                    game,
                    FeedbackBank::default(),
                )
                .await;
            AdaptiveStart {
                session_id,
                game_type: GameType::Memory,
                trial,
                degraded: true,
            }
        }
    }
}

async fn try_start(
    state: &AppState,
    category: AdaptationCategory,
    requested: &str,
    student_id: &str,
    assessment_id: &str,
    grade: Option<&str>,
) -> Result<AdaptiveStart> {
    // Both fetches are best-effort; failures inside fall back to built-in
    // content and never reach this Result.
    let (bank, feedback) = tokio::join!(
        state.content.fetch_game_bank(category, grade),
        state.content.fetch_feedback_bank(category),
    );

    if let Some(entries) = &bank {
        validate_game_bank(entries)?;
    }

    let game = create_game(requested, bank.as_deref());
    let game_type = game.game_type();

    let (session_id, trial) = state
        .games
        .start_session(
            student_id.to_string(),
            assessment_id.to_string(),
            category,
            game,
            feedback,
        )
        .await;

    Ok(AdaptiveStart {
        session_id,
        game_type,
        trial,
        degraded: false,
    })
}

/// A fetched bank that parsed but is internally inconsistent would produce
/// unanswerable trials; that counts as a setup failure, not a content
/// fallback, and routes to the degraded path.
fn validate_game_bank(entries: &[GameBankEntry]) -> Result<()> {
    for entry in entries {
        for question in &entry.questions {
            if question.answer.trim().is_empty() {
                bail!(
                    "Game bank entry '{}' has a question with an empty answer",
                    entry.game_type
                );
            }
            if !question.options.is_empty() && !question.options.contains(&question.answer) {
                bail!(
                    "Game bank entry '{}' expects '{}' which is not among its options",
                    entry.game_type,
                    question.answer
                );
            }
        }
    }
    Ok(())
}
