use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use super::activity::GameType;
use super::adaptation::AdaptationCategory;

/// Policy default for the number of trials in an adaptive session. A
/// mini-game may override it before the first answer is recorded.
pub const DEFAULT_TOTAL_QUESTIONS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    InProgress,
    Complete,
}

/// One scored trial. Immutable once appended to the answer log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: String,
    pub is_correct: bool,
    /// Elapsed seconds on this trial, clamped to a minimum of 1 so clock
    /// skew can never produce zero or negative durations.
    pub duration_seconds: i64,
    pub question_index: u32,
    pub adaptation_type: AdaptationCategory,
}

/// Scoring state for one assessment attempt. Owned by the game manager,
/// mutated only through `record_answer`, and discarded once converted into
/// a `SubmissionRecord`.
#[derive(Debug, Clone, Serialize)]
pub struct GameSession {
    pub id: Uuid,
    pub student_id: String,
    pub assessment_id: String,
    pub adaptation_type: AdaptationCategory,
    pub game_type: GameType,
    pub status: SessionStatus,
    pub score: u32,
    pub total_questions: u32,
    pub current_question_index: u32,
    pub answer_log: Vec<AnswerEntry>,
    pub session_start_time: DateTime<Utc>,
    #[serde(skip)]
    pub question_start_time: DateTime<Utc>,
}

impl GameSession {
    pub fn new(
        student_id: String,
        assessment_id: String,
        adaptation_type: AdaptationCategory,
        game_type: GameType,
        total_questions: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            student_id,
            assessment_id,
            adaptation_type,
            game_type,
            status: SessionStatus::InProgress,
            score: 0,
            total_questions,
            current_question_index: 0,
            answer_log: Vec::new(),
            session_start_time: now,
            question_start_time: now,
        }
    }
}

/// The normalized, persistence-ready summary of a completed attempt.
///
/// Structurally identical whether the attempt ran through the standard quiz
/// or any adaptive mini-game; the external dashboard aggregates both paths
/// through this one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub student_id: String,
    pub assessment_id: String,
    pub adaptation_type: AdaptationCategory,
    pub game_type: GameType,
    pub score: u32,
    pub total_questions: u32,
    pub answer_log: Vec<AnswerEntry>,
    pub total_duration_seconds: i64,
    /// Decimal grade on the 0..=10 scale, one decimal place.
    pub grade: f64,
    /// Grade rendered with the locale-appropriate decimal separator,
    /// e.g. "7,0" for pt-BR. Must match the standard quiz rendering.
    pub grade_display: String,
    pub finished_at: DateTime<Utc>,
}

// ---- wire types ----

#[derive(Debug, Deserialize, Validate)]
pub struct StudentInfo {
    #[validate(length(min = 1, message = "student id must not be empty"))]
    pub id: String,
    pub name: Option<String>,
    pub grade: Option<String>,
    /// Raw adaptation blob as stored by the front end: a JSON object, a
    /// JSON-encoded string, or null.
    pub adaptation_details: Option<Value>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssessmentInfo {
    #[validate(length(min = 1, message = "assessment id must not be empty"))]
    pub id: String,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RouteAssessmentRequest {
    #[validate(nested)]
    pub student: StudentInfo,
    #[validate(nested)]
    pub assessment: AssessmentInfo,
    /// Explicit mini-game override, mainly for game-bank driven content.
    /// Unknown values fall back to the memory game.
    pub game_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentPath {
    Standard,
    Adaptive,
}

#[derive(Debug, Serialize)]
pub struct RouteAssessmentResponse {
    pub path: AssessmentPath,
    /// Screen key the client should navigate to ("quiz" or "adaptiveGames").
    pub screen: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<AdaptationCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_type: Option<GameType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial: Option<Value>,
    /// Set when adaptive setup failed and the session was started on the
    /// degraded fallback path instead.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub adaptation_details: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub has_adaptation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<AdaptationCategory>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, message = "answer must not be empty"))]
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub feedback: String,
    pub score: u32,
    pub question_index: u32,
    pub finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_trial: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionRecord>,
}
