use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::metrics::{ANSWERS_RECORDED_TOTAL, GAME_SESSIONS_ACTIVE, GAME_SESSIONS_TOTAL};
use crate::models::session::SubmitAnswerResponse;
use crate::models::{
    AdaptationCategory, AnswerEntry, GameSession, SessionStatus, SubmissionRecord,
};

use super::content_client::FeedbackBank;
use super::games::{MiniGame, Trial};
use super::submission::SubmissionSink;

/// How long a session may sit untouched before the sweep reclaims it.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
/// How often the background sweep runs.
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
    #[error("session is already complete")]
    AlreadyComplete,
}

/// Decimal separator used when rendering grades, derived from the
/// configured locale. Both paths (standard quiz and adaptive games) render
/// through this, so the dashboard aggregates identical strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalSeparator {
    Comma,
    Dot,
}

impl DecimalSeparator {
    pub fn from_locale(locale: &str) -> Self {
        // pt/es/fr-style locales write decimal commas.
        let lang = locale.split(['-', '_']).next().unwrap_or("");
        match lang {
            "pt" | "es" | "fr" | "de" | "it" => DecimalSeparator::Comma,
            _ => DecimalSeparator::Dot,
        }
    }
}

/// Final decimal grade on the 0..=10 scale, one decimal place.
pub fn compute_grade(score: u32, total_questions: u32) -> f64 {
    if total_questions == 0 {
        return 0.0;
    }
    let raw = score as f64 * 10.0 / total_questions as f64;
    (raw * 10.0).round() / 10.0
}

pub fn format_grade(grade: f64, separator: DecimalSeparator) -> String {
    let rendered = format!("{grade:.1}");
    match separator {
        DecimalSeparator::Dot => rendered,
        DecimalSeparator::Comma => rendered.replace('.', ","),
    }
}

/// A live adaptive session: scoring state plus the mini-game strategy
/// driving it and the prefetched feedback bank. Once finished, the emitted
/// submission record is cached here so repeat finishes return it unchanged.
struct ActiveSession {
    session: GameSession,
    game: Box<dyn MiniGame>,
    current_trial: Trial,
    feedback: FeedbackBank,
    record: Option<SubmissionRecord>,
    last_touch: Instant,
}

/// Stateful scoring controller shared by all mini-games.
///
/// Owns every live `GameSession`; sessions are mutated only through
/// `submit_answer` and produce a `SubmissionRecord` when the game's
/// stopping rule (or an explicit finish) completes them. Completed
/// sessions stay resident so finish is idempotent; the idle sweep
/// (`evict_idle`) is the only path that removes entries. Sessions are
/// never persisted, only their derived submission record is.
pub struct GameManager {
    sessions: RwLock<HashMap<Uuid, ActiveSession>>,
    sink: SubmissionSink,
    separator: DecimalSeparator,
}

impl GameManager {
    pub fn new(sink: SubmissionSink, separator: DecimalSeparator) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            sink,
            separator,
        }
    }

    /// Creates a session for the given mini-game and returns its id along
    /// with the first trial for the client to render.
    pub async fn start_session(
        &self,
        student_id: String,
        assessment_id: String,
        adaptation_type: AdaptationCategory,
        mut game: Box<dyn MiniGame>,
        feedback: FeedbackBank,
    ) -> (Uuid, Value) {
        let total_questions = game.total_questions().max(1);
        let session = GameSession::new(
            student_id,
            assessment_id,
            adaptation_type,
            game.game_type(),
            total_questions,
        );

        let first_trial = game.next_trial(0);
        let trial_view = first_trial.client_view();
        let id = session.id;

        GAME_SESSIONS_TOTAL
            .with_label_values(&[game.game_type().as_str()])
            .inc();
        GAME_SESSIONS_ACTIVE.inc();
        tracing::info!(
            "Adaptive session started: id={id}, game={}, category={}",
            game.game_type(),
            adaptation_type
        );

        self.sessions.write().await.insert(
            id,
            ActiveSession {
                session,
                game,
                current_trial: first_trial,
                feedback,
                record: None,
                last_touch: Instant::now(),
            },
        );

        (id, trial_view)
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<GameSession, SessionError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .map(|a| a.session.clone())
            .ok_or(SessionError::NotFound)
    }

    pub async fn current_trial(&self, id: Uuid) -> Result<Value, SessionError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .map(|a| a.current_trial.client_view())
            .ok_or(SessionError::NotFound)
    }

    /// Judges the answer against the current trial, records it, and either
    /// serves the next trial or finishes the session when the game's own
    /// stopping rule is met.
    pub async fn submit_answer(
        &self,
        id: Uuid,
        answer: &str,
    ) -> Result<SubmitAnswerResponse, SessionError> {
        let mut sessions = self.sessions.write().await;
        let active = sessions.get_mut(&id).ok_or(SessionError::NotFound)?;
        active.last_touch = Instant::now();

        if active.session.status == SessionStatus::Complete {
            return Err(SessionError::AlreadyComplete);
        }

        let trial = active.current_trial.clone();
        let correct = active.game.judge(&trial, answer);
        let answer_index = active.session.current_question_index;

        record_answer(&mut active.session, &trial.question_id, correct);

        let feedback = active.feedback.message(correct, answer_index);
        let answered = active.session.current_question_index;
        let finished = active.game.is_complete(answered);

        let (next_trial, submission) = if finished {
            // Marked complete and the record cached before the lock drops,
            // so a stray interleaved answer hits the AlreadyComplete guard
            // and a later explicit finish returns this same record.
            active.session.status = SessionStatus::Complete;
            let record = build_submission(&active.session, self.separator);
            active.record = Some(record.clone());
            (None, Some(record))
        } else {
            let trial = active.game.next_trial(answered);
            let view = trial.client_view();
            active.current_trial = trial;
            (Some(view), None)
        };

        let score = active.session.score;
        drop(sessions);

        if let Some(record) = &submission {
            self.emit_finished(id, record);
        }

        Ok(SubmitAnswerResponse {
            correct,
            feedback,
            score,
            question_index: answered,
            finished,
            next_trial,
            submission,
        })
    }

    /// Finishes a session and emits its submission record. Idempotent:
    /// once complete, repeat calls return the cached record without
    /// delivering it again.
    pub async fn finish(&self, id: Uuid) -> Result<SubmissionRecord, SessionError> {
        let mut sessions = self.sessions.write().await;
        let active = sessions.get_mut(&id).ok_or(SessionError::NotFound)?;
        active.last_touch = Instant::now();

        if let Some(record) = &active.record {
            return Ok(record.clone());
        }

        active.session.status = SessionStatus::Complete;
        let record = build_submission(&active.session, self.separator);
        active.record = Some(record.clone());
        drop(sessions);

        self.emit_finished(id, &record);
        Ok(record)
    }

    /// Drops sessions untouched for longer than `max_idle` and returns how
    /// many were removed. A session abandoned before completion still counts
    /// against the active gauge, so it is decremented here.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, active| {
            if active.last_touch.elapsed() <= max_idle {
                return true;
            }
            if active.record.is_none() {
                GAME_SESSIONS_ACTIVE.dec();
                tracing::warn!(
                    "Evicting abandoned session {id} after {} answered trial(s)",
                    active.session.answer_log.len()
                );
            }
            false
        });
        before - sessions.len()
    }

    fn emit_finished(&self, id: Uuid, record: &SubmissionRecord) {
        GAME_SESSIONS_ACTIVE.dec();
        tracing::info!(
            "Adaptive session finished: id={id}, score={}/{}, grade={}",
            record.score,
            record.total_questions,
            record.grade_display
        );
        self.sink.deliver(record);
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// The single mutation point of a session: append one immutable answer
/// entry, bump score and index, reset the per-question clock.
fn record_answer(session: &mut GameSession, question_id: &str, is_correct: bool) {
    let now = Utc::now();
    // Clamped to 1s so clock skew can never produce zero or negative
    // durations in the log.
    let duration_seconds = (now - session.question_start_time).num_seconds().max(1);

    session.answer_log.push(AnswerEntry {
        question_id: question_id.to_string(),
        is_correct,
        duration_seconds,
        question_index: session.current_question_index,
        adaptation_type: session.adaptation_type,
    });
    if is_correct {
        session.score += 1;
    }
    session.current_question_index += 1;
    session.question_start_time = now;

    ANSWERS_RECORDED_TOTAL
        .with_label_values(&[if is_correct { "true" } else { "false" }])
        .inc();
}

fn build_submission(session: &GameSession, separator: DecimalSeparator) -> SubmissionRecord {
    let finished_at = Utc::now();
    let answered = session.answer_log.len() as u32;
    // Denominator is the number of trials actually answered; games may
    // stop early or run long. A zero-answer session falls back to the
    // planned per-game count so the grade stays defined.
    let total_questions = if answered == 0 {
        session.total_questions
    } else {
        answered
    };
    let grade = compute_grade(session.score, total_questions);

    SubmissionRecord {
        student_id: session.student_id.clone(),
        assessment_id: session.assessment_id.clone(),
        adaptation_type: session.adaptation_type,
        game_type: session.game_type,
        score: session.score,
        total_questions,
        answer_log: session.answer_log.clone(),
        total_duration_seconds: (finished_at - session.session_start_time)
            .num_seconds()
            .max(0),
        grade,
        grade_display: format_grade(grade, separator),
        finished_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameType;

    fn test_session() -> GameSession {
        GameSession::new(
            "student-1".to_string(),
            "assessment-1".to_string(),
            AdaptationCategory::Tea,
            GameType::SequenceMusical,
            10,
        )
    }

    #[test]
    fn record_answer_increments_index_exactly_once() {
        let mut session = test_session();
        record_answer(&mut session, "q1", true);
        assert_eq!(session.current_question_index, 1);
        record_answer(&mut session, "q2", false);
        assert_eq!(session.current_question_index, 2);
        assert_eq!(session.answer_log.len(), 2);
    }

    #[test]
    fn score_counts_only_correct_answers() {
        let mut session = test_session();
        for i in 0..5 {
            record_answer(&mut session, &format!("q{i}"), true);
        }
        for i in 5..10 {
            record_answer(&mut session, &format!("q{i}"), false);
        }
        assert_eq!(session.score, 5);
        assert!(session.score as usize <= session.answer_log.len());
    }

    #[test]
    fn duration_is_clamped_to_one_second() {
        let mut session = test_session();
        // question started "in the future", as after clock skew
        session.question_start_time = Utc::now() + chrono::Duration::seconds(30);
        record_answer(&mut session, "q1", true);
        assert_eq!(session.answer_log[0].duration_seconds, 1);
    }

    #[test]
    fn grade_formula_and_rendering() {
        assert_eq!(compute_grade(7, 10), 7.0);
        assert_eq!(format_grade(7.0, DecimalSeparator::Dot), "7.0");
        assert_eq!(format_grade(7.0, DecimalSeparator::Comma), "7,0");

        assert_eq!(compute_grade(5, 10), 5.0);
        assert_eq!(format_grade(compute_grade(5, 10), DecimalSeparator::Comma), "5,0");

        // rounding to one decimal
        assert_eq!(compute_grade(2, 3), 6.7);
        assert_eq!(compute_grade(0, 0), 0.0);
    }

    #[test]
    fn separator_follows_locale() {
        assert_eq!(
            DecimalSeparator::from_locale("pt-BR"),
            DecimalSeparator::Comma
        );
        assert_eq!(DecimalSeparator::from_locale("en-US"), DecimalSeparator::Dot);
        assert_eq!(DecimalSeparator::from_locale(""), DecimalSeparator::Dot);
    }

    #[test]
    fn submission_denominator_is_the_answered_count() {
        let mut session = test_session();
        for i in 0..6 {
            record_answer(&mut session, &format!("q{i}"), i % 2 == 0);
        }
        let record = build_submission(&session, DecimalSeparator::Comma);
        assert_eq!(record.total_questions, 6);
        assert_eq!(record.score, 3);
        assert_eq!(record.grade_display, "5,0");
        assert_eq!(record.answer_log.len(), 6);
    }

    #[test]
    fn zero_answer_session_still_gets_a_defined_grade() {
        let session = test_session();
        let record = build_submission(&session, DecimalSeparator::Comma);
        assert_eq!(record.total_questions, 10);
        assert_eq!(record.grade, 0.0);
        assert_eq!(record.grade_display, "0,0");
    }

    #[test]
    fn zero_answer_fallback_uses_the_planned_per_game_count() {
        // a story adventure plans six scenes, not the default ten
        let session = GameSession::new(
            "student-1".to_string(),
            "assessment-1".to_string(),
            AdaptationCategory::Motor,
            GameType::StoryAdventure,
            6,
        );
        let record = build_submission(&session, DecimalSeparator::Comma);
        assert_eq!(record.total_questions, 6);
    }

    #[tokio::test]
    async fn full_session_through_the_manager() {
        use crate::services::games::create_game_of_type;

        let manager = GameManager::new(SubmissionSink::new(None), DecimalSeparator::Comma);
        let game = create_game_of_type(GameType::StoryAdventure, None);
        let (id, first_trial) = manager
            .start_session(
                "student-1".to_string(),
                "assessment-1".to_string(),
                AdaptationCategory::Motor,
                game,
                FeedbackBank::default(),
            )
            .await;
        assert_eq!(first_trial["index"], 0);
        assert_eq!(manager.session_count().await, 1);

        // answer all six scenes wrong except the first
        let mut finished = false;
        let mut answer = manager.current_trial(id).await.unwrap();
        let mut submissions = None;
        for i in 0..6 {
            let guess = if i == 0 {
                // scene 1 best choice
                "Atravessa pela ponte".to_string()
            } else {
                "resposta errada".to_string()
            };
            let response = manager.submit_answer(id, &guess).await.unwrap();
            finished = response.finished;
            if let Some(sub) = response.submission {
                submissions = Some(sub);
            }
            if let Some(next) = response.next_trial {
                answer = next;
            }
        }
        let _ = answer;

        assert!(finished);
        let record = submissions.expect("submission record on finish");
        assert_eq!(record.score, 1);
        assert_eq!(record.total_questions, 6);

        // the completed session stays resident, further answers conflict
        assert_eq!(manager.session_count().await, 1);
        assert!(matches!(
            manager.submit_answer(id, "x").await,
            Err(SessionError::AlreadyComplete)
        ));
    }

    #[tokio::test]
    async fn finish_is_idempotent_and_locks_the_session() {
        use crate::services::games::create_game_of_type;

        let manager = GameManager::new(SubmissionSink::new(None), DecimalSeparator::Comma);
        let game = create_game_of_type(GameType::StoryAdventure, None);
        let (id, _) = manager
            .start_session(
                "student-1".to_string(),
                "assessment-1".to_string(),
                AdaptationCategory::Motor,
                game,
                FeedbackBank::default(),
            )
            .await;

        manager.submit_answer(id, "Atravessa pela ponte").await.unwrap();
        let first = manager.finish(id).await.unwrap();
        assert_eq!(first.score, 1);
        assert_eq!(first.total_questions, 1);

        // repeat finishes return the record already emitted, unchanged
        let second = manager.finish(id).await.unwrap();
        assert_eq!(second.finished_at, first.finished_at);
        assert_eq!(second.score, first.score);
        assert_eq!(second.answer_log.len(), first.answer_log.len());

        // answering after finish conflicts instead of scoring
        assert!(matches!(
            manager.submit_answer(id, "x").await,
            Err(SessionError::AlreadyComplete)
        ));
    }

    #[tokio::test]
    async fn idle_sweep_evicts_abandoned_sessions() {
        use crate::services::games::create_game_of_type;

        let manager = GameManager::new(SubmissionSink::new(None), DecimalSeparator::Comma);
        let game = create_game_of_type(GameType::Memory, None);
        let (id, _) = manager
            .start_session(
                "student-1".to_string(),
                "assessment-1".to_string(),
                AdaptationCategory::Down,
                game,
                FeedbackBank::default(),
            )
            .await;
        assert_eq!(manager.session_count().await, 1);

        // a generous timeout keeps the fresh session around
        assert_eq!(manager.evict_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(manager.session_count().await, 1);

        // a zero timeout reclaims it
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(manager.evict_idle(Duration::ZERO).await, 1);
        assert_eq!(manager.session_count().await, 0);
        assert!(matches!(
            manager.submit_answer(id, "0").await,
            Err(SessionError::NotFound)
        ));
    }
}
