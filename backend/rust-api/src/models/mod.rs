pub mod activity;
pub mod adaptation;
pub mod session;

pub use activity::{ActivityChoice, GameType};
pub use adaptation::{AdaptationCategory, AdaptationDetails};
pub use session::{
    AnswerEntry, AssessmentPath, GameSession, SessionStatus, SubmissionRecord,
    DEFAULT_TOTAL_QUESTIONS,
};
