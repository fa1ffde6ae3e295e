//! The polymorphic mini-game contract.
//!
//! Every adaptive activity is one strategy behind the `MiniGame` trait: it
//! generates structured trials for the client to render, judges the posted
//! answers, and owns its own stopping rule. Scoring itself never lives
//! here; each judged answer is recorded through the game manager so the
//! answer-log contract stays uniform across all ten games.

use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{GameType, DEFAULT_TOTAL_QUESTIONS};

mod audio_memory;
mod classification;
mod click_sequence;
mod memory;
mod pattern_recognition;
mod rhythm_turbo;
mod sequence;
mod sequence_musical;
mod speed_matching;
mod story_adventure;

pub use audio_memory::AudioMemoryGame;
pub use classification::ClassificationGame;
pub use click_sequence::ClickSequenceGame;
pub use memory::MemoryGame;
pub use pattern_recognition::PatternRecognitionGame;
pub use rhythm_turbo::RhythmTurboGame;
pub use sequence::SequenceGame;
pub use sequence_musical::SequenceMusicalGame;
pub use speed_matching::SpeedMatchingGame;
pub use story_adventure::StoryAdventureGame;

/// One pending question/interaction. The `prompt` is an opaque payload the
/// client renders; `expected` stays on the server and never reaches the
/// wire (see `client_view`).
#[derive(Debug, Clone)]
pub struct Trial {
    pub question_id: String,
    pub index: u32,
    pub game_type: GameType,
    pub prompt: Value,
    pub expected: String,
}

impl Trial {
    pub fn new(index: u32, game_type: GameType, prompt: Value, expected: impl Into<String>) -> Self {
        Self {
            question_id: Uuid::new_v4().to_string(),
            index,
            game_type,
            prompt,
            expected: expected.into(),
        }
    }

    /// Wire representation, with the expected answer stripped.
    pub fn client_view(&self) -> Value {
        json!({
            "question_id": self.question_id,
            "index": self.index,
            "game_type": self.game_type,
            "prompt": self.prompt,
        })
    }
}

/// A question bank entry fetched from the external content provider.
/// Best-effort: adapters that can consume one fall back to built-in
/// content when the bank is absent or does not cover their game type.
#[derive(Debug, Clone, Deserialize)]
pub struct GameBankEntry {
    pub game_type: String,
    #[serde(default)]
    pub questions: Vec<BankQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BankQuestion {
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
}

/// Interaction strategy for one adaptive activity.
///
/// Implementations vary only in how trials are generated and judged and in
/// when they consider themselves finished; the scoring contract is shared
/// and lives in `GameManager`.
pub trait MiniGame: Send + Sync {
    fn game_type(&self) -> GameType;

    /// Planned trial count for the session, fixed before the first answer.
    fn total_questions(&self) -> u32 {
        DEFAULT_TOTAL_QUESTIONS
    }

    /// Generate the trial at `index`. Called once per question, before the
    /// matching `judge` call.
    fn next_trial(&mut self, index: u32) -> Trial;

    /// Judge an answer against the current trial. Adapters use this hook
    /// for their own level/combo bookkeeping as well.
    fn judge(&mut self, trial: &Trial, answer: &str) -> bool {
        let correct = normalize(answer) == normalize(&trial.expected);
        self.on_judged(correct);
        correct
    }

    /// Post-judgment bookkeeping hook for adapters with level progression.
    fn on_judged(&mut self, _correct: bool) {}

    /// The game's own stopping rule, checked after each recorded answer.
    /// Intentionally not unified: different activities have different
    /// natural endpoints.
    fn is_complete(&self, answered: u32) -> bool {
        answered >= self.total_questions()
    }
}

/// Case-insensitive, whitespace-insensitive answer comparison shared by
/// the adapters.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Type-keyed factory. Unknown identifiers fall back to the memory game —
/// this is deliberately the only total function over possibly-invalid
/// configuration data, so a bad game type can never block a session.
pub fn create_game(requested: &str, bank: Option<&[GameBankEntry]>) -> Box<dyn MiniGame> {
    let game_type = GameType::parse(requested).unwrap_or_else(|| {
        tracing::warn!("Unknown game type '{requested}', falling back to memory");
        GameType::Memory
    });
    create_game_of_type(game_type, bank)
}

pub fn create_game_of_type(game_type: GameType, bank: Option<&[GameBankEntry]>) -> Box<dyn MiniGame> {
    match game_type {
        GameType::Memory => Box::new(MemoryGame::new()),
        GameType::Sequence => Box::new(SequenceGame::new()),
        GameType::SpeedMatching => {
            Box::new(SpeedMatchingGame::new(bank_questions(bank, game_type)))
        }
        GameType::Classification => {
            Box::new(ClassificationGame::new(bank_questions(bank, game_type)))
        }
        GameType::AudioMemory => Box::new(AudioMemoryGame::new()),
        GameType::ClickSequence => Box::new(ClickSequenceGame::new()),
        GameType::StoryAdventure => Box::new(StoryAdventureGame::new()),
        GameType::PatternRecognition => {
            Box::new(PatternRecognitionGame::new(bank_questions(bank, game_type)))
        }
        GameType::SequenceMusical => Box::new(SequenceMusicalGame::new()),
        GameType::RhythmTurbo => Box::new(RhythmTurboGame::new()),
    }
}

fn bank_questions(bank: Option<&[GameBankEntry]>, game_type: GameType) -> Option<Vec<BankQuestion>> {
    let entries = bank?;
    entries
        .iter()
        .find(|e| e.game_type == game_type.as_str() && !e.questions.is_empty())
        .map(|e| e.questions.clone())
}
