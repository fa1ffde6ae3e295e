use serde::{Deserialize, Serialize};

use super::adaptation::AdaptationCategory;

/// Identifiers of the ten adaptive mini-games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Memory,
    Sequence,
    SpeedMatching,
    Classification,
    AudioMemory,
    ClickSequence,
    StoryAdventure,
    PatternRecognition,
    SequenceMusical,
    RhythmTurbo,
}

impl GameType {
    pub const ALL: [GameType; 10] = [
        GameType::Memory,
        GameType::Sequence,
        GameType::SpeedMatching,
        GameType::Classification,
        GameType::AudioMemory,
        GameType::ClickSequence,
        GameType::StoryAdventure,
        GameType::PatternRecognition,
        GameType::SequenceMusical,
        GameType::RhythmTurbo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Memory => "memory",
            GameType::Sequence => "sequence",
            GameType::SpeedMatching => "speed_matching",
            GameType::Classification => "classification",
            GameType::AudioMemory => "audio_memory",
            GameType::ClickSequence => "click_sequence",
            GameType::StoryAdventure => "story_adventure",
            GameType::PatternRecognition => "pattern_recognition",
            GameType::SequenceMusical => "sequence_musical",
            GameType::RhythmTurbo => "rhythm_turbo",
        }
    }

    /// Lenient lookup used by the game factory. Unknown identifiers yield
    /// `None`; the factory falls back to `Memory` so a bad configuration
    /// value can never block a session from starting.
    pub fn parse(s: &str) -> Option<GameType> {
        GameType::ALL.iter().copied().find(|g| g.as_str() == s)
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy-resolved mini-game assignment for a category. Produced once per
/// session from the static table in `services::policy`; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityChoice {
    pub category: AdaptationCategory,
    pub game_type: GameType,
    pub rationale: String,
}
