use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde_json::json;

use crate::models::GameType;

use super::{MiniGame, Trial};

const NOTES: [&str; 7] = ["dó", "ré", "mi", "fá", "sol", "lá", "si"];
const BASE_LENGTH: usize = 3;
const MAX_LEVEL: u32 = 5;
const CORRECT_PER_LEVEL: u32 = 2;

/// Musical sequence recall, the policy assignment for TEA students: the
/// client plays a short melody, the student repeats the notes in order.
/// Melodies lengthen slowly and the level cap keeps the routine
/// predictable instead of open-ended.
pub struct SequenceMusicalGame {
    rng: StdRng,
    level: u32,
    correct_in_level: u32,
}

impl SequenceMusicalGame {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            level: 1,
            correct_in_level: 0,
        }
    }

    fn melody_length(&self) -> usize {
        BASE_LENGTH + (self.level as usize - 1)
    }
}

impl Default for SequenceMusicalGame {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniGame for SequenceMusicalGame {
    fn game_type(&self) -> GameType {
        GameType::SequenceMusical
    }

    fn next_trial(&mut self, index: u32) -> Trial {
        let melody: Vec<&str> = (0..self.melody_length())
            .map(|_| *NOTES.choose(&mut self.rng).unwrap_or(&NOTES[0]))
            .collect();
        let expected = melody.join(",");

        let prompt = json!({
            "instruction": "Ouça a melodia e repita as notas na ordem",
            "melody": melody,
            "notes": NOTES,
            "level": self.level,
        });
        Trial::new(index, GameType::SequenceMusical, prompt, expected)
    }

    fn on_judged(&mut self, correct: bool) {
        if correct {
            self.correct_in_level += 1;
            if self.correct_in_level >= CORRECT_PER_LEVEL && self.level < MAX_LEVEL {
                self.level += 1;
                self.correct_in_level = 0;
            }
        } else {
            // No level drop on error; regressing mid-session breaks the
            // predictable routine this game exists to provide.
            self.correct_in_level = 0;
        }
    }
}
