use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde_json::json;

use crate::models::GameType;

use super::{MiniGame, Trial};

const SOUNDS: [&str; 6] = ["sino", "tambor", "apito", "palma", "latido", "miado"];
const BASE_LENGTH: usize = 2;
const TOTAL: u32 = 8;
const CORRECT_PER_LEVEL: u32 = 2;
const MAX_LEVEL: u32 = 4;

/// Sound-sequence recall for visually impaired students: the client plays
/// the named sounds in order and the student repeats the sequence. The
/// whole interaction stays on the auditory channel.
pub struct AudioMemoryGame {
    rng: StdRng,
    level: u32,
    correct_in_level: u32,
}

impl AudioMemoryGame {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            level: 1,
            correct_in_level: 0,
        }
    }
}

impl Default for AudioMemoryGame {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniGame for AudioMemoryGame {
    fn game_type(&self) -> GameType {
        GameType::AudioMemory
    }

    fn total_questions(&self) -> u32 {
        TOTAL
    }

    fn next_trial(&mut self, index: u32) -> Trial {
        let length = BASE_LENGTH + (self.level as usize - 1);
        let sequence: Vec<&str> = (0..length)
            .map(|_| *SOUNDS.choose(&mut self.rng).unwrap_or(&SOUNDS[0]))
            .collect();
        let expected = sequence.join(",");

        let prompt = json!({
            "instruction": "Ouça os sons e repita a sequência",
            "sounds": sequence,
            "available_sounds": SOUNDS,
            "level": self.level,
        });
        Trial::new(index, GameType::AudioMemory, prompt, expected)
    }

    fn on_judged(&mut self, correct: bool) {
        if correct {
            self.correct_in_level += 1;
            if self.correct_in_level >= CORRECT_PER_LEVEL && self.level < MAX_LEVEL {
                self.level += 1;
                self.correct_in_level = 0;
            }
        } else {
            self.correct_in_level = 0;
        }
    }
}
