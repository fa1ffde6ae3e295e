use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde_json::json;

use crate::models::GameType;

use super::{MiniGame, Trial};

const SHAPES: [&str; 6] = ["🔴", "🔵", "🟢", "🟡", "🟣", "🟠"];
const BASE_LENGTH: usize = 3;
const MAX_LEVEL: u32 = 4;
const CORRECT_PER_LEVEL: u32 = 3;

/// Visual sequence recall. Shows a sequence of shapes the student repeats
/// back in order; three correct answers advance to a longer sequence, up
/// to the level cap.
pub struct SequenceGame {
    rng: StdRng,
    level: u32,
    correct_in_level: u32,
}

impl SequenceGame {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            level: 1,
            correct_in_level: 0,
        }
    }

    fn sequence_length(&self) -> usize {
        BASE_LENGTH + (self.level as usize - 1)
    }
}

impl Default for SequenceGame {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniGame for SequenceGame {
    fn game_type(&self) -> GameType {
        GameType::Sequence
    }

    fn next_trial(&mut self, index: u32) -> Trial {
        let sequence: Vec<&str> = (0..self.sequence_length())
            .map(|_| *SHAPES.choose(&mut self.rng).unwrap_or(&SHAPES[0]))
            .collect();
        let expected = sequence.join(",");

        let prompt = json!({
            "instruction": "Repita a sequência na mesma ordem",
            "sequence": sequence,
            "level": self.level,
            "palette": SHAPES,
        });
        Trial::new(index, GameType::Sequence, prompt, expected)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_grows_with_level() {
        let mut game = SequenceGame::new();
        let first = game.next_trial(0);
        assert_eq!(first.prompt["sequence"].as_array().unwrap().len(), 3);

        for _ in 0..CORRECT_PER_LEVEL {
            game.on_judged(true);
        }
        let harder = game.next_trial(3);
        assert_eq!(harder.prompt["sequence"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn wrong_answer_resets_level_progress() {
        let mut game = SequenceGame::new();
        game.on_judged(true);
        game.on_judged(true);
        game.on_judged(false);
        assert_eq!(game.correct_in_level, 0);
        assert_eq!(game.level, 1);
    }

    #[test]
    fn level_is_capped() {
        let mut game = SequenceGame::new();
        for _ in 0..(CORRECT_PER_LEVEL * 10) {
            game.on_judged(true);
        }
        assert_eq!(game.level, MAX_LEVEL);
    }
}
