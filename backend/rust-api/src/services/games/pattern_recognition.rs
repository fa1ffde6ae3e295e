use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::models::GameType;

use super::{BankQuestion, MiniGame, Trial};

const SYMBOL_SETS: [[&str; 3]; 4] = [
    ["⭐", "🌙", "☀️"],
    ["🔺", "⬛", "⚪"],
    ["🍎", "🍌", "🍇"],
    ["🐟", "🐦", "🐢"],
];

/// Visual pattern completion: an ABAB- or ABCABC-style sequence with one
/// hidden slot, answered from a small option set. Bank questions override
/// the generated patterns when the content provider supplies them.
pub struct PatternRecognitionGame {
    rng: StdRng,
    bank: Option<Vec<BankQuestion>>,
}

impl PatternRecognitionGame {
    pub fn new(bank: Option<Vec<BankQuestion>>) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            bank,
        }
    }

    fn generated(&mut self) -> (Vec<String>, Vec<String>, String, usize) {
        let set = SYMBOL_SETS[self.rng.random_range(0..SYMBOL_SETS.len())];
        let period = self.rng.random_range(2..=3usize);
        let repeats = 3;
        let pattern: Vec<&str> = (0..period * repeats).map(|i| set[i % period]).collect();

        let hidden = self.rng.random_range(0..pattern.len());
        let answer = pattern[hidden].to_string();

        let shown: Vec<String> = pattern
            .iter()
            .enumerate()
            .map(|(i, s)| if i == hidden { "?".to_string() } else { s.to_string() })
            .collect();

        let mut options: Vec<String> = set.iter().map(|s| s.to_string()).collect();
        options.shuffle(&mut self.rng);

        (shown, options, answer, hidden)
    }
}

impl MiniGame for PatternRecognitionGame {
    fn game_type(&self) -> GameType {
        GameType::PatternRecognition
    }

    fn next_trial(&mut self, index: u32) -> Trial {
        if let Some(bank) = &self.bank {
            if !bank.is_empty() {
                let q = &bank[index as usize % bank.len()];
                let prompt = json!({
                    "instruction": "Complete o padrão",
                    "pattern": q.prompt,
                    "options": q.options,
                });
                return Trial::new(index, GameType::PatternRecognition, prompt, q.answer.clone());
            }
        }

        let (shown, options, answer, hidden) = self.generated();
        let prompt = json!({
            "instruction": "Complete o padrão",
            "pattern": shown,
            "hidden_index": hidden,
            "options": options,
        });
        Trial::new(index, GameType::PatternRecognition, prompt, answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_pattern_hides_exactly_one_slot() {
        let mut game = PatternRecognitionGame::new(None);
        let trial = game.next_trial(0);
        let pattern = trial.prompt["pattern"].as_array().unwrap();
        let holes = pattern.iter().filter(|v| v.as_str() == Some("?")).count();
        assert_eq!(holes, 1);
    }

    #[test]
    fn answer_is_always_among_the_options() {
        let mut game = PatternRecognitionGame::new(None);
        for i in 0..10 {
            let trial = game.next_trial(i);
            let options: Vec<&str> = trial.prompt["options"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap())
                .collect();
            assert!(options.contains(&trial.expected.as_str()));
        }
    }
}
