use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::models::GameType;

use super::{BankQuestion, MiniGame, Trial};

const BASE_TIME_LIMIT_SECONDS: u32 = 10;
const MIN_TIME_LIMIT_SECONDS: u32 = 4;

/// Timed multiple choice. Every trial carries a countdown the client
/// enforces; the window shrinks as the streak grows. Question content
/// comes from the game bank when the content provider supplied one,
/// otherwise from a built-in arithmetic bank.
pub struct SpeedMatchingGame {
    rng: StdRng,
    bank: Option<Vec<BankQuestion>>,
    streak: u32,
}

impl SpeedMatchingGame {
    pub fn new(bank: Option<Vec<BankQuestion>>) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            bank,
            streak: 0,
        }
    }

    fn time_limit(&self) -> u32 {
        BASE_TIME_LIMIT_SECONDS
            .saturating_sub(self.streak)
            .max(MIN_TIME_LIMIT_SECONDS)
    }

    fn built_in_question(&mut self) -> (String, Vec<String>, String) {
        let a = self.rng.random_range(2..=9u32);
        let b = self.rng.random_range(2..=9u32);
        let answer = a + b;
        let mut options = vec![answer, answer + 1, answer.saturating_sub(1), answer + 2];
        options.shuffle(&mut self.rng);
        (
            format!("{a} + {b} = ?"),
            options.iter().map(|n| n.to_string()).collect(),
            answer.to_string(),
        )
    }
}

impl MiniGame for SpeedMatchingGame {
    fn game_type(&self) -> GameType {
        GameType::SpeedMatching
    }

    fn next_trial(&mut self, index: u32) -> Trial {
        let (question, options, answer) = match &self.bank {
            Some(bank) if !bank.is_empty() => {
                let q = &bank[index as usize % bank.len()];
                (q.prompt.clone(), q.options.clone(), q.answer.clone())
            }
            _ => self.built_in_question(),
        };

        let prompt = json!({
            "instruction": "Responda antes do tempo acabar",
            "question": question,
            "options": options,
            "time_limit_seconds": self.time_limit(),
        });
        Trial::new(index, GameType::SpeedMatching, prompt, answer)
    }

    fn on_judged(&mut self, correct: bool) {
        if correct {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_limit_shrinks_with_streak_but_has_a_floor() {
        let mut game = SpeedMatchingGame::new(None);
        assert_eq!(game.time_limit(), BASE_TIME_LIMIT_SECONDS);
        for _ in 0..20 {
            game.on_judged(true);
        }
        assert_eq!(game.time_limit(), MIN_TIME_LIMIT_SECONDS);
        game.on_judged(false);
        assert_eq!(game.time_limit(), BASE_TIME_LIMIT_SECONDS);
    }

    #[test]
    fn bank_questions_are_served_in_order() {
        let bank = vec![
            BankQuestion {
                prompt: "Capital do Brasil".to_string(),
                options: vec!["Brasília".into(), "Rio".into()],
                answer: "Brasília".to_string(),
            },
            BankQuestion {
                prompt: "2 x 3".to_string(),
                options: vec!["5".into(), "6".into()],
                answer: "6".to_string(),
            },
        ];
        let mut game = SpeedMatchingGame::new(Some(bank));
        assert_eq!(game.next_trial(0).expected, "Brasília");
        assert_eq!(game.next_trial(1).expected, "6");
        // wraps around
        assert_eq!(game.next_trial(2).expected, "Brasília");
    }

    #[test]
    fn built_in_arithmetic_is_consistent() {
        let mut game = SpeedMatchingGame::new(None);
        let trial = game.next_trial(0);
        let options: Vec<String> = trial.prompt["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert!(options.contains(&trial.expected));
    }
}
