use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::models::GameType;

use super::{MiniGame, Trial};

const SYMBOLS: [&str; 8] = ["🐶", "🐱", "🐰", "🦁", "🐸", "🐼", "🦊", "🐵"];
const PAIRS: u32 = 8;

/// Pair-matching memory game. Each trial deals a face-up board, reveals
/// one target card and asks for the position of its pair. One matched pair
/// per trial; the game ends when every pair has been attempted.
///
/// Also the universal fallback: any session that cannot be set up as
/// requested degrades to this game.
pub struct MemoryGame {
    rng: StdRng,
}

impl MemoryGame {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Default for MemoryGame {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniGame for MemoryGame {
    fn game_type(&self) -> GameType {
        GameType::Memory
    }

    fn total_questions(&self) -> u32 {
        PAIRS
    }

    fn next_trial(&mut self, index: u32) -> Trial {
        let mut board: Vec<&str> = SYMBOLS.iter().chain(SYMBOLS.iter()).copied().collect();
        board.shuffle(&mut self.rng);

        let target = self.rng.random_range(0..board.len());
        let matching = board
            .iter()
            .enumerate()
            .position(|(i, s)| i != target && *s == board[target])
            .unwrap_or(target);

        let prompt = json!({
            "instruction": "Encontre o par da carta revelada",
            "cards": board,
            "revealed_index": target,
        });
        Trial::new(index, GameType::Memory, prompt, matching.to_string())
    }
}
