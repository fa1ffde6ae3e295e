use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::json;

use crate::models::GameType;

use super::{MiniGame, Trial};

const GRID_SIZE: usize = 9; // 3x3
const BASE_LENGTH: usize = 2;
const MAX_LENGTH: usize = 6;

/// Spatial click-sequence: cells of a 3x3 grid light up in order and the
/// student clicks them back in the same order. The path never repeats a
/// cell inside one trial, and grows by one cell every two trials.
pub struct ClickSequenceGame {
    rng: StdRng,
}

impl ClickSequenceGame {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    fn length_for(index: u32) -> usize {
        (BASE_LENGTH + (index as usize / 2)).min(MAX_LENGTH)
    }
}

impl Default for ClickSequenceGame {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniGame for ClickSequenceGame {
    fn game_type(&self) -> GameType {
        GameType::ClickSequence
    }

    fn next_trial(&mut self, index: u32) -> Trial {
        let mut cells: Vec<usize> = (0..GRID_SIZE).collect();
        cells.shuffle(&mut self.rng);
        cells.truncate(Self::length_for(index));

        let expected = cells
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let prompt = json!({
            "instruction": "Clique nas células na mesma ordem",
            "grid_size": 3,
            "sequence": cells,
        });
        Trial::new(index, GameType::ClickSequence, prompt, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_has_no_repeated_cells() {
        let mut game = ClickSequenceGame::new();
        let trial = game.next_trial(9);
        let cells: Vec<u64> = trial.prompt["sequence"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_u64().unwrap())
            .collect();
        let mut unique = cells.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), cells.len());
        assert!(cells.iter().all(|&c| c < 9));
    }

    #[test]
    fn length_grows_and_is_capped() {
        assert_eq!(ClickSequenceGame::length_for(0), 2);
        assert_eq!(ClickSequenceGame::length_for(4), 4);
        assert_eq!(ClickSequenceGame::length_for(40), MAX_LENGTH);
    }
}
