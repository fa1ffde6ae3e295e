use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::models::GameType;

use super::{MiniGame, Trial};

const TOTAL: u32 = 12;
const BASE_BPM: u32 = 80;
const BPM_STEP: u32 = 10;
const MAX_BPM: u32 = 140;
const PATTERN_BEATS: usize = 6;

/// Countdown rhythm matching: the client plays a beat pattern at the given
/// tempo and the student taps it back before the countdown runs out. The
/// tempo rises with the combo and resets on a miss; the countdown itself
/// is client-side, the server only judges the tapped pattern.
pub struct RhythmTurboGame {
    rng: StdRng,
    combo: u32,
}

impl RhythmTurboGame {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            combo: 0,
        }
    }

    fn bpm(&self) -> u32 {
        (BASE_BPM + self.combo * BPM_STEP).min(MAX_BPM)
    }
}

impl Default for RhythmTurboGame {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniGame for RhythmTurboGame {
    fn game_type(&self) -> GameType {
        GameType::RhythmTurbo
    }

    fn total_questions(&self) -> u32 {
        TOTAL
    }

    fn next_trial(&mut self, index: u32) -> Trial {
        // "X" = beat, "-" = rest; first slot is always a beat so the
        // pattern has an audible anchor.
        let pattern: String = (0..PATTERN_BEATS)
            .map(|i| {
                if i == 0 || self.rng.random_bool(0.6) {
                    'X'
                } else {
                    '-'
                }
            })
            .collect();

        let prompt = json!({
            "instruction": "Repita o ritmo antes do tempo acabar",
            "pattern": pattern,
            "bpm": self.bpm(),
            "countdown_seconds": 8,
            "combo": self.combo,
        });
        Trial::new(index, GameType::RhythmTurbo, prompt, pattern)
    }

    fn on_judged(&mut self, correct: bool) {
        if correct {
            self.combo += 1;
        } else {
            self.combo = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo_follows_the_combo() {
        let mut game = RhythmTurboGame::new();
        assert_eq!(game.bpm(), BASE_BPM);
        for _ in 0..3 {
            game.on_judged(true);
        }
        assert_eq!(game.bpm(), BASE_BPM + 3 * BPM_STEP);
        game.on_judged(false);
        assert_eq!(game.bpm(), BASE_BPM);
    }

    #[test]
    fn tempo_is_capped() {
        let mut game = RhythmTurboGame::new();
        for _ in 0..50 {
            game.on_judged(true);
        }
        assert_eq!(game.bpm(), MAX_BPM);
    }

    #[test]
    fn pattern_always_starts_with_a_beat() {
        let mut game = RhythmTurboGame::new();
        for i in 0..10 {
            let trial = game.next_trial(i);
            assert!(trial.expected.starts_with('X'));
            assert_eq!(trial.expected.len(), PATTERN_BEATS);
        }
    }
}
