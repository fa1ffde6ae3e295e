use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde_json::json;

use crate::models::GameType;

use super::{BankQuestion, MiniGame, Trial};

const CATEGORIES: [&str; 3] = ["animal", "fruta", "objeto"];

const ITEMS: [(&str, &str); 12] = [
    ("cachorro", "animal"),
    ("gato", "animal"),
    ("elefante", "animal"),
    ("papagaio", "animal"),
    ("banana", "fruta"),
    ("maçã", "fruta"),
    ("laranja", "fruta"),
    ("abacaxi", "fruta"),
    ("cadeira", "objeto"),
    ("caneta", "objeto"),
    ("mochila", "objeto"),
    ("relógio", "objeto"),
];

/// Drag-drop style classification: one familiar item per trial, sorted
/// into its category. No timer and no level progression; the gentle pace
/// is the point for this audience.
pub struct ClassificationGame {
    rng: StdRng,
    bank: Option<Vec<BankQuestion>>,
}

impl ClassificationGame {
    pub fn new(bank: Option<Vec<BankQuestion>>) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            bank,
        }
    }
}

impl MiniGame for ClassificationGame {
    fn game_type(&self) -> GameType {
        GameType::Classification
    }

    fn next_trial(&mut self, index: u32) -> Trial {
        let (item, options, answer) = match &self.bank {
            Some(bank) if !bank.is_empty() => {
                let q = &bank[index as usize % bank.len()];
                (q.prompt.clone(), q.options.clone(), q.answer.clone())
            }
            _ => {
                let (item, category) = *ITEMS.choose(&mut self.rng).unwrap_or(&ITEMS[0]);
                (
                    item.to_string(),
                    CATEGORIES.iter().map(|c| c.to_string()).collect(),
                    category.to_string(),
                )
            }
        };

        let prompt = json!({
            "instruction": "Arraste o item para a categoria certa",
            "item": item,
            "categories": options,
        });
        Trial::new(index, GameType::Classification, prompt, answer)
    }
}
