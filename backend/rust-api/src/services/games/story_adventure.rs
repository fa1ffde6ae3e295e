use serde_json::json;

use crate::models::GameType;

use super::{MiniGame, Trial};

struct Scene {
    text: &'static str,
    choices: [&'static str; 3],
    best: usize,
}

// Fixed scene table; the branching is cosmetic on the client, the scored
// decision is always "which choice solves this scene".
const SCENES: [Scene; 6] = [
    Scene {
        text: "Você encontra um rio largo no caminho da escola. O que faz?",
        choices: [
            "Atravessa pela ponte",
            "Tenta nadar",
            "Volta para casa",
        ],
        best: 0,
    },
    Scene {
        text: "Um colega esqueceu o lanche. O que você faz?",
        choices: [
            "Esconde o seu lanche",
            "Divide o seu lanche",
            "Não faz nada",
        ],
        best: 1,
    },
    Scene {
        text: "A floresta tem dois caminhos: um com placas e um escuro. Qual você escolhe?",
        choices: [
            "O caminho escuro",
            "Nenhum dos dois",
            "O caminho com placas",
        ],
        best: 2,
    },
    Scene {
        text: "Você achou uma carteira perdida no pátio. O que faz?",
        choices: [
            "Entrega para a professora",
            "Guarda para você",
            "Deixa no chão",
        ],
        best: 0,
    },
    Scene {
        text: "Começou a chover forte durante o passeio. O que faz?",
        choices: [
            "Continua andando na chuva",
            "Procura um abrigo seguro",
            "Corre sem olhar",
        ],
        best: 1,
    },
    Scene {
        text: "Seu time perdeu o jogo da escola. O que você faz?",
        choices: [
            "Briga com o juiz",
            "Vai embora bravo",
            "Cumprimenta o outro time",
        ],
        best: 2,
    },
];

/// Branching narrative with one large choice per screen. Built for motor
/// adaptations: no drag, no timers, targets as big as the client wants to
/// render them. The story has a fixed length, so the stopping rule is the
/// scene count rather than the default question total.
pub struct StoryAdventureGame;

impl StoryAdventureGame {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StoryAdventureGame {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniGame for StoryAdventureGame {
    fn game_type(&self) -> GameType {
        GameType::StoryAdventure
    }

    fn total_questions(&self) -> u32 {
        SCENES.len() as u32
    }

    fn next_trial(&mut self, index: u32) -> Trial {
        let scene = &SCENES[index as usize % SCENES.len()];
        let prompt = json!({
            "instruction": "Escolha o que fazer",
            "scene": scene.text,
            "choices": scene.choices,
            "chapter": index + 1,
            "chapters_total": SCENES.len(),
        });
        Trial::new(
            index,
            GameType::StoryAdventure,
            prompt,
            scene.choices[scene.best],
        )
    }
}
