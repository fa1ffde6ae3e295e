use crate::models::{ActivityChoice, AdaptationCategory, GameType};

/// Resolves the mini-game assigned to an adaptation category.
///
/// Pure static lookup, one entry per category. Total over the closed enum,
/// so there is no failure mode and no fallback arm to maintain.
pub fn determine_optimal_activity(category: AdaptationCategory) -> ActivityChoice {
    let (game_type, rationale) = match category {
        AdaptationCategory::Tea => (
            GameType::SequenceMusical,
            "Predictable, repeatable musical sequences suit students on the \
             autism spectrum who respond well to routine and sound patterns",
        ),
        AdaptationCategory::Tdah => (
            GameType::SpeedMatching,
            "Short timed matching rounds keep attention engaged without long \
             stretches of sustained focus",
        ),
        AdaptationCategory::Down => (
            GameType::Memory,
            "Concrete visual pair matching with immediate feedback and no \
             time pressure",
        ),
        AdaptationCategory::Intellectual => (
            GameType::Classification,
            "Low-pressure sorting of familiar items into categories, one \
             decision at a time",
        ),
        AdaptationCategory::Visual => (
            GameType::AudioMemory,
            "Sound-sequence recall shifts the whole interaction to the \
             auditory channel",
        ),
        AdaptationCategory::Motor => (
            GameType::StoryAdventure,
            "Branching narrative with one large choice per screen, requiring \
             no precision input",
        ),
    };

    ActivityChoice {
        category,
        game_type,
        rationale: rationale.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_resolves_to_a_known_game() {
        for category in AdaptationCategory::ALL {
            let choice = determine_optimal_activity(category);
            assert_eq!(choice.category, category);
            assert!(GameType::ALL.contains(&choice.game_type));
            assert!(!choice.rationale.is_empty());
        }
    }

    #[test]
    fn tea_maps_to_sequence_musical() {
        let choice = determine_optimal_activity(AdaptationCategory::Tea);
        assert_eq!(choice.game_type, GameType::SequenceMusical);
    }
}
