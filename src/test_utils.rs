// Test fixtures: small substitute vocabularies and award books, and quiet
// game settings, so engine tests do not depend on the shipped scenario.
use crate::awards::{AwardBook, AwardDefinition, AwardEngine};
use crate::config::GameConfig;
use crate::normalizer::CommandNormalizer;
use crate::scenario::Scenario;
use crate::vocabulary::{Vocabulary, VocabularyEntry};
use std::sync::Arc;

pub fn mini_vocabulary() -> Arc<Vocabulary> {
    let entries = vec![
        VocabularyEntry::new("eliminate-waste", "shit", &["poop", "crap", "dump"]),
        VocabularyEntry::new("open", "open", &["pull", "yank"]),
        VocabularyEntry::new("door", "door", &["stall"]),
        VocabularyEntry::new("flatulate", "fart", &["toot"]),
        VocabularyEntry::new("gently", "lightly", &["gently", "softly"]),
        VocabularyEntry::new("loudly", "loudly", &["loud"]),
    ];
    Arc::new(Vocabulary::new(entries, &["the", "a", "to"]).unwrap())
}

pub fn mini_normalizer() -> CommandNormalizer {
    CommandNormalizer::new(mini_vocabulary())
}

pub fn mini_book(definitions: Vec<AwardDefinition>) -> AwardBook {
    AwardBook::new(definitions, &mini_normalizer()).unwrap()
}

pub fn mini_engine(definitions: Vec<AwardDefinition>) -> AwardEngine {
    AwardEngine::new(Arc::new(mini_book(definitions)))
}

pub fn mini_scenario(definitions: Vec<AwardDefinition>) -> Scenario {
    Scenario::from_parts(mini_vocabulary(), definitions).unwrap()
}

/// Settings with no pauses so state-machine tests run instantly
pub fn quiet_config() -> GameConfig {
    GameConfig {
        intro_secs: 0,
        game_over_pause_millis: 0,
        notice_millis: 0,
        ..GameConfig::default()
    }
}
