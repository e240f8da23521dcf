//! The hard-coded scenario: you need the bathroom, badly, and the clock is
//! running.
//!
//! This module holds the word concepts, the award table, canned responses and
//! screen text. The engine modules take these as explicit configuration, so
//! tests can substitute their own tables.

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

use crate::awards::{AwardBook, AwardDefinition, AwardEngine};
use crate::error::ConfigError;
use crate::normalizer::CommandNormalizer;
use crate::vocabulary::{Vocabulary, VocabularyEntry};

pub const MAIN_MENU_ART: &str = "main.ans";
pub const PLAYING_ART: &str = "2.ans";
pub const GAME_OVER_ART: &str = "gameover.ans";

pub const PLAYING_INTRO: &str = "You need to take a shit. Bad.";
pub const HURRY_TEXT: &str = "Hurry! You need to find a way to reduce the pressure in your gut.";
pub const GAME_OVER_TEXT: &str = "Game Over! Time's up.";
pub const TIMES_UP_TEXT: &str = " TIME'S UP!";
pub const INVALID_CHOICE: &str = "Invalid choice, please try again.";
pub const PRESS_ANY_KEY: &str = "Press any key to return to the main menu.";
pub const GET_READY: &str = "GET READY...";

pub const MENU_HELP: &[&str] = &[
    "PLAY    start the clock",
    "AWARDS  see what you have earned",
    "QUIT    leave the door",
];

pub const PLAYING_HELP: &[&str] = &[
    "Type what you want to do, like OPEN DOOR.",
    "QUIT gives up and returns to the menu.",
];

const FILLER: &[&str] = &[
    "the", "a", "an", "to", "my", "your", "some", "into", "in", "on", "at", "then", "and",
];

fn concepts() -> Vec<VocabularyEntry> {
    vec![
        VocabularyEntry::new(
            "eliminate-waste",
            "shit",
            &["poop", "poo", "crap", "dump", "defecate", "deuce"],
        ),
        VocabularyEntry::new("flatulate", "fart", &["toot", "parp", "flatulate"]),
        VocabularyEntry::new(
            "lightly",
            "lightly",
            &["gently", "softly", "quietly", "carefully", "slightly"],
        ),
        VocabularyEntry::new("loudly", "loudly", &["loud", "hard", "forcefully"]),
        VocabularyEntry::new("open", "open", &["pull", "yank", "tug", "unlatch"]),
        VocabularyEntry::new("door", "door", &["stall", "hatch"]),
        VocabularyEntry::new(
            "remove",
            "remove",
            &["lower", "drop", "unzip", "unbutton", "shed"],
        ),
        VocabularyEntry::new(
            "pants",
            "pants",
            &["trousers", "jeans", "slacks", "shorts", "britches"],
        ),
        VocabularyEntry::new("go", "go", &["walk", "enter", "run", "head", "hurry"]),
        VocabularyEntry::new(
            "bathroom",
            "bathroom",
            &["toilet", "restroom", "loo", "lavatory", "washroom", "throne"],
        ),
        VocabularyEntry::new("sit", "sit", &["squat", "perch"]),
        VocabularyEntry::new("take", "take", &["swallow", "eat", "pop"]),
        VocabularyEntry::new("pill", "pill", &["laxative", "tablet", "medicine"]),
    ]
}

fn award_table() -> Vec<AwardDefinition> {
    vec![
        AwardDefinition::new(
            "award1",
            "Thinking (and shitting) inside the box",
            &["fart lightly", "pull door", "remove pants", "go to bathroom", "shit"],
        )
        .describe("Congratulations, all that potty training finally paid off.")
        .with_art("award3.ans"),
        AwardDefinition::new(
            "award2",
            "Better living through chemistry",
            &["take pill", "shit"],
        )
        .describe("Why wait when there's a pill for that?")
        .with_art("award2.ans")
        .requires(&["award3"]),
        AwardDefinition::new("award3", "Shitting 101", &["shit"])
            .describe("Sometimes even zero effort is rewarded.")
            .with_art("award3.ans"),
        AwardDefinition::new("award4", "Thunder from down under", &["fart loudly"])
            .describe("The whole building heard that one.")
            .with_art("award4.ans"),
        AwardDefinition::new("award8", "Shitting at the starting gun", &["shit"])
            .describe("You shit before the game began!")
            .with_art("award8.ans")
            .menu_only(),
    ]
}

lazy_static! {
    /// What the game says back when a concept is used while playing
    static ref RESPONSES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("fart", "You let a little pressure out.");
        m.insert("lightly", "Easy does it.");
        m.insert("loudly", "That was not subtle.");
        m.insert("open", "The stall door swings open.");
        m.insert("door", "The stall door is right there.");
        m.insert("remove", "Off they come.");
        m.insert("pants", "Your pants are getting in the way.");
        m.insert("go", "You shuffle closer.");
        m.insert("bathroom", "The bathroom beckons.");
        m.insert("sit", "You sit. It's a start.");
        m.insert("take", "Down the hatch.");
        m.insert("pill", "A lone laxative sits on the sink.");
        m.insert("shit", "Not yet, not here!");
        m
    };
}

const UNKNOWN_QUIPS: &[&str] = &[
    "I don't know how to {}.",
    "You can't {} right now.",
    "Trying to {} won't help your gut.",
];

/// Response to a recognised concept while playing
pub fn response_for(token: &str) -> Option<&'static str> {
    RESPONSES.get(token).copied()
}

/// Notice for a line the game did not understand
pub fn unknown_command<R: Rng + ?Sized>(rng: &mut R, line: &str) -> String {
    let quip = UNKNOWN_QUIPS.choose(rng).copied().unwrap_or("I don't know how to {}.");
    quip.replace("{}", line)
}

/// Screen rows derived from the caller's geometry (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub timer: (u16, u16),
    pub hurry_row: u16,
    pub response_row: u16,
    pub notice_row: u16,
    pub prompt_row: u16,
    pub prompt_col: u16,
}

impl Layout {
    pub fn for_rows(rows: u16) -> Self {
        let rows = rows.max(8);
        Layout {
            timer: (1, 1),
            hurry_row: rows - 4,
            response_row: rows - 3,
            notice_row: rows - 2,
            prompt_row: rows - 1,
            prompt_col: 4,
        }
    }
}

/// Vocabulary, normalizer and award engine for one run
pub struct Scenario {
    pub normalizer: CommandNormalizer,
    pub engine: AwardEngine,
}

impl Scenario {
    /// The shipped scenario
    pub fn load() -> Result<Self, ConfigError> {
        let vocabulary = Vocabulary::new(concepts(), FILLER)?;
        Self::from_parts(Arc::new(vocabulary), award_table())
    }

    /// A scenario built from substitute tables
    pub fn from_parts(
        vocabulary: Arc<Vocabulary>,
        awards: Vec<AwardDefinition>,
    ) -> Result<Self, ConfigError> {
        let normalizer = CommandNormalizer::new(vocabulary);
        let book = AwardBook::new(awards, &normalizer)?;
        Ok(Scenario {
            normalizer,
            engine: AwardEngine::new(Arc::new(book)),
        })
    }

    pub fn book(&self) -> &AwardBook {
        self.engine.book()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shipped_scenario_validates() {
        let scenario = Scenario::load().unwrap();
        assert_eq!(scenario.book().len(), 5);
        assert_eq!(
            scenario.book().display_name("award8"),
            "Shitting at the starting gun"
        );
    }

    #[test]
    fn box_award_conditions_resolve() {
        let scenario = Scenario::load().unwrap();
        let award = scenario.book().get("award1").unwrap();
        assert_eq!(award.phrases.len(), 5);
        // "go to bathroom" loses its filler word
        assert_eq!(award.phrases[3], vec!["go".to_string(), "bathroom".to_string()]);
    }

    #[test]
    fn every_concept_has_a_response() {
        let scenario = Scenario::load().unwrap();
        for entry in scenario.normalizer.vocabulary().entries() {
            assert!(
                response_for(&entry.canonical).is_some(),
                "no response for {}",
                entry.canonical
            );
        }
    }

    #[test]
    fn unknown_command_mentions_input() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert!(unknown_command(&mut rng, "dance").contains("dance"));
        }
    }

    #[test]
    fn layout_keeps_rows_apart() {
        let layout = Layout::for_rows(25);
        assert_eq!(layout.prompt_row, 24);
        assert_eq!(layout.hurry_row, 21);
        let tiny = Layout::for_rows(2);
        assert!(tiny.hurry_row >= 1);
    }
}
