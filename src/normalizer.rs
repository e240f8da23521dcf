//! Command normalizer
//!
//! Turns a player's line into canonical tokens. Matching is whole-word
//! equality against the vocabulary; a word that merely contains a keyword
//! ("shitake") does not match it.

use log::debug;
use std::sync::Arc;

use crate::vocabulary::Vocabulary;

/// Lower-case, strip everything but letters, digits and spaces, and collapse
/// runs of whitespace. Mode handlers only ever see lines in this form.
pub fn sanitize_line(raw: &str) -> String {
    let kept: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone)]
pub struct CommandNormalizer {
    vocabulary: Arc<Vocabulary>,
}

/// Result of resolving one word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass<'a> {
    Token(&'a str),
    Filler,
    Unknown,
}

impl CommandNormalizer {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        CommandNormalizer { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn classify<'a>(&'a self, word: &str) -> WordClass<'a> {
        if let Some(token) = self.vocabulary.canonical_for(word) {
            WordClass::Token(token)
        } else if self.vocabulary.is_filler(word) {
            WordClass::Filler
        } else {
            WordClass::Unknown
        }
    }

    /// Canonical tokens for every vocabulary word in `line`, in input order.
    /// A line with no vocabulary words yields an empty list.
    pub fn normalize(&self, line: &str) -> Vec<String> {
        let tokens: Vec<String> = line
            .split_whitespace()
            .filter_map(|word| match self.classify(word) {
                WordClass::Token(token) => Some(token.to_string()),
                _ => None,
            })
            .collect();
        debug!("Normalized '{}' -> {:?}", line, tokens);
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::VocabularyEntry;

    fn normalizer() -> CommandNormalizer {
        let vocab = Vocabulary::new(
            vec![
                VocabularyEntry::new("eliminate-waste", "shit", &["poop", "crap"]),
                VocabularyEntry::new("open", "open", &["pull"]),
                VocabularyEntry::new("door", "door", &[]),
            ],
            &["the", "to"],
        )
        .unwrap();
        CommandNormalizer::new(Arc::new(vocab))
    }

    #[test]
    fn sanitize_strips_punctuation_and_case() {
        assert_eq!(sanitize_line("  Pull the DOOR!!  "), "pull the door");
        assert_eq!(sanitize_line("go\tto   bath-room"), "go to bathroom");
        assert_eq!(sanitize_line("\x1b[A\x08"), "a");
        assert_eq!(sanitize_line("???"), "");
    }

    #[test]
    fn normalize_maps_synonyms_in_order() {
        let n = normalizer();
        assert_eq!(n.normalize("pull the door"), vec!["open", "door"]);
        assert_eq!(n.normalize("crap"), vec!["shit"]);
        assert_eq!(n.normalize("POOP"), vec!["shit"]);
    }

    #[test]
    fn substrings_do_not_match() {
        let n = normalizer();
        assert!(n.normalize("shitake doorway pulley").is_empty());
    }

    #[test]
    fn unknown_and_filler_words_emit_nothing() {
        let n = normalizer();
        assert!(n.normalize("dance to the music").is_empty());
        assert_eq!(n.classify("the"), WordClass::Filler);
        assert_eq!(n.classify("music"), WordClass::Unknown);
        assert_eq!(n.classify("pull"), WordClass::Token("open"));
    }
}
