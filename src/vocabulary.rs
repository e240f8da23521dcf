//! Vocabulary tables: word concepts and their surface synonyms
//!
//! Each concept has one canonical token and any number of synonyms. The
//! canonical token is itself a synonym, so "shit" resolves to "shit" just as
//! "poop" does. Filler words ("the", "to") are recognised but carry no
//! meaning; they are skipped when lines and award conditions are normalized.

use indexmap::IndexMap;
use log::debug;
use std::collections::{HashMap, HashSet};

use crate::error::ConfigError;

/// One word concept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    /// Human-readable concept name ("eliminate-waste")
    pub concept: String,
    /// The single token every synonym resolves to
    pub canonical: String,
    /// Surface words that mean this concept
    pub synonyms: Vec<String>,
}

impl VocabularyEntry {
    pub fn new(concept: &str, canonical: &str, synonyms: &[&str]) -> Self {
        VocabularyEntry {
            concept: concept.to_string(),
            canonical: canonical.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Validated vocabulary with a synonym lookup table
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Entries keyed by canonical token, in declaration order
    entries: IndexMap<String, VocabularyEntry>,
    /// Lower-cased surface word -> canonical token
    lookup: HashMap<String, String>,
    /// Words that are recognised but ignored
    filler: HashSet<String>,
}

impl Vocabulary {
    /// Build a vocabulary, rejecting duplicate canonicals and shared synonyms
    pub fn new(entries: Vec<VocabularyEntry>, filler: &[&str]) -> Result<Self, ConfigError> {
        let mut by_canonical: IndexMap<String, VocabularyEntry> = IndexMap::new();
        let mut lookup: HashMap<String, String> = HashMap::new();

        for entry in entries {
            let canonical = entry.canonical.trim().to_lowercase();
            if canonical.is_empty() {
                return Err(ConfigError::EmptyConcept(entry.concept.clone()));
            }
            if by_canonical.contains_key(&canonical) {
                return Err(ConfigError::DuplicateCanonical(canonical));
            }

            let words = std::iter::once(canonical.clone())
                .chain(entry.synonyms.iter().map(|s| s.trim().to_lowercase()))
                .filter(|w| !w.is_empty());
            for word in words {
                match lookup.get(&word) {
                    Some(owner) if *owner == canonical => {}
                    Some(owner) => {
                        return Err(ConfigError::SynonymConflict {
                            word,
                            first: owner.clone(),
                            second: canonical,
                        });
                    }
                    None => {
                        lookup.insert(word, canonical.clone());
                    }
                }
            }

            by_canonical.insert(canonical, entry);
        }

        let filler: HashSet<String> = filler.iter().map(|w| w.to_lowercase()).collect();
        if let Some(word) = filler.iter().find(|w| lookup.contains_key(*w)) {
            return Err(ConfigError::SynonymConflict {
                word: word.clone(),
                first: lookup[word].clone(),
                second: "filler".to_string(),
            });
        }

        debug!(
            "Vocabulary loaded: {} concepts, {} surface words, {} filler words",
            by_canonical.len(),
            lookup.len(),
            filler.len()
        );

        Ok(Vocabulary {
            entries: by_canonical,
            lookup,
            filler,
        })
    }

    /// Canonical token for a surface word (whole-word, case-insensitive)
    pub fn canonical_for(&self, word: &str) -> Option<&str> {
        if let Some(found) = self.lookup.get(word) {
            return Some(found.as_str());
        }
        self.lookup.get(&word.to_lowercase()).map(|s| s.as_str())
    }

    pub fn is_filler(&self, word: &str) -> bool {
        self.filler.contains(&word.to_lowercase())
    }

    pub fn entry(&self, canonical: &str) -> Option<&VocabularyEntry> {
        self.entries.get(canonical)
    }

    /// Entries in declaration order
    pub fn entries(&self) -> impl Iterator<Item = &VocabularyEntry> {
        self.entries.values()
    }

    /// Every surface word with the canonical token it resolves to
    pub fn surface_words(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lookup.iter().map(|(w, c)| (w.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<VocabularyEntry> {
        vec![
            VocabularyEntry::new("eliminate-waste", "shit", &["poop", "Dump"]),
            VocabularyEntry::new("open", "open", &["pull", "yank"]),
        ]
    }

    #[test]
    fn synonyms_resolve_to_canonical() {
        let vocab = Vocabulary::new(sample(), &["the"]).unwrap();
        assert_eq!(vocab.canonical_for("poop"), Some("shit"));
        assert_eq!(vocab.canonical_for("DUMP"), Some("shit"));
        assert_eq!(vocab.canonical_for("shit"), Some("shit"));
        assert_eq!(vocab.canonical_for("yank"), Some("open"));
        assert_eq!(vocab.canonical_for("door"), None);
        assert!(vocab.is_filler("The"));
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn rejects_duplicate_canonical() {
        let mut entries = sample();
        entries.push(VocabularyEntry::new("also-open", "open", &["unlatch"]));
        assert_eq!(
            Vocabulary::new(entries, &[]).unwrap_err(),
            ConfigError::DuplicateCanonical("open".to_string())
        );
    }

    #[test]
    fn rejects_synonym_in_two_concepts() {
        let mut entries = sample();
        entries.push(VocabularyEntry::new("drop", "drop", &["dump"]));
        match Vocabulary::new(entries, &[]) {
            Err(ConfigError::SynonymConflict { word, first, second }) => {
                assert_eq!(word, "dump");
                assert_eq!(first, "shit");
                assert_eq!(second, "drop");
            }
            other => panic!("expected synonym conflict, got {:?}", other),
        }
    }

    #[test]
    fn rejects_filler_that_is_vocabulary() {
        assert!(matches!(
            Vocabulary::new(sample(), &["pull"]),
            Err(ConfigError::SynonymConflict { .. })
        ));
    }

    #[test]
    fn repeated_synonym_in_same_concept_is_fine() {
        let entries = vec![VocabularyEntry::new("open", "open", &["open", "pull", "pull"])];
        assert!(Vocabulary::new(entries, &[]).is_ok());
    }
}
