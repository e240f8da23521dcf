//! Award engine
//!
//! Awards are unlocked by saying the right things. Each award lists condition
//! phrases; a phrase is satisfied once every canonical token it names has
//! appeared somewhere in the input ledger since the ledger was last cleared.
//! Order between phrases and within a phrase does not matter.
//!
//! The award table is validated once at startup: ids are unique, every
//! condition word resolves through the vocabulary, every prerequisite names a
//! declared award, and prerequisites contain no cycles.

use indexmap::IndexMap;
use log::{debug, info};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::error::ConfigError;
use crate::normalizer::{CommandNormalizer, WordClass};

/// Display name returned for ids that are not in the award table
pub const UNKNOWN_AWARD: &str = "Unknown Award";

/// Static award definition, as written in the scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Art file shown on the award screen
    pub art: Option<String>,
    /// Condition phrases, each a whitespace-separated list of words
    pub conditions: Vec<String>,
    /// Only obtainable from the main menu (otherwise only while playing)
    pub menu_only: bool,
    /// Awards that must already be granted
    pub prerequisites: Vec<String>,
}

impl AwardDefinition {
    pub fn new(id: &str, name: &str, conditions: &[&str]) -> Self {
        AwardDefinition {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            art: None,
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
            menu_only: false,
            prerequisites: Vec::new(),
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_art(mut self, art: &str) -> Self {
        self.art = Some(art.to_string());
        self
    }

    pub fn menu_only(mut self) -> Self {
        self.menu_only = true;
        self
    }

    pub fn requires(mut self, prerequisites: &[&str]) -> Self {
        self.prerequisites = prerequisites.iter().map(|p| p.to_string()).collect();
        self
    }
}

/// An award with its condition phrases resolved to canonical tokens
#[derive(Debug, Clone)]
pub struct CompiledAward {
    pub definition: AwardDefinition,
    pub phrases: Vec<Vec<String>>,
}

impl CompiledAward {
    /// Every phrase has all its tokens somewhere in the ledger
    pub fn is_satisfied_by(&self, ledger: &InputLedger) -> bool {
        self.phrases
            .iter()
            .all(|phrase| phrase.iter().all(|token| ledger.contains(token)))
    }
}

/// Validated, ordered award table
#[derive(Debug, Clone)]
pub struct AwardBook {
    awards: IndexMap<String, CompiledAward>,
}

impl AwardBook {
    pub fn new(
        definitions: Vec<AwardDefinition>,
        normalizer: &CommandNormalizer,
    ) -> Result<Self, ConfigError> {
        let mut awards: IndexMap<String, CompiledAward> = IndexMap::new();

        for definition in definitions {
            if awards.contains_key(&definition.id) {
                return Err(ConfigError::DuplicateAward(definition.id));
            }
            let phrases = compile_conditions(&definition, normalizer)?;
            awards.insert(
                definition.id.clone(),
                CompiledAward {
                    definition,
                    phrases,
                },
            );
        }

        for award in awards.values() {
            for prerequisite in &award.definition.prerequisites {
                if !awards.contains_key(prerequisite) {
                    return Err(ConfigError::UnknownPrerequisite {
                        award: award.definition.id.clone(),
                        missing: prerequisite.clone(),
                    });
                }
            }
        }

        let book = AwardBook { awards };
        book.check_prerequisite_cycles()?;
        debug!("Award book loaded with {} awards", book.awards.len());
        Ok(book)
    }

    /// Depth-first search with an explicit path; a back edge is a cycle
    fn check_prerequisite_cycles(&self) -> Result<(), ConfigError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        fn visit(
            book: &AwardBook,
            index: usize,
            marks: &mut [Mark],
            path: &mut Vec<String>,
        ) -> Result<(), ConfigError> {
            let (id, award) = match book.awards.get_index(index) {
                Some(entry) => entry,
                None => return Ok(()),
            };
            match marks[index] {
                Mark::Done => return Ok(()),
                Mark::InProgress => {
                    let start = path.iter().position(|p| p == id).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(id.clone());
                    return Err(ConfigError::PrerequisiteCycle(cycle));
                }
                Mark::Unvisited => {}
            }

            marks[index] = Mark::InProgress;
            path.push(id.clone());
            for prerequisite in &award.definition.prerequisites {
                if let Some(next) = book.awards.get_index_of(prerequisite) {
                    visit(book, next, marks, path)?;
                }
            }
            path.pop();
            marks[index] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.awards.len()];
        let mut path = Vec::new();
        for index in 0..self.awards.len() {
            visit(self, index, &mut marks, &mut path)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&CompiledAward> {
        self.awards.get(id)
    }

    /// Awards in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &CompiledAward> {
        self.awards.values()
    }

    pub fn len(&self) -> usize {
        self.awards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.awards.is_empty()
    }

    /// Stored display name, or `UNKNOWN_AWARD`
    pub fn display_name(&self, id: &str) -> &str {
        self.awards
            .get(id)
            .map(|a| a.definition.name.as_str())
            .unwrap_or(UNKNOWN_AWARD)
    }
}

fn compile_conditions(
    definition: &AwardDefinition,
    normalizer: &CommandNormalizer,
) -> Result<Vec<Vec<String>>, ConfigError> {
    let mut phrases = Vec::with_capacity(definition.conditions.len());
    for condition in &definition.conditions {
        let mut tokens = Vec::new();
        for word in condition.split_whitespace() {
            match normalizer.classify(word) {
                WordClass::Token(token) => tokens.push(token.to_string()),
                WordClass::Filler => {}
                WordClass::Unknown => {
                    return Err(ConfigError::UnknownConditionWord {
                        award: definition.id.clone(),
                        word: word.to_string(),
                    });
                }
            }
        }
        if !tokens.is_empty() {
            phrases.push(tokens);
        }
    }
    if phrases.is_empty() {
        return Err(ConfigError::NoConditions(definition.id.clone()));
    }
    Ok(phrases)
}

/// One ledger entry: a canonical token and when it was appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub token: String,
    pub seq: u64,
}

/// Ordered, append-only record of canonical tokens since the last clear
#[derive(Debug, Clone, Default)]
pub struct InputLedger {
    entries: Vec<LedgerEntry>,
    next_seq: u64,
}

impl InputLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, token: impl Into<String>) {
        let entry = LedgerEntry {
            token: token.into(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            debug!("Ledger cleared ({} entries)", self.entries.len());
        }
        self.entries.clear();
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.token.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ids of awards already granted this session
#[derive(Debug, Clone, Default)]
pub struct AwardRecord {
    granted: HashSet<String>,
}

impl AwardRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the award was already granted
    pub fn grant(&mut self, id: &str) -> bool {
        self.granted.insert(id.to_string())
    }

    pub fn has(&self, id: &str) -> bool {
        self.granted.contains(id)
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

/// Where the player is when the ledger changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardContext {
    Menu,
    Gameplay,
}

/// A granted award, ready to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub id: String,
    pub name: String,
    pub description: String,
    pub art: Option<String>,
}

pub struct AwardEngine {
    book: Arc<AwardBook>,
    /// Serializes grant passes; at most one grant is processed at a time
    grant_guard: Mutex<()>,
}

impl AwardEngine {
    pub fn new(book: Arc<AwardBook>) -> Self {
        AwardEngine {
            book,
            grant_guard: Mutex::new(()),
        }
    }

    pub fn book(&self) -> &AwardBook {
        &self.book
    }

    pub fn display_name(&self, id: &str) -> &str {
        self.book.display_name(id)
    }

    /// Not yet granted, right context, all prerequisites held
    pub fn is_eligible(
        &self,
        award: &CompiledAward,
        record: &AwardRecord,
        context: AwardContext,
    ) -> bool {
        let def = &award.definition;
        if record.has(&def.id) {
            return false;
        }
        let wanted = if def.menu_only {
            AwardContext::Menu
        } else {
            AwardContext::Gameplay
        };
        if wanted != context {
            return false;
        }
        def.prerequisites.iter().all(|p| record.has(p))
    }

    /// Grant the first eligible, satisfied award in declaration order.
    ///
    /// A grant marks the record and clears the ledger. At most one award is
    /// granted per call; awards that were also satisfied have to be earned
    /// again from a fresh ledger.
    pub fn evaluate(
        &self,
        ledger: &mut InputLedger,
        record: &mut AwardRecord,
        context: AwardContext,
    ) -> Option<Grant> {
        let _guard = self
            .grant_guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let award = self
            .book
            .iter()
            .filter(|a| self.is_eligible(a, record, context))
            .find(|a| a.is_satisfied_by(ledger))?;

        let def = &award.definition;
        record.grant(&def.id);
        ledger.clear();
        info!("Award granted: {} ({})", def.name, def.id);

        Some(Grant {
            id: def.id.clone(),
            name: def.name.clone(),
            description: def.description.clone(),
            art: def.art.clone(),
        })
    }
}
