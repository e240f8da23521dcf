//! Error types for the door game
//!
//! `DoorError` is what startup and the session loop propagate to `main`.
//! `ConfigError` covers the static vocabulary and award tables, which are
//! validated once before any session starts.

use std::path::PathBuf;

use thiserror::Error;

use crate::terminal_trait::TerminalError;

/// Problems found while validating the vocabulary or award tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("canonical token '{0}' is declared by more than one concept")]
    DuplicateCanonical(String),

    #[error("synonym '{word}' belongs to both '{first}' and '{second}'")]
    SynonymConflict {
        word: String,
        first: String,
        second: String,
    },

    #[error("concept '{0}' has no synonyms")]
    EmptyConcept(String),

    #[error("award id '{0}' is declared twice")]
    DuplicateAward(String),

    #[error("award '{award}' requires unknown award '{missing}'")]
    UnknownPrerequisite { award: String, missing: String },

    #[error("award prerequisites form a cycle: {}", .0.join(" -> "))]
    PrerequisiteCycle(Vec<String>),

    #[error("award '{award}' has condition word '{word}' that is not in the vocabulary")]
    UnknownConditionWord { award: String, word: String },

    #[error("award '{0}' has no conditions")]
    NoConditions(String),

    #[error("invalid game setting: {0}")]
    InvalidSetting(String),
}

/// Top-level error for startup and the session loop
#[derive(Debug, Error)]
pub enum DoorError {
    #[error("missing required --path argument")]
    MissingDropPath,

    #[error("bad drop file {}: {reason}", path.display())]
    DropFile { path: PathBuf, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read config file {}: {reason}", path.display())]
    ConfigFile { path: PathBuf, reason: String },

    #[error(transparent)]
    Terminal(#[from] TerminalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl DoorError {
    /// Process exit code used when this error aborts the program
    pub fn exit_code(&self) -> i32 {
        match self {
            DoorError::MissingDropPath => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_exits_with_two() {
        assert_eq!(DoorError::MissingDropPath.exit_code(), 2);
        assert_eq!(
            DoorError::Terminal(TerminalError::new("no tty")).exit_code(),
            1
        );
    }

    #[test]
    fn cycle_message_lists_path() {
        let err = ConfigError::PrerequisiteCycle(vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "award prerequisites form a cycle: a -> b -> a"
        );
    }
}
