//! Error types for the architectural linter.
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages. Grammar problems and
//! analysis problems are kept separate: the former abort before any file is
//! inspected, the latter abort the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, parsing, or validating the grammar document.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error(
        "Grammar file not found: expected 'nooa.grammar.yaml' or 'nooa.grammar.yml' under '{root}'"
    )]
    NotFound { root: PathBuf },

    #[error("Failed to read grammar file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not well-formed YAML.
    #[error("Grammar file '{path}' is not valid YAML: {reason}")]
    Unparseable { path: PathBuf, reason: String },

    /// Structural validation against the schema document failed. All
    /// problems found in the pass are listed, one per line.
    #[error("Grammar failed structural validation:\n{}", errors.join("\n"))]
    Schema { errors: Vec<String> },

    /// The document parsed but does not fit the expected rule shapes.
    #[error("Grammar has an unexpected shape: {reason}")]
    Shape { reason: String },

    #[error("Invalid regex '{pattern}' declared by {owner}: {reason}")]
    InvalidRegex {
        owner: String,
        pattern: String,
        reason: String,
    },

    #[error("Rule '{rule}' references undeclared role '{role}'")]
    UnknownRole { rule: String, role: String },

    #[error("Duplicate rule name '{name}'")]
    DuplicateRuleName { name: String },
}

/// Errors raised while running the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("Project root '{root}' does not exist or is not a directory")]
    InvalidRoot { root: PathBuf },

    #[error("Failed to read source file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to initialize the {language} parser: {reason}")]
    ParserInit { language: String, reason: String },
}

impl AnalyzeError {
    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Grammar(GrammarError::NotFound { .. }) => vec![
                "Run 'nooa init' to create a starter nooa.grammar.yaml",
                "Check that you are running nooa from the project root",
            ],
            Self::Grammar(GrammarError::Unparseable { .. } | GrammarError::Schema { .. }) => vec![
                "Fix the reported fields in nooa.grammar.yaml and re-run",
            ],
            Self::InvalidRoot { .. } => {
                vec!["Pass the path to the project directory, e.g. 'nooa check ./my-app'"]
            }
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is not locked by another process",
            ],
            _ => vec![],
        }
    }
}

/// Result type alias for grammar loading
pub type GrammarResult<T> = Result<T, GrammarError>;

/// Result type alias for analysis operations
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;
