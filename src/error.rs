//! Error types for refgame-forge operations.
//!
//! Defines error types for all major subsystems:
//! - Grid artifact loading
//! - Locale pattern table validation and lookup
//! - Response pattern compilation
//! - Prompt template loading
//! - Instance generation and distractor selection
//! - Instance file export

use thiserror::Error;

/// Errors that can occur while loading grid artifacts.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Failed to read grid file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed grid file '{path}': {message}")]
    Malformed { path: String, message: String },

    #[error("Grid file '{0}' contains no groups")]
    Empty(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while validating or querying the locale pattern table.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("Unknown language code '{0}'")]
    UnknownLanguage(String),

    #[error("Invalid p2_options '{options}' for language '{lang}': expected exactly 3 non-empty '|'-separated names, found {found}")]
    InvalidOptions {
        lang: String,
        options: String,
        found: usize,
    },

    #[error("Empty {field} for language '{lang}'")]
    EmptyTag { lang: String, field: &'static str },

    #[error("Locale table contains no languages")]
    EmptyTable,

    #[error("Unknown target name '{name}' for language '{lang}'")]
    UnknownTarget { lang: String, name: String },

    #[error("Failed to parse locale table '{path}': {message}")]
    ParseError { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while building or compiling response patterns.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Locale error: {0}")]
    Locale(#[from] LocaleError),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Errors that can occur while loading prompt templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Prompt template '{path}' not found")]
    NotFound { path: String },

    #[error("Prompt template '{path}' does not contain placeholder '{placeholder}'")]
    MissingPlaceholder { path: String, placeholder: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during instance generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Group '{group}' has {size} grids, at least 3 are required")]
    GroupTooSmall { group: String, size: usize },

    #[error("Target {target} has only {candidates} candidate distractors, 2 are required")]
    NotEnoughDistractors { target: usize, candidates: usize },

    #[error("Distractors {first} and {second} of target {target} are identical grids")]
    DuplicateDistractors {
        target: usize,
        first: usize,
        second: usize,
    },

    #[error("Group '{group}': {source}")]
    InGroup {
        group: String,
        #[source]
        source: Box<GeneratorError>,
    },

    #[error("Target index {target} out of range for a matrix of size {size}")]
    TargetOutOfRange { target: usize, size: usize },

    #[error("Locale error: {0}")]
    Locale(#[from] LocaleError),
}

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export for language '{0}'")]
    NoExperiments(String),

    #[error("Export path is not a directory: {0}")]
    NotADirectory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
