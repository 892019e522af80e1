//! Generation configuration.
//!
//! Paths, version label and language selection for an instance generation
//! run. Values come from a YAML file, from CLI flags, or both (flags win).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::LocaleError;
use crate::export::DEFAULT_VERSION;
use crate::locale::LocalePatternTable;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// A field has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Locale table problem (loading or unknown requested language).
    #[error("Locale error: {0}")]
    Locale(#[from] LocaleError),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for one instance generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Grid artifact (group name -> list of grids).
    pub grids_path: PathBuf,
    /// Directory with one sub-directory of prompt templates per language.
    pub templates_dir: PathBuf,
    /// Directory receiving the instance files.
    pub output_dir: PathBuf,
    /// Version label used in output file names.
    pub version: String,
    /// Languages to generate; empty means every language of the locale table.
    pub languages: Vec<String>,
    /// Locale table file replacing the built-in table.
    pub locale_table: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grids_path: PathBuf::from("resources/grids_v1.5.json"),
            templates_dir: PathBuf::from("resources/initial_prompts"),
            output_dir: PathBuf::from("in"),
            version: DEFAULT_VERSION.to_string(),
            languages: Vec::new(),
            locale_table: None,
        }
    }
}

impl GenerationConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a YAML file. Missing fields take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "version".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self
            .version
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace())
        {
            return Err(ConfigError::InvalidValue {
                key: "version".to_string(),
                message: format!("'{}' is not usable in a file name", self.version),
            });
        }
        if let Some(lang) = self.languages.iter().find(|l| l.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "languages".to_string(),
                message: format!("empty language code '{}'", lang),
            });
        }
        Ok(())
    }

    /// Loads the configured locale table, or the built-in one.
    pub fn load_locale_table(&self) -> Result<LocalePatternTable, ConfigError> {
        match &self.locale_table {
            Some(path) => Ok(LocalePatternTable::load(path)?),
            None => Ok(LocalePatternTable::default()),
        }
    }

    /// Languages to generate, checked against the table.
    pub fn resolve_languages(&self, table: &LocalePatternTable) -> Result<Vec<String>, ConfigError> {
        if self.languages.is_empty() {
            return Ok(table.languages().map(str::to_string).collect());
        }
        for lang in &self.languages {
            table.get(lang)?;
        }
        Ok(self.languages.clone())
    }
}

/// Parses a comma-separated language list.
///
/// An explicit list must name at least one language; "all languages" is
/// expressed by leaving the list out.
pub fn parse_language_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let languages: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if languages.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "languages".to_string(),
            message: format!("'{}' names no language", raw),
        });
    }
    Ok(languages)
}
