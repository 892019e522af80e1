//! Locale pattern table.
//!
//! Each language defines the tag player 1 must start its referring
//! expression with, the tag player 2 must start its answer with, and the
//! three localized names of the grid slots (`p2_options`, `|`-separated).
//! The table is an explicit value handed to the generator; a built-in
//! default covers the languages of the multilingual benchmark release.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LocaleError;

/// Number of grid slots shown to player 2.
pub const SLOT_COUNT: usize = 3;

/// Response tags and slot names for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalePatterns {
    /// Tag opening player 1's referring expression.
    pub p1_tag: String,
    /// Tag opening player 2's answer.
    pub p2_tag: String,
    /// Three slot names separated by `|`, in slot order.
    pub p2_options: String,
}

impl LocalePatterns {
    pub fn new(
        p1_tag: impl Into<String>,
        p2_tag: impl Into<String>,
        p2_options: impl Into<String>,
    ) -> Self {
        Self {
            p1_tag: p1_tag.into(),
            p2_tag: p2_tag.into(),
            p2_options: p2_options.into(),
        }
    }

    /// Splits `p2_options` into the three slot names.
    ///
    /// Fails unless there are exactly three non-empty names.
    pub fn position_names(&self, lang: &str) -> Result<[&str; SLOT_COUNT], LocaleError> {
        let tokens: Vec<&str> = self.p2_options.split('|').collect();
        let invalid = || LocaleError::InvalidOptions {
            lang: lang.to_string(),
            options: self.p2_options.clone(),
            found: tokens.len(),
        };

        if tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(invalid());
        }
        match tokens.as_slice() {
            [first, second, third] => Ok([*first, *second, *third]),
            _ => Err(invalid()),
        }
    }

    fn validate(&self, lang: &str) -> Result<(), LocaleError> {
        if self.p1_tag.trim().is_empty() {
            return Err(LocaleError::EmptyTag {
                lang: lang.to_string(),
                field: "p1_tag",
            });
        }
        if self.p2_tag.trim().is_empty() {
            return Err(LocaleError::EmptyTag {
                lang: lang.to_string(),
                field: "p2_tag",
            });
        }
        self.position_names(lang).map(|_| ())
    }
}

/// Mapping from language code to its response patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalePatternTable {
    entries: BTreeMap<String, LocalePatterns>,
}

impl Default for LocalePatternTable {
    fn default() -> Self {
        let entries = [
            ("de", "ausdruck:", "antwort:", "erstes|zweites|drittes"),
            ("en", "expression:", "answer:", "first|second|third"),
            ("it", "espressione:", "risposta:", "primo|secondo|terzo"),
            ("ja", "表現：", "答：", "1番目|2番目|3番目"),
            ("pt", "expressão:", "resposta:", "primeiro|segundo|terceiro"),
            ("tk", "aňlatma:", "jogap:", "birinji|ikinji|üçünji"),
            ("tr", "ifade:", "cevap:", "birinci|ikinci|üçüncü"),
            ("zh", "表达式:", "回答:", "第一|第二|第三"),
        ]
        .into_iter()
        .map(|(lang, p1, p2, options)| (lang.to_string(), LocalePatterns::new(p1, p2, options)))
        .collect();

        Self { entries }
    }
}

impl LocalePatternTable {
    /// Builds a validated table from explicit entries.
    pub fn new<I, S>(entries: I) -> Result<Self, LocaleError>
    where
        I: IntoIterator<Item = (S, LocalePatterns)>,
        S: Into<String>,
    {
        let table = Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Loads a table from a YAML or JSON file (chosen by extension, YAML otherwise).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LocaleError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let table: Self = if is_json {
            serde_json::from_str(&content).map_err(|e| LocaleError::ParseError {
                path: path_str.clone(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| LocaleError::ParseError {
                path: path_str.clone(),
                message: e.to_string(),
            })?
        };

        table.validate()?;
        debug!(path = %path_str, languages = table.entries.len(), "Loaded locale table");
        Ok(table)
    }

    /// Checks every entry: non-empty tags and exactly three slot names.
    pub fn validate(&self) -> Result<(), LocaleError> {
        if self.entries.is_empty() {
            return Err(LocaleError::EmptyTable);
        }
        for (lang, patterns) in &self.entries {
            patterns.validate(lang)?;
        }
        Ok(())
    }

    /// Looks up a language; unknown codes are an error.
    pub fn get(&self, lang: &str) -> Result<&LocalePatterns, LocaleError> {
        self.entries
            .get(lang)
            .ok_or_else(|| LocaleError::UnknownLanguage(lang.to_string()))
    }

    /// Language codes in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, lang: &str) -> bool {
        self.entries.contains_key(lang)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
