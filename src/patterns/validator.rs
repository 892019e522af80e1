//! Checking model replies against response patterns.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{game_master_pattern, PlayerRole};
use crate::error::{LocaleError, PatternError};
use crate::locale::LocalePatterns;

/// How strictly replies are parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Reply must open with the tag and contain a single paragraph.
    #[default]
    Strict,
    /// Tag may appear anywhere; trailing text is ignored.
    Liberal,
}

impl std::str::FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ParseMode::Strict),
            "liberal" => Ok(ParseMode::Liberal),
            other => Err(format!("unknown parse mode '{}': expected strict or liberal", other)),
        }
    }
}

/// Outcome of checking one reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseCheck {
    /// The reply follows the protocol; `content` is what gets passed on.
    Parsed { content: String },
    /// The reply violates the protocol and the episode is aborted.
    Invalid { reason: String },
}

impl ResponseCheck {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ResponseCheck::Parsed { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            ResponseCheck::Parsed { content } => Some(content),
            ResponseCheck::Invalid { .. } => None,
        }
    }
}

/// Compiled, case-insensitive response pattern.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    regex: Regex,
    mode: ParseMode,
}

impl ResponseValidator {
    /// Compiles the game-master pattern of a role.
    pub fn for_role(
        patterns: &LocalePatterns,
        role: PlayerRole,
        mode: ParseMode,
    ) -> Result<Self, PatternError> {
        Self::from_pattern(&game_master_pattern(patterns, role, mode), mode)
    }

    /// Compiles an arbitrary pattern with `content` and `remainder` groups,
    /// such as the patterns stored in an instance file.
    pub fn from_pattern(pattern: &str, mode: ParseMode) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex, mode })
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Classifies a reply.
    ///
    /// In strict mode any text after the first paragraph invalidates the
    /// reply; in liberal mode it is dropped.
    pub fn check(&self, reply: &str) -> ResponseCheck {
        let Some(caps) = self.regex.captures(reply) else {
            debug!(mode = ?self.mode, "Reply does not match response pattern");
            return ResponseCheck::Invalid {
                reason: "reply does not match the response pattern".to_string(),
            };
        };

        let content = caps
            .name("content")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let remainder = caps.name("remainder").map(|m| m.as_str()).unwrap_or_default();

        if self.mode == ParseMode::Strict && !remainder.is_empty() {
            debug!(remainder_len = remainder.len(), "Reply has more than one paragraph");
            return ResponseCheck::Invalid {
                reason: "reply contains more than one paragraph".to_string(),
            };
        }

        ResponseCheck::Parsed { content }
    }
}

/// Accepted answers for a target slot: its localized name and its 1-based number.
pub fn target_aliases(
    patterns: &LocalePatterns,
    lang: &str,
    target_name: &str,
) -> Result<Vec<String>, LocaleError> {
    let names = patterns.position_names(lang)?;
    let index = names
        .iter()
        .position(|n| *n == target_name)
        .ok_or_else(|| LocaleError::UnknownTarget {
            lang: lang.to_string(),
            name: target_name.to_string(),
        })?;
    Ok(vec![target_name.to_string(), (index + 1).to_string()])
}

/// Whether a parsed player 2 answer names the target slot.
pub fn is_correct_answer(answer: &str, aliases: &[String]) -> bool {
    let answer = answer.trim().to_lowercase();
    aliases.iter().any(|a| a.to_lowercase() == answer)
}
