//! Response patterns for the two player roles.
//!
//! Every generated instance carries one regex per role. A valid reply starts
//! with the language's tag and consists of a single paragraph: the first
//! paragraph is captured as `content`, anything after it as `remainder`. A
//! non-empty remainder is a protocol violation that aborts the episode.
//!
//! For player 2 the content is restricted to the three localized slot names.

pub mod scoring;
pub mod validator;

pub use scoring::{AnswerTurn, EpisodeScore, EpisodeScorer};
pub use validator::{is_correct_answer, target_aliases, ParseMode, ResponseCheck, ResponseValidator};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::locale::LocalePatterns;

/// The two roles of the reference game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    /// Describes the target grid.
    InstructionGiver,
    /// Picks the described grid among three.
    InstructionFollower,
}

impl PlayerRole {
    /// Response tag of this role in the given locale.
    pub fn tag(self, patterns: &LocalePatterns) -> &str {
        match self {
            PlayerRole::InstructionGiver => &patterns.p1_tag,
            PlayerRole::InstructionFollower => &patterns.p2_tag,
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerRole::InstructionGiver => write!(f, "p1"),
            PlayerRole::InstructionFollower => write!(f, "p2"),
        }
    }
}

impl FromStr for PlayerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "p1" | "1" | "player1" | "player_1" | "giver" => Ok(PlayerRole::InstructionGiver),
            "p2" | "2" | "player2" | "player_2" | "follower" => {
                Ok(PlayerRole::InstructionFollower)
            }
            other => Err(format!("unknown player role '{}': expected p1 or p2", other)),
        }
    }
}

/// Builds the instance-level response pattern for a role.
///
/// Player 1: `^<p1_tag>\s*(?P<content>.+)\n*(?P<remainder>.*)`.
/// Player 2: same shape with `content` limited to the slot names.
pub fn response_pattern(patterns: &LocalePatterns, role: PlayerRole) -> String {
    let tag = role.tag(patterns);
    let content = match role {
        PlayerRole::InstructionGiver => ".+",
        PlayerRole::InstructionFollower => patterns.p2_options.as_str(),
    };
    format!(r"^{}\s*(?P<content>{})\n*(?P<remainder>.*)", tag, content)
}

/// Builds the pattern the game master applies at play time.
///
/// Adds `tag` and `response` groups and lets `remainder` span lines. Player 2
/// may also answer with the slot number. In liberal mode the tag does not
/// have to open the reply.
pub fn game_master_pattern(patterns: &LocalePatterns, role: PlayerRole, mode: ParseMode) -> String {
    let tag = role.tag(patterns);
    let content = match role {
        PlayerRole::InstructionGiver => ".+".to_string(),
        PlayerRole::InstructionFollower => format!("{}|1|2|3", patterns.p2_options),
    };
    let anchor = match mode {
        ParseMode::Strict => "^",
        ParseMode::Liberal => "",
    };
    format!(
        r"{}(?P<tag>{})\s*(?P<response>(?P<content>{})\n*(?P<remainder>(.|\n)*))",
        anchor, tag, content
    )
}

/// Answer-only pattern for player 2: tag, then a slot name or number.
///
/// Nothing after the answer is inspected. Used when scoring replies that the
/// single-paragraph pattern rejected.
pub fn answer_fallback_pattern(patterns: &LocalePatterns) -> String {
    format!(
        r"^(?P<tag>{})\s*(?P<content>{}|1|2|3)",
        patterns.p2_tag, patterns.p2_options
    )
}
