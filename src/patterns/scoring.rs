//! Episode scoring.
//!
//! One episode is a single exchange: player 1 describes the target, then
//! player 2 names a slot. Player 2 is only asked when player 1's reply
//! parsed, so an episode is aborted at player 1 or at player 2, never both.

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use super::{answer_fallback_pattern, is_correct_answer, target_aliases, ResponseCheck};
use crate::error::PatternError;
use crate::locale::LocalePatterns;

/// Bench score of a won episode.
pub const SUCCESS_BENCH_SCORE: f64 = 100.0;

/// Player 2's turn: the raw reply and how it was classified.
#[derive(Debug, Clone, Copy)]
pub struct AnswerTurn<'a> {
    pub reply: &'a str,
    pub check: &'a ResponseCheck,
}

/// Scores of one episode.
///
/// `success`, `lose` and the expression metrics are `None` when they do not
/// apply; `bench_score` is NaN for aborted episodes and serializes as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeScore {
    pub aborted_at_player_1: bool,
    pub aborted_at_player_2: bool,
    pub request_count: usize,
    pub parsed_request_count: usize,
    pub violated_request_count: usize,
    pub request_success_ratio: f64,
    pub expression_length: Option<usize>,
    pub expression_tokens: Option<usize>,
    pub success: Option<bool>,
    pub lose: Option<bool>,
    pub bench_score: f64,
}

impl EpisodeScore {
    pub fn aborted(&self) -> bool {
        self.aborted_at_player_1 || self.aborted_at_player_2
    }

    fn new(requests: usize, parsed: usize) -> Self {
        let ratio = parsed as f64 / requests as f64;
        Self {
            aborted_at_player_1: false,
            aborted_at_player_2: false,
            request_count: requests,
            parsed_request_count: parsed,
            violated_request_count: requests - parsed,
            request_success_ratio: (ratio * 10_000.0).round() / 10_000.0,
            expression_length: None,
            expression_tokens: None,
            success: None,
            lose: None,
            bench_score: f64::NAN,
        }
    }
}

/// Scores episodes of one instance against its target slot.
#[derive(Debug, Clone)]
pub struct EpisodeScorer {
    aliases: Vec<String>,
    fallback: Regex,
}

impl EpisodeScorer {
    /// Prepares scoring for `target_name` in `lang`.
    pub fn new(patterns: &LocalePatterns, lang: &str, target_name: &str) -> Result<Self, PatternError> {
        let aliases = target_aliases(patterns, lang, target_name)?;
        let fallback = RegexBuilder::new(&answer_fallback_pattern(patterns))
            .case_insensitive(true)
            .build()?;
        Ok(Self { aliases, fallback })
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Scores an episode from player 1's checked reply and player 2's turn.
    ///
    /// A player 2 reply rejected by its pattern is parsed once more with the
    /// answer-only fallback pattern, which ignores anything after the answer.
    pub fn score(&self, expression: &ResponseCheck, answer: Option<AnswerTurn<'_>>) -> EpisodeScore {
        let Some(expression) = expression.content() else {
            debug!("Episode aborted at player 1");
            let mut score = EpisodeScore::new(1, 0);
            score.aborted_at_player_1 = true;
            return score;
        };

        let expression_length = Some(expression.chars().count());
        let expression_tokens = Some(expression.split(' ').count());

        let Some(answer) = answer.and_then(|turn| self.answer_content(turn)) else {
            debug!("Episode aborted at player 2");
            let mut score = EpisodeScore::new(2, 1);
            score.aborted_at_player_2 = true;
            score.expression_length = expression_length;
            score.expression_tokens = expression_tokens;
            return score;
        };

        let success = is_correct_answer(&answer, &self.aliases);
        debug!(answer = %answer, success, "Episode scored");

        let mut score = EpisodeScore::new(2, 2);
        score.expression_length = expression_length;
        score.expression_tokens = expression_tokens;
        score.success = Some(success);
        score.lose = Some(!success);
        score.bench_score = if success { SUCCESS_BENCH_SCORE } else { 0.0 };
        score
    }

    fn answer_content(&self, turn: AnswerTurn<'_>) -> Option<String> {
        if let Some(content) = turn.check.content() {
            return Some(content.to_string());
        }
        self.fallback
            .captures(turn.reply)
            .and_then(|caps| caps.name("content"))
            .map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocaleError;
    use crate::locale::LocalePatternTable;
    use crate::patterns::{ParseMode, PlayerRole, ResponseValidator};

    fn en() -> LocalePatterns {
        LocalePatternTable::default().get("en").unwrap().clone()
    }

    fn scorer(target: &str) -> EpisodeScorer {
        EpisodeScorer::new(&en(), "en", target).expect("scorer")
    }

    fn parsed(content: &str) -> ResponseCheck {
        ResponseCheck::Parsed {
            content: content.to_string(),
        }
    }

    fn invalid() -> ResponseCheck {
        ResponseCheck::Invalid {
            reason: "reply does not match the response pattern".to_string(),
        }
    }

    #[test]
    fn test_aborted_at_player_1() {
        let score = scorer("second").score(&invalid(), None);

        assert!(score.aborted_at_player_1);
        assert!(!score.aborted_at_player_2);
        assert!(score.aborted());
        assert_eq!(score.request_count, 1);
        assert_eq!(score.parsed_request_count, 0);
        assert_eq!(score.violated_request_count, 1);
        assert_eq!(score.request_success_ratio, 0.0);
        assert_eq!(score.expression_length, None);
        assert_eq!(score.success, None);
        assert_eq!(score.lose, None);
        assert!(score.bench_score.is_nan());
    }

    #[test]
    fn test_aborted_at_player_2() {
        let answer = invalid();
        let turn = AnswerTurn {
            reply: "I think it is the middle one",
            check: &answer,
        };
        let score = scorer("second").score(&parsed("a cross in the middle"), Some(turn));

        assert!(!score.aborted_at_player_1);
        assert!(score.aborted_at_player_2);
        assert_eq!(score.request_count, 2);
        assert_eq!(score.violated_request_count, 1);
        assert_eq!(score.request_success_ratio, 0.5);
        assert_eq!(score.expression_length, Some(21));
        assert_eq!(score.expression_tokens, Some(5));
        assert_eq!(score.success, None);
        assert!(score.bench_score.is_nan());
    }

    #[test]
    fn test_success() {
        let answer = parsed("Second");
        let turn = AnswerTurn {
            reply: "answer: Second",
            check: &answer,
        };
        let score = scorer("second").score(&parsed("top row"), Some(turn));

        assert!(!score.aborted());
        assert_eq!(score.parsed_request_count, 2);
        assert_eq!(score.request_success_ratio, 1.0);
        assert_eq!(score.success, Some(true));
        assert_eq!(score.lose, Some(false));
        assert_eq!(score.bench_score, 100.0);
    }

    #[test]
    fn test_wrong_answer_loses() {
        let answer = parsed("3");
        let turn = AnswerTurn {
            reply: "answer: 3",
            check: &answer,
        };
        let score = scorer("first").score(&parsed("top row"), Some(turn));

        assert!(!score.aborted());
        assert_eq!(score.success, Some(false));
        assert_eq!(score.lose, Some(true));
        assert_eq!(score.bench_score, 0.0);
    }

    #[test]
    fn test_fallback_accepts_trailing_text() {
        let validator =
            ResponseValidator::for_role(&en(), PlayerRole::InstructionFollower, ParseMode::Strict)
                .unwrap();
        let reply = "Answer: 2nd grid.\nIt has the cross.";
        let answer = validator.check(reply);
        assert!(!answer.is_parsed());

        let turn = AnswerTurn {
            reply,
            check: &answer,
        };
        let score = scorer("second").score(&parsed("a cross"), Some(turn));
        assert_eq!(score.success, Some(true));
        assert_eq!(score.parsed_request_count, 2);
    }

    #[test]
    fn test_unknown_target() {
        assert!(matches!(
            EpisodeScorer::new(&en(), "en", "fourth"),
            Err(PatternError::Locale(LocaleError::UnknownTarget { .. }))
        ));
    }
}
