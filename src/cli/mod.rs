//! Command-line interface for refgame-forge.
//!
//! Provides commands for instance generation, distractor inspection,
//! reply checking, episode scoring and locale listing.

mod commands;

pub use commands::{
    check_reply, generate_all, inspect_group, parse_cli, run, run_with_cli, score_episode,
    CheckArgs, Cli, Commands, GenerationSummary, GroupReport, ScoreArgs,
};
