//! refgame-forge: instance generator for the multilingual reference game.
//!
//! Selects similar distractor grids for every target grid, expands each
//! triplet into its three positional variants and emits per-language game
//! instances with prompts and response patterns.

// Core modules
pub mod cli;
pub mod config;
pub mod distance;
pub mod distractor;
pub mod error;
pub mod export;
pub mod generator;
pub mod grid;
pub mod locale;
pub mod patterns;
pub mod prompts;
pub mod triplet;

// Re-export commonly used error types
pub use error::{ExportError, GeneratorError, GridError, LocaleError, PatternError, TemplateError};
