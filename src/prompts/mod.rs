//! Prompt templates for the two players.
//!
//! Templates live under `<templates_dir>/<lang>/` as plain text files and
//! contain placeholder tokens that are replaced verbatim with grid strings:
//!
//! - `player_a_prompt_header.template` (player 1): `TARGET_GRID`, `SECOND_GRID`, `THIRD_GRID`
//! - `player_b_prompt_header.template` (player 2): `FIRST_GRID`, `SECOND_GRID`, `THIRD_GRID`
//!
//! Player 2's template also holds a `TARGET_EXPRESSION` token that the game
//! master fills at play time; it is left untouched here.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TemplateError;
use crate::grid::Grid;
use crate::locale::SLOT_COUNT;

/// File name of player 1's prompt template.
pub const PLAYER_A_TEMPLATE: &str = "player_a_prompt_header.template";

/// File name of player 2's prompt template.
pub const PLAYER_B_TEMPLATE: &str = "player_b_prompt_header.template";

/// Placeholders in player 1's template, in triplet order.
pub const PLAYER_A_PLACEHOLDERS: [&str; SLOT_COUNT] = ["TARGET_GRID", "SECOND_GRID", "THIRD_GRID"];

/// Placeholders in player 2's template, in slot order.
pub const PLAYER_B_PLACEHOLDERS: [&str; SLOT_COUNT] = ["FIRST_GRID", "SECOND_GRID", "THIRD_GRID"];

/// Both prompt templates of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    player_a: String,
    player_b: String,
}

impl PromptTemplates {
    /// Creates templates from strings, checking that every placeholder is present.
    pub fn new(player_a: impl Into<String>, player_b: impl Into<String>) -> Result<Self, TemplateError> {
        let templates = Self {
            player_a: player_a.into(),
            player_b: player_b.into(),
        };
        check_placeholders(&templates.player_a, PLAYER_A_TEMPLATE, &PLAYER_A_PLACEHOLDERS)?;
        check_placeholders(&templates.player_b, PLAYER_B_TEMPLATE, &PLAYER_B_PLACEHOLDERS)?;
        Ok(templates)
    }

    /// Loads the templates of `lang` from `<templates_dir>/<lang>/`.
    pub fn load<P: AsRef<Path>>(templates_dir: P, lang: &str) -> Result<Self, TemplateError> {
        let dir = templates_dir.as_ref().join(lang);
        let player_a = read_template(dir.join(PLAYER_A_TEMPLATE))?;
        let player_b = read_template(dir.join(PLAYER_B_TEMPLATE))?;

        debug!(lang, dir = %dir.display(), "Loaded prompt templates");
        Self::new(player_a, player_b).map_err(|e| match e {
            TemplateError::MissingPlaceholder { path, placeholder } => {
                TemplateError::MissingPlaceholder {
                    path: dir.join(path).display().to_string(),
                    placeholder,
                }
            }
            other => other,
        })
    }

    /// Renders player 1's prompt from (target, second, third).
    pub fn render_player_1(&self, grids: &[Grid; SLOT_COUNT]) -> String {
        render(&self.player_a, &PLAYER_A_PLACEHOLDERS, grids)
    }

    /// Renders player 2's prompt from the grids in slot order.
    pub fn render_player_2(&self, grids: &[Grid; SLOT_COUNT]) -> String {
        render(&self.player_b, &PLAYER_B_PLACEHOLDERS, grids)
    }
}

fn read_template(path: PathBuf) -> Result<String, TemplateError> {
    if !path.is_file() {
        return Err(TemplateError::NotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(&path)?)
}

fn check_placeholders(
    template: &str,
    name: &str,
    placeholders: &[&str; SLOT_COUNT],
) -> Result<(), TemplateError> {
    match placeholders.iter().find(|p| !template.contains(**p)) {
        Some(missing) => Err(TemplateError::MissingPlaceholder {
            path: name.to_string(),
            placeholder: missing.to_string(),
        }),
        None => Ok(()),
    }
}

fn render(template: &str, placeholders: &[&str; SLOT_COUNT], grids: &[Grid; SLOT_COUNT]) -> String {
    placeholders
        .iter()
        .zip(grids)
        .fold(template.to_string(), |acc, (placeholder, grid)| {
            acc.replace(*placeholder, grid.as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> PromptTemplates {
        PromptTemplates::new(
            "Target:\nTARGET_GRID\nDistractor 1:\nSECOND_GRID\nDistractor 2:\nTHIRD_GRID\n",
            "First:\nFIRST_GRID\nSecond:\nSECOND_GRID\nThird:\nTHIRD_GRID\nExpression: TARGET_EXPRESSION\n",
        )
        .expect("valid templates")
    }

    #[test]
    fn test_render_player_1() {
        let prompt = templates().render_player_1(&["T", "S", "R"].map(Grid::from));
        assert_eq!(prompt, "Target:\nT\nDistractor 1:\nS\nDistractor 2:\nR\n");
    }

    #[test]
    fn test_render_player_2_keeps_expression_token() {
        let prompt = templates().render_player_2(&["S", "T", "R"].map(Grid::from));
        assert!(prompt.starts_with("First:\nS\nSecond:\nT\nThird:\nR\n"));
        assert!(prompt.contains("TARGET_EXPRESSION"));
    }

    #[test]
    fn test_missing_placeholder() {
        let err = PromptTemplates::new("TARGET_GRID SECOND_GRID", "FIRST_GRID SECOND_GRID THIRD_GRID")
            .unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MissingPlaceholder { ref placeholder, .. } if placeholder == "THIRD_GRID"
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let lang_dir = dir.path().join("en");
        fs::create_dir_all(&lang_dir).expect("mkdir");
        fs::write(lang_dir.join(PLAYER_A_TEMPLATE), "TARGET_GRID|SECOND_GRID|THIRD_GRID").unwrap();
        fs::write(lang_dir.join(PLAYER_B_TEMPLATE), "FIRST_GRID|SECOND_GRID|THIRD_GRID").unwrap();

        let templates = PromptTemplates::load(dir.path(), "en").expect("should load");
        assert_eq!(templates.render_player_1(&["a", "b", "c"].map(Grid::from)), "a|b|c");

        assert!(matches!(
            PromptTemplates::load(dir.path(), "de"),
            Err(TemplateError::NotFound { .. })
        ));
    }
}
