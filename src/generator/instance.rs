//! Output records of instance generation.
//!
//! The serialized field names are read by the game runner and must stay
//! stable across releases.

use serde::{Deserialize, Serialize};

use crate::triplet::SlotAssignment;

/// One playable episode: a triplet with the target in a fixed slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInstance {
    pub game_id: usize,
    pub player_1_prompt_header: String,
    pub player_1_target_grid: String,
    pub player_1_second_grid: String,
    pub player_1_third_grid: String,
    pub player_2_prompt_header: String,
    pub player_2_first_grid: String,
    pub player_2_second_grid: String,
    pub player_2_third_grid: String,
    pub target_grid_name: String,
    pub player_1_response_pattern: String,
    pub player_2_response_pattern: String,
    pub lang: String,
}

/// Rendered parts of an instance that do not come from the slot assignment.
#[derive(Debug, Clone)]
pub struct RenderedPrompts {
    pub player_1: String,
    pub player_2: String,
}

/// Response patterns shared by all instances of a language.
#[derive(Debug, Clone)]
pub struct ResponsePatterns {
    pub player_1: String,
    pub player_2: String,
}

impl GameInstance {
    pub fn from_assignment(
        game_id: usize,
        assignment: SlotAssignment,
        prompts: RenderedPrompts,
        patterns: &ResponsePatterns,
        lang: &str,
    ) -> Self {
        let [p1_target, p1_second, p1_third] = assignment.player_1.map(String::from);
        let [p2_first, p2_second, p2_third] = assignment.player_2.map(String::from);

        Self {
            game_id,
            player_1_prompt_header: prompts.player_1,
            player_1_target_grid: p1_target,
            player_1_second_grid: p1_second,
            player_1_third_grid: p1_third,
            player_2_prompt_header: prompts.player_2,
            player_2_first_grid: p2_first,
            player_2_second_grid: p2_second,
            player_2_third_grid: p2_third,
            target_grid_name: assignment.target_name,
            player_1_response_pattern: patterns.player_1.clone(),
            player_2_response_pattern: patterns.player_2.clone(),
            lang: lang.to_string(),
        }
    }

    /// Player 2's grids in slot order.
    pub fn player_2_grids(&self) -> [&str; 3] {
        [
            self.player_2_first_grid.as_str(),
            self.player_2_second_grid.as_str(),
            self.player_2_third_grid.as_str(),
        ]
    }
}

/// A named group of instances, one per grid group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub name: String,
    pub game_instances: Vec<GameInstance>,
}

impl Experiment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            game_instances: Vec::new(),
        }
    }
}

/// The full instance artifact of one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceFile {
    pub experiments: Vec<Experiment>,
}

impl InstanceFile {
    /// Total number of instances across experiments.
    pub fn instance_count(&self) -> usize {
        self.experiments.iter().map(|e| e.game_instances.len()).sum()
    }
}
