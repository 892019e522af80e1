//! Instance generation for the reference game.
//!
//! The generator walks every grid group, treats each grid once as the target,
//! picks its two nearest grids as distractors and expands the resulting
//! triplet into three positional variants:
//!
//! 1. **Distance matrix** - pairwise edit distances, built once per group
//! 2. **Distractor selection** - two nearest neighbours per target
//! 3. **Positional expansion** - target placed in each of the three slots
//! 4. **Rendering** - prompts and response patterns for the language
//!
//! # Example
//!
//! ```no_run
//! use refgame_forge::generator::InstanceGenerator;
//! use refgame_forge::grid::GridCollection;
//! use refgame_forge::locale::LocalePatternTable;
//! use refgame_forge::prompts::PromptTemplates;
//!
//! let grids = GridCollection::load("resources/grids_v1.5.json")?;
//! let templates = PromptTemplates::load("resources/initial_prompts", "en")?;
//! let generator = InstanceGenerator::new(LocalePatternTable::default());
//! let instances = generator.generate(&grids, "en", &templates)?;
//! println!("{} instances", instances.instance_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod instance;

pub use instance::{Experiment, GameInstance, InstanceFile, RenderedPrompts, ResponsePatterns};

use tracing::{debug, info};

use crate::distance::DistanceMatrix;
use crate::distractor::select_distractors;
use crate::error::GeneratorError;
use crate::grid::{GridCollection, GridGroup};
use crate::locale::{LocalePatternTable, SLOT_COUNT};
use crate::patterns::{response_pattern, PlayerRole};
use crate::prompts::PromptTemplates;
use crate::triplet::{assign_positions, Triplet};

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Minimum group size for distractor selection.
pub const MIN_GROUP_SIZE: usize = SLOT_COUNT;

/// Builds one triplet per grid of the group, in grid order.
pub fn generate_triplets(group: &GridGroup) -> Result<Vec<Triplet>> {
    if group.len() < MIN_GROUP_SIZE {
        return Err(GeneratorError::GroupTooSmall {
            group: group.name.clone(),
            size: group.len(),
        });
    }

    let matrix = DistanceMatrix::build(&group.grids);

    (0..group.len())
        .map(|target| {
            let pair = select_distractors(&matrix, target).map_err(|e| GeneratorError::InGroup {
                group: group.name.clone(),
                source: Box::new(e),
            })?;
            Ok(Triplet::new(
                group.grids[target].clone(),
                group.grids[pair.first].clone(),
                group.grids[pair.second].clone(),
            ))
        })
        .collect()
}

/// Generates game instances for one language at a time.
///
/// Holds the locale table explicitly; generating different languages shares
/// no state, so one generator can be used from several threads.
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    locales: LocalePatternTable,
}

impl InstanceGenerator {
    pub fn new(locales: LocalePatternTable) -> Self {
        Self { locales }
    }

    pub fn locales(&self) -> &LocalePatternTable {
        &self.locales
    }

    /// Generates the instance file of `lang` for every group of `grids`.
    ///
    /// Fails on the first invalid group; nothing is returned partially.
    pub fn generate(
        &self,
        grids: &GridCollection,
        lang: &str,
        templates: &PromptTemplates,
    ) -> Result<InstanceFile> {
        let patterns = self.locales.get(lang)?;
        let names = patterns.position_names(lang)?;
        let response_patterns = ResponsePatterns {
            player_1: response_pattern(patterns, PlayerRole::InstructionGiver),
            player_2: response_pattern(patterns, PlayerRole::InstructionFollower),
        };

        let mut file = InstanceFile::default();
        for group in grids.groups() {
            let triplets = generate_triplets(group)?;
            let mut experiment = Experiment::new(group.name.clone());

            let mut game_counter = 0;
            for triplet in &triplets {
                for assignment in assign_positions(triplet, names) {
                    let prompts = RenderedPrompts {
                        player_1: templates.render_player_1(&assignment.player_1),
                        player_2: templates.render_player_2(&assignment.player_2),
                    };
                    experiment.game_instances.push(GameInstance::from_assignment(
                        game_counter,
                        assignment,
                        prompts,
                        &response_patterns,
                        lang,
                    ));
                    game_counter += 1;
                }
            }

            debug!(
                lang,
                experiment = %experiment.name,
                triplets = triplets.len(),
                instances = experiment.game_instances.len(),
                "Generated experiment"
            );
            file.experiments.push(experiment);
        }

        info!(
            lang,
            experiments = file.experiments.len(),
            instances = file.instance_count(),
            "Generated instances"
        );
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocaleError;
    use crate::grid::Grid;
    use crate::locale::LocalePatterns;

    fn templates() -> PromptTemplates {
        PromptTemplates::new(
            "A:TARGET_GRID/SECOND_GRID/THIRD_GRID",
            "B:FIRST_GRID/SECOND_GRID/THIRD_GRID",
        )
        .unwrap()
    }

    fn collection() -> GridCollection {
        GridCollection::new(vec![
            GridGroup::new("digits", ["00", "01", "11"]),
            GridGroup::new("letters", ["aaa", "aab", "abb", "bbb"]),
        ])
    }

    #[test]
    fn test_generate_triplets_scenario() {
        let triplets = generate_triplets(&GridGroup::new("g", ["00", "01", "11"])).unwrap();
        assert_eq!(triplets.len(), 3);
        assert_eq!(
            triplets[0],
            Triplet::new(Grid::from("00"), Grid::from("01"), Grid::from("11"))
        );
        // Target "01": both neighbours at distance 1, lowest index first
        assert_eq!(
            triplets[1],
            Triplet::new(Grid::from("01"), Grid::from("00"), Grid::from("11"))
        );
    }

    #[test]
    fn test_generate_triplets_rejects_small_group() {
        let err = generate_triplets(&GridGroup::new("tiny", ["00", "01"])).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::GroupTooSmall { ref group, size: 2 } if group == "tiny"
        ));
    }

    #[test]
    fn test_generate_triplets_reports_group_on_duplicates() {
        let err = generate_triplets(&GridGroup::new("dups", ["00", "00", "00"])).unwrap_err();
        assert!(err.to_string().contains("dups"));
    }

    #[test]
    fn test_generate_triplets_rejects_identical_distractors() {
        let err = generate_triplets(&GridGroup::new("g", ["00", "01", "01", "11", "10"]))
            .unwrap_err();
        match err {
            GeneratorError::InGroup { group, source } => {
                assert_eq!(group, "g");
                assert!(matches!(
                    *source,
                    GeneratorError::DuplicateDistractors { target: 0, .. }
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_generate_counts_and_ids() {
        let generator = InstanceGenerator::new(LocalePatternTable::default());
        let file = generator.generate(&collection(), "en", &templates()).unwrap();

        assert_eq!(file.experiments.len(), 2);
        assert_eq!(file.experiments[0].name, "digits");
        assert_eq!(file.experiments[0].game_instances.len(), 9);
        assert_eq!(file.experiments[1].game_instances.len(), 12);
        assert_eq!(file.instance_count(), 21);

        for experiment in &file.experiments {
            let ids: Vec<usize> = experiment.game_instances.iter().map(|g| g.game_id).collect();
            let expected: Vec<usize> = (0..experiment.game_instances.len()).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn test_generate_instance_contents() {
        let generator = InstanceGenerator::new(LocalePatternTable::default());
        let file = generator.generate(&collection(), "en", &templates()).unwrap();
        let instances = &file.experiments[0].game_instances;

        let second_slot = &instances[1];
        assert_eq!(second_slot.target_grid_name, "second");
        assert_eq!(second_slot.player_1_prompt_header, "A:00/01/11");
        assert_eq!(second_slot.player_2_prompt_header, "B:01/00/11");
        assert_eq!(second_slot.player_2_grids(), ["01", "00", "11"]);
        assert_eq!(second_slot.lang, "en");

        let third_slot = &instances[2];
        assert_eq!(third_slot.target_grid_name, "third");
        assert_eq!(third_slot.player_2_grids(), ["11", "01", "00"]);
        assert_eq!(
            third_slot.player_2_response_pattern,
            r"^answer:\s*(?P<content>first|second|third)\n*(?P<remainder>.*)"
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let generator = InstanceGenerator::new(LocalePatternTable::default());
        let a = generator.generate(&collection(), "de", &templates()).unwrap();
        let b = generator.generate(&collection(), "de", &templates()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.experiments[0].game_instances[0].target_grid_name, "erstes");
    }

    #[test]
    fn test_generate_unknown_language() {
        let generator = InstanceGenerator::new(LocalePatternTable::default());
        let err = generator.generate(&collection(), "xx", &templates()).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::Locale(LocaleError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_generate_uses_custom_table() {
        let table = LocalePatternTable::new([(
            "xx",
            LocalePatterns::new("say:", "pick:", "left|middle|right"),
        )])
        .unwrap();
        let generator = InstanceGenerator::new(table);
        let file = generator.generate(&collection(), "xx", &templates()).unwrap();

        let names: Vec<&str> = file.experiments[1].game_instances[..3]
            .iter()
            .map(|g| g.target_grid_name.as_str())
            .collect();
        assert_eq!(names, vec!["left", "middle", "right"]);
        assert!(file.experiments[1].game_instances[0]
            .player_1_response_pattern
            .starts_with("^say:"));
    }
}
