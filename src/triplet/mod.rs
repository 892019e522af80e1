//! Triplets and their positional variants.
//!
//! Player 1 always sees the triplet in its natural order (target first).
//! Player 2 sees the same three grids with the target moved into one of the
//! three slots; every triplet is played once per slot.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::locale::SLOT_COUNT;

/// A target grid and its two distractors, nearest distractor first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triplet {
    pub target: Grid,
    pub second: Grid,
    pub third: Grid,
}

impl Triplet {
    pub fn new(target: Grid, second: Grid, third: Grid) -> Self {
        Self {
            target,
            second,
            third,
        }
    }
}

/// Visual slot occupied by the target in player 2's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    First,
    Second,
    Third,
}

impl Slot {
    /// All slots in display order.
    pub const ALL: [Slot; SLOT_COUNT] = [Slot::First, Slot::Second, Slot::Third];

    /// Zero-based position, also the index into the locale's slot names.
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
            Slot::Third => 2,
        }
    }

    /// One-based position, as accepted in numeric answers.
    pub fn number(self) -> usize {
        self.index() + 1
    }

    /// Arranges a triplet for player 2 with the target in this slot.
    ///
    /// These are three fixed mappings, not a rotation: for `Third` the
    /// original third grid moves to slot 1 while the second grid stays put.
    pub fn arrange<'a>(self, triplet: &'a Triplet) -> [&'a Grid; SLOT_COUNT] {
        let Triplet {
            target,
            second,
            third,
        } = triplet;
        match self {
            Slot::First => [target, second, third],
            Slot::Second => [second, target, third],
            Slot::Third => [third, second, target],
        }
    }
}

/// Grid layout of one positional variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    pub slot: Slot,
    /// Player 1's view: target, second, third.
    pub player_1: [Grid; SLOT_COUNT],
    /// Player 2's view: first, second, third slot.
    pub player_2: [Grid; SLOT_COUNT],
    /// Localized name of the slot holding the target.
    pub target_name: String,
}

/// Expands a triplet into its three positional variants, one per slot.
pub fn assign_positions(triplet: &Triplet, names: [&str; SLOT_COUNT]) -> [SlotAssignment; SLOT_COUNT] {
    Slot::ALL.map(|slot| SlotAssignment {
        slot,
        player_1: [
            triplet.target.clone(),
            triplet.second.clone(),
            triplet.third.clone(),
        ],
        player_2: slot.arrange(triplet).map(Clone::clone),
        target_name: names[slot.index()].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triplet() -> Triplet {
        Triplet::new(Grid::from("T"), Grid::from("S"), Grid::from("R"))
    }

    const NAMES: [&str; 3] = ["first", "second", "third"];

    #[test]
    fn test_three_variants_per_triplet() {
        let variants = assign_positions(&triplet(), NAMES);
        let slots: Vec<Slot> = variants.iter().map(|v| v.slot).collect();
        assert_eq!(slots, vec![Slot::First, Slot::Second, Slot::Third]);
    }

    #[test]
    fn test_slot_mappings() {
        let [first, second, third] = assign_positions(&triplet(), NAMES);

        assert_eq!(first.player_2, ["T", "S", "R"].map(Grid::from));
        assert_eq!(first.target_name, "first");

        assert_eq!(second.player_2, ["S", "T", "R"].map(Grid::from));
        assert_eq!(second.target_name, "second");

        assert_eq!(third.player_2, ["R", "S", "T"].map(Grid::from));
        assert_eq!(third.target_name, "third");
    }

    #[test]
    fn test_player_1_view_unchanged() {
        for variant in assign_positions(&triplet(), NAMES) {
            assert_eq!(variant.player_1, ["T", "S", "R"].map(Grid::from));
        }
    }

    #[test]
    fn test_target_appears_once_in_named_slot() {
        let t = triplet();
        for variant in assign_positions(&t, NAMES) {
            let positions: Vec<usize> = variant
                .player_2
                .iter()
                .enumerate()
                .filter(|(_, g)| **g == t.target)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(positions, vec![variant.slot.index()]);
            assert_eq!(variant.target_name, NAMES[variant.slot.index()]);
        }
    }

    #[test]
    fn test_localized_names() {
        let names = ["erstes", "zweites", "drittes"];
        let variants = assign_positions(&triplet(), names);
        assert_eq!(variants[1].target_name, "zweites");
        assert_eq!(variants[2].slot.number(), 3);
    }
}
