//! Distractor selection.
//!
//! For every target grid the two most similar other grids are chosen as
//! distractors. Ties are broken by ascending index, and a second neighbour at
//! the same distance as the first is preferred over the next distance tier.
//! Grids identical to the target (distance 0) are never chosen, and a pair of
//! distractors identical to each other is rejected.

use tracing::trace;

use crate::distance::DistanceMatrix;
use crate::error::GeneratorError;

/// Indices of the two distractors selected for a target, nearest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistractorPair {
    pub first: usize,
    pub second: usize,
}

impl DistractorPair {
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.first, self.second)
    }
}

/// Selects the two nearest distinct neighbours of `target`.
///
/// Candidates are `(distance, index)` pairs for every index other than the
/// target with a non-zero distance, ordered ascending; the first two win.
/// Fails if the winners are at distance 0 from each other.
pub fn select_distractors(
    matrix: &DistanceMatrix,
    target: usize,
) -> Result<DistractorPair, GeneratorError> {
    let size = matrix.size();
    if target >= size {
        return Err(GeneratorError::TargetOutOfRange { target, size });
    }

    let mut candidates: Vec<(usize, usize)> = matrix
        .row(target)
        .iter()
        .enumerate()
        .filter(|&(index, &distance)| index != target && distance > 0)
        .map(|(index, &distance)| (distance, index))
        .collect();

    if candidates.len() < 2 {
        return Err(GeneratorError::NotEnoughDistractors {
            target,
            candidates: candidates.len(),
        });
    }

    candidates.sort_unstable();

    let pair = DistractorPair {
        first: candidates[0].1,
        second: candidates[1].1,
    };
    if matrix.get(pair.first, pair.second) == 0 {
        return Err(GeneratorError::DuplicateDistractors {
            target,
            first: pair.first,
            second: pair.second,
        });
    }
    trace!(
        target_index = target,
        first = pair.first,
        first_distance = candidates[0].0,
        second = pair.second,
        second_distance = candidates[1].0,
        "Selected distractors"
    );
    Ok(pair)
}
