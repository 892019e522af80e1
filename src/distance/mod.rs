//! Pairwise edit distances between grids.
//!
//! The distance matrix is the similarity signal for distractor selection:
//! grids that need few single-character edits to turn into the target are
//! the hardest distractors for the guessing player.
//!
//! Distances are Levenshtein distances over Unicode scalar values, so a box
//! character such as `▢` counts as a single edit.

use ndarray::{Array2, ArrayView1};

use crate::grid::Grid;

/// Square, symmetric matrix of edit distances with a zero diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    distances: Array2<usize>,
}

impl DistanceMatrix {
    /// Builds the full matrix for a group of grids.
    ///
    /// Each unordered pair is computed once and mirrored.
    pub fn build(grids: &[Grid]) -> Self {
        let n = grids.len();
        let mut distances = Array2::zeros((n, n));

        for i in 0..n {
            for j in (i + 1)..n {
                let d = strsim::levenshtein(grids[i].as_str(), grids[j].as_str());
                distances[[i, j]] = d;
                distances[[j, i]] = d;
            }
        }

        Self { distances }
    }

    /// Wraps a precomputed matrix.
    ///
    /// Returns `None` if the array is not square.
    pub fn from_array(distances: Array2<usize>) -> Option<Self> {
        if distances.nrows() != distances.ncols() {
            return None;
        }
        Some(Self { distances })
    }

    /// Number of grids covered by the matrix.
    pub fn size(&self) -> usize {
        self.distances.nrows()
    }

    /// Distance between grids `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> usize {
        self.distances[[i, j]]
    }

    /// Distances from grid `i` to every grid in the group.
    pub fn row(&self, i: usize) -> ArrayView1<'_, usize> {
        self.distances.row(i)
    }

    pub fn as_array(&self) -> &Array2<usize> {
        &self.distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grids(values: &[&str]) -> Vec<Grid> {
        values.iter().map(|v| Grid::from(*v)).collect()
    }

    #[test]
    fn test_distances_are_levenshtein() {
        let matrix = DistanceMatrix::build(&grids(&["kitten", "sitting", "", "flaw", "lawn"]));
        assert_eq!(matrix.get(0, 1), 3);
        assert_eq!(matrix.get(0, 2), 6);
        assert_eq!(matrix.get(2, 1), 7);
        assert_eq!(matrix.get(3, 4), 2);
    }

    #[test]
    fn test_distances_count_chars_not_bytes() {
        // Each box character is three bytes in UTF-8
        let matrix = DistanceMatrix::build(&grids(&["▢ ▢ X", "▢ X X", "▢▢", "XX"]));
        assert_eq!(matrix.get(0, 1), 1);
        assert_eq!(matrix.get(2, 3), 2);
    }

    #[test]
    fn test_matrix_symmetric_with_zero_diagonal() {
        let group = grids(&["▢ ▢\nX ▢", "X ▢\nX ▢", "X X\nX X", "▢ ▢\n▢ ▢"]);
        let matrix = DistanceMatrix::build(&group);

        assert_eq!(matrix.size(), 4);
        for i in 0..4 {
            assert_eq!(matrix.get(i, i), 0);
            for j in 0..4 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn test_matrix_values() {
        let matrix = DistanceMatrix::build(&grids(&["00", "01", "11"]));
        assert_eq!(matrix.row(0).to_vec(), vec![0, 1, 2]);
        assert_eq!(matrix.row(1).to_vec(), vec![1, 0, 1]);
        assert_eq!(matrix.row(2).to_vec(), vec![2, 1, 0]);
    }

    #[test]
    fn test_from_array_rejects_non_square() {
        assert!(DistanceMatrix::from_array(Array2::zeros((2, 3))).is_none());
        assert!(DistanceMatrix::from_array(Array2::zeros((3, 3))).is_some());
    }

    #[test]
    fn test_empty_group() {
        let matrix = DistanceMatrix::build(&[]);
        assert_eq!(matrix.size(), 0);
    }
}
