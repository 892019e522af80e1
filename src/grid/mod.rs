//! Grid pools: the stimuli of the reference game.
//!
//! A grid is an opaque string (typically a 5x5 board of box characters joined
//! by newlines). Grids are organised in named groups, one group per
//! experiment; the order of grids inside a group defines the stable indices
//! used by the distance matrix and the distractor search.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GridError;

/// String representation of a single game board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid(String);

impl Grid {
    /// Wraps a board string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw board string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Grid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Grid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Grid> for String {
    fn from(grid: Grid) -> Self {
        grid.0
    }
}

/// An ordered sequence of grids sharing an experiment label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridGroup {
    /// Experiment label (the key in the grid file).
    pub name: String,
    /// Grids in file order.
    pub grids: Vec<Grid>,
}

impl GridGroup {
    /// Creates a group from a name and any iterable of grid-like values.
    pub fn new<I, G>(name: impl Into<String>, grids: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<Grid>,
    {
        Self {
            name: name.into(),
            grids: grids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

/// All grid groups of one benchmark version, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridCollection {
    groups: Vec<GridGroup>,
}

impl GridCollection {
    pub fn new(groups: Vec<GridGroup>) -> Self {
        Self { groups }
    }

    /// Loads a grid artifact: a JSON object mapping group name to a list of grid strings.
    ///
    /// Key order in the file is preserved, so experiments come out in the
    /// order the file lists them.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|source| GridError::Read {
            path: path_str.clone(),
            source,
        })?;

        let collection = Self::from_json_str(&content).map_err(|e| match e {
            GridError::Json(err) => GridError::Malformed {
                path: path_str.clone(),
                message: err.to_string(),
            },
            GridError::Malformed { message, .. } => GridError::Malformed {
                path: path_str.clone(),
                message,
            },
            GridError::Empty(_) => GridError::Empty(path_str.clone()),
            other => other,
        })?;

        debug!(
            path = %path_str,
            groups = collection.groups.len(),
            "Loaded grid collection"
        );
        Ok(collection)
    }

    /// Parses a grid artifact from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, GridError> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
        if raw.is_empty() {
            return Err(GridError::Empty("<inline>".to_string()));
        }

        let mut groups = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let grids: Vec<String> =
                serde_json::from_value(value).map_err(|e| GridError::Malformed {
                    path: "<inline>".to_string(),
                    message: format!("group '{}': {}", name, e),
                })?;
            groups.push(GridGroup::new(name, grids));
        }

        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[GridGroup] {
        &self.groups
    }

    /// Looks up a group by name.
    pub fn get(&self, name: &str) -> Option<&GridGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_preserves_group_order() {
        let json = r#"{"line_grids_rows": ["a", "b", "c"], "diagonal_grids": ["d", "e", "f"], "letter_grids": ["g", "h", "i"]}"#;
        let collection = GridCollection::from_json_str(json).expect("should parse");

        let names: Vec<&str> = collection.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["line_grids_rows", "diagonal_grids", "letter_grids"]);
        assert_eq!(collection.groups()[1].grids[2], Grid::from("f"));
    }

    #[test]
    fn test_from_json_rejects_non_string_grids() {
        let json = r#"{"group": [1, 2, 3]}"#;
        let err = GridCollection::from_json_str(json).unwrap_err();
        assert!(matches!(err, GridError::Malformed { .. }));
        assert!(err.to_string().contains("group"));
    }

    #[test]
    fn test_from_json_rejects_empty_object() {
        let err = GridCollection::from_json_str("{}").unwrap_err();
        assert!(matches!(err, GridError::Empty(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GridCollection::load("/nonexistent/grids.json").unwrap_err();
        assert!(matches!(err, GridError::Read { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("grids.json");
        fs::write(&path, r#"{"g": ["▢ X\n▢ ▢", "X ▢\n▢ ▢", "▢ ▢\n▢ X"]}"#).expect("write");

        let collection = GridCollection::load(&path).expect("should load");
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("g").map(GridGroup::len), Some(3));
        assert!(collection.get("missing").is_none());
    }

    #[test]
    fn test_load_malformed_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json").expect("write");

        let err = GridCollection::load(&path).unwrap_err();
        match err {
            GridError::Malformed { path: p, .. } => assert!(p.ends_with("broken.json")),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }
}
