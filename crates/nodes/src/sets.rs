// standard library
use std::collections::BTreeMap;

// crate modules
use crate::error::{Error, Result};

// external crates
use serde::{Deserialize, Serialize};

/// Named groups of mesh nodes
///
/// Each set is an ordered list of 1-based node indices, looked up by name.
///
/// ```rust
/// # use thermofit_nodes::NodeSets;
/// let mut sets = NodeSets::new();
/// sets.insert("NS_CLAD", vec![1, 2, 5]);
/// sets.insert("NS_BLOCK", vec![3, 4, 5]);
///
/// assert_eq!(sets.get("NS_CLAD").unwrap(), &[1, 2, 5]);
/// assert!(sets.get("NS_SHROUD").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSets {
    sets: BTreeMap<String, Vec<usize>>,
}

impl NodeSets {
    /// Start with no sets
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a set, returning whatever was previously stored under `name`
    pub fn insert<S: Into<String>>(&mut self, name: S, indices: Vec<usize>) -> Option<Vec<usize>> {
        self.sets.insert(name.into(), indices)
    }

    /// Node indices of a named set
    pub fn get(&self, name: &str) -> Result<&[usize]> {
        self.sets
            .get(name)
            .map(|indices| indices.as_slice())
            .ok_or_else(|| Error::NodeSetNotFound(name.to_string()))
    }

    /// True if a set exists with this name
    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Set names, in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(|k| k.as_str())
    }

    /// Iterate over `(name, indices)` pairs, in sorted order of name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True if there are no sets
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<usize>)> for NodeSets {
    fn from_iter<I: IntoIterator<Item = (S, Vec<usize>)>>(iter: I) -> Self {
        Self {
            sets: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_from_pairs() {
        let sets = [("b", vec![2]), ("a", vec![1, 3])]
            .into_iter()
            .collect::<NodeSets>();

        assert_eq!(sets.len(), 2);
        assert_eq!(sets.names().collect::<Vec<&str>>(), vec!["a", "b"]);
        assert!(sets.contains("b"));
    }

    #[test]
    fn missing_set() {
        let sets = NodeSets::new();
        assert!(sets.is_empty());
        assert!(matches!(
            sets.get("NS_SHROUD"),
            Err(Error::NodeSetNotFound(name)) if name == "NS_SHROUD"
        ));
    }

    #[test]
    fn replace_existing() {
        let mut sets = NodeSets::new();
        assert!(sets.insert("x", vec![1]).is_none());
        assert_eq!(sets.insert("x", vec![2]), Some(vec![1]));
        assert_eq!(sets.get("x").unwrap(), &[2]);
    }
}
