// crate modules
use crate::error::{Error, Result};
use crate::sets::NodeSets;

// thermofit modules
use thermofit_fit::Targets;

// external crates
use log::debug;

/// Nodes of a target finite element mesh
///
/// Nodes are indexed sequentially from 1, in the order given. The index is
/// the position in the mesh and the key everything is sorted by, while the id
/// is whatever label the mesh uses for the node.
///
/// ```rust
/// # use thermofit_nodes::{NodeSets, TargetMesh};
/// let mesh = TargetMesh::new(
///     vec![101, 205, 307],
///     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
/// )
/// .unwrap();
///
/// let mut sets = NodeSets::new();
/// sets.insert("NS_BLOCK", vec![3, 1]);
///
/// let targets = mesh.node_set(&sets, "NS_BLOCK").unwrap();
/// assert_eq!(targets.ids(), &[307, 101]);
/// assert_eq!(targets.indices(), &[3, 1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetMesh {
    ids: Vec<u64>,
    coords: Vec<[f64; 3]>,
}

impl TargetMesh {
    /// Mesh from node ids and coordinates in index order
    pub fn new(ids: Vec<u64>, coords: Vec<[f64; 3]>) -> Result<Self> {
        if coords.len() != ids.len() {
            return Err(Error::ShapeMismatch {
                what: "node coordinates",
                expected: ids.len(),
                found: coords.len(),
            });
        }
        Ok(Self { ids, coords })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the mesh has no nodes
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node ids, in index order
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Node coordinates, in index order
    pub fn coords(&self) -> &[[f64; 3]] {
        &self.coords
    }

    /// Coordinates of a node by 1-based index
    pub fn coord(&self, index: usize) -> Result<[f64; 3]> {
        self.position(index).map(|i| self.coords[i])
    }

    /// Every node of the mesh as fit targets
    pub fn all(&self) -> Result<Targets> {
        Ok(Targets::new(
            self.ids.clone(),
            (1..=self.len()).collect(),
            self.coords.clone(),
        )?)
    }

    /// Selected nodes as fit targets
    ///
    /// `indices` are 1-based and kept in the order given.
    pub fn select(&self, indices: &[usize]) -> Result<Targets> {
        let mut ids = Vec::with_capacity(indices.len());
        let mut coords = Vec::with_capacity(indices.len());

        for index in indices {
            let i = self.position(*index)?;
            ids.push(self.ids[i]);
            coords.push(self.coords[i]);
        }

        Ok(Targets::new(ids, indices.to_vec(), coords)?)
    }

    /// Nodes of a named set as fit targets
    pub fn node_set(&self, sets: &NodeSets, name: &str) -> Result<Targets> {
        let indices = sets.get(name)?;
        debug!("Node set \"{name}\" has {} nodes", indices.len());
        self.select(indices)
    }

    /// Zero based position of a 1-based index
    fn position(&self, index: usize) -> Result<usize> {
        if index == 0 || index > self.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(index - 1)
    }
}
