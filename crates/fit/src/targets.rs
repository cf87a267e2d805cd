// crate modules
use crate::error::{Error, Result};

// thermofit modules
use thermofit_utils::SliceExt;

// external crates
use itertools::izip;

/// Mesh nodes to fit values onto
///
/// Each target carries an opaque node `id` and an `index`, which is the key
/// the fitted records are sorted by. Input order does not matter.
///
/// ```rust
/// # use thermofit_fit::Targets;
/// let targets = Targets::new(
///     vec![101, 102],
///     vec![2, 1],
///     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
/// )
/// .unwrap();
///
/// assert_eq!(targets.len(), 2);
/// assert_eq!(targets.indices(), &[2, 1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Targets {
    ids: Vec<u64>,
    indices: Vec<usize>,
    coords: Vec<[f64; 3]>,
}

impl Targets {
    /// Group node ids, indices, and coordinates
    ///
    /// All three must be the same length and coordinates must be finite.
    pub fn new(ids: Vec<u64>, indices: Vec<usize>, coords: Vec<[f64; 3]>) -> Result<Self> {
        if indices.len() != ids.len() {
            return Err(Error::ShapeMismatch {
                what: "target indices",
                expected: ids.len(),
                found: indices.len(),
            });
        }

        if coords.len() != ids.len() {
            return Err(Error::ShapeMismatch {
                what: "target coordinates",
                expected: ids.len(),
                found: coords.len(),
            });
        }

        if let Some(index) = coords.iter().position(|p| p.first_non_finite().is_some()) {
            return Err(Error::NonFiniteCoordinate {
                what: "target",
                index,
            });
        }

        Ok(Self {
            ids,
            indices,
            coords,
        })
    }

    /// Number of targets
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if there is nothing to fit
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node ids
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Node indices used to sort the output
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Node coordinates
    pub fn coords(&self) -> &[[f64; 3]] {
        &self.coords
    }

    /// Iterate over `(id, index, coordinate)` for every target
    pub fn iter(&self) -> impl Iterator<Item = (u64, usize, &[f64; 3])> + '_ {
        izip!(&self.ids, &self.indices, &self.coords).map(|(id, index, p)| (*id, *index, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lengths() {
        let result = Targets::new(vec![1, 2], vec![1], vec![[0.0; 3]; 2]);
        assert!(matches!(
            result,
            Err(Error::ShapeMismatch {
                what: "target indices",
                expected: 2,
                found: 1
            })
        ));

        let result = Targets::new(vec![1, 2], vec![1, 2], vec![[0.0; 3]; 3]);
        assert!(matches!(
            result,
            Err(Error::ShapeMismatch {
                what: "target coordinates",
                ..
            })
        ));
    }

    #[test]
    fn iterate_in_input_order() {
        let targets = Targets::new(
            vec![10, 20, 30],
            vec![3, 1, 2],
            vec![[0.0; 3], [1.0; 3], [2.0; 3]],
        )
        .unwrap();

        let collected = targets.iter().collect::<Vec<_>>();
        assert_eq!(collected[0], (10, 3, &[0.0; 3]));
        assert_eq!(collected[2], (30, 2, &[2.0; 3]));
    }

    #[test]
    fn empty_targets() {
        let targets = Targets::new(vec![], vec![], vec![]).unwrap();
        assert!(targets.is_empty());
        assert_eq!(targets, Targets::default());
    }
}
