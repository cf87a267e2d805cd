//! Fitting several regions and joining the results
//!
//! Structural models are normally fitted region by region, each with its own
//! source data (cladding, block, shroud, etc.). Nodes on the interfaces
//! between regions appear in more than one result.

// standard library
use std::collections::BTreeMap;

// crate modules
use crate::cloud::SourceCloud;
use crate::error::Result;
use crate::fitter::Fitter;
use crate::record::FitRecord;
use crate::targets::Targets;

// external crates
use log::debug;
use rayon::prelude::*;

/// Fit independent regions in parallel
///
/// Each `(SourceCloud, Targets)` pair is fitted with the same [Fitter] on the
/// rayon thread pool. Results come back in the same order as the regions. If
/// any region fails the whole batch fails.
///
/// ```rust
/// # use thermofit_fit::{fit_regions, Fitter, SourceCloud, Targets};
/// let corners = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let regions = vec![
///     (
///         SourceCloud::new(corners.clone(), vec![1.0; 4]).unwrap(),
///         Targets::new(vec![1], vec![1], vec![[0.1, 0.1, 0.1]]).unwrap(),
///     ),
///     (
///         SourceCloud::new(corners, vec![2.0; 4]).unwrap(),
///         Targets::new(vec![2], vec![2], vec![[0.1, 0.1, 0.1]]).unwrap(),
///     ),
/// ];
///
/// let results = fit_regions(&Fitter::new(), &regions).unwrap();
/// assert!((results[1][0].value - 2.0).abs() < 1e-12);
/// ```
pub fn fit_regions(
    fitter: &Fitter,
    regions: &[(SourceCloud, Targets)],
) -> Result<Vec<Vec<FitRecord>>> {
    debug!("Fitting {} regions", regions.len());
    regions
        .par_iter()
        .map(|(cloud, targets)| fitter.fit(cloud, targets))
        .collect()
}

/// Join fit results, keeping the largest value at shared node indices
///
/// Where the same index appears more than once the whole record with the
/// maximum value is kept. The first record wins on a tie. Output is sorted by
/// index.
///
/// ```rust
/// # use thermofit_fit::{merge_max, FitRecord, Method};
/// let record = |index, value| FitRecord {
///     index,
///     id: 100 + index as u64,
///     x: 0.0,
///     y: 0.0,
///     z: 0.0,
///     value,
///     method: Method::Interpolated,
/// };
///
/// let block = vec![record(1, 5.0), record(2, 3.0)];
/// let clad = vec![record(2, 4.0), record(3, 1.0)];
///
/// let merged = merge_max(&[block, clad]);
/// let values = merged.iter().map(|r| r.value).collect::<Vec<f64>>();
/// assert_eq!(values, vec![5.0, 4.0, 1.0]);
/// ```
pub fn merge_max(sets: &[Vec<FitRecord>]) -> Vec<FitRecord> {
    let mut merged: BTreeMap<usize, FitRecord> = BTreeMap::new();

    for record in sets.iter().flatten() {
        merged
            .entry(record.index)
            .and_modify(|kept| {
                if record.value > kept.value {
                    *kept = *record;
                }
            })
            .or_insert(*record);
    }

    let total = sets.iter().map(|s| s.len()).sum::<usize>();
    debug!(
        "Merged {} records into {} unique nodes",
        total,
        merged.len()
    );

    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Method;

    fn record(index: usize, value: f64, method: Method) -> FitRecord {
        FitRecord {
            index,
            id: index as u64 * 10,
            x: index as f64,
            y: 0.0,
            z: 0.0,
            value,
            method,
        }
    }

    #[test]
    fn merge_keeps_whole_record() {
        let a = vec![record(4, 1.0, Method::Interpolated)];
        let b = vec![record(4, 2.0, Method::Extrapolated)];
        let merged = merge_max(&[a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].method, Method::Extrapolated);
        assert_eq!(merged[0].value, 2.0);
    }

    #[test]
    fn merge_ties_keep_first() {
        let a = vec![record(1, 1.0, Method::Interpolated)];
        let b = vec![record(1, 1.0, Method::Extrapolated)];
        assert_eq!(merge_max(&[a, b])[0].method, Method::Interpolated);
    }

    #[test]
    fn merge_sorts_by_index() {
        let a = vec![record(9, 1.0, Method::Interpolated), record(2, 1.0, Method::Interpolated)];
        let b = vec![record(5, 1.0, Method::Interpolated)];
        let indices = merge_max(&[a, b])
            .iter()
            .map(|r| r.index)
            .collect::<Vec<usize>>();
        assert_eq!(indices, vec![2, 5, 9]);
        assert!(merge_max(&[]).is_empty());
    }

    #[test]
    fn region_failure_aborts() {
        let good = SourceCloud::new(
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            vec![1.0; 4],
        )
        .unwrap();
        let flat = SourceCloud::new(
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
            vec![1.0; 4],
        )
        .unwrap();
        let targets = Targets::new(vec![1], vec![1], vec![[0.1; 3]]).unwrap();

        let regions = vec![(good, targets.clone()), (flat, targets)];
        assert!(fit_regions(&Fitter::new(), &regions).is_err());
    }
}
