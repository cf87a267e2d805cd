// crate modules
use crate::builder::FitterBuilder;
use crate::cloud::SourceCloud;
use crate::error::{Error, Result};
use crate::neighbours::{build_tree, idw, nearest};
use crate::record::{FitRecord, Method};
use crate::targets::Targets;

// thermofit modules
use thermofit_delaunay::Triangulation;

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, info};

/// Fit point cloud values onto target nodes
///
/// Source values are interpolated onto the targets with barycentric weights
/// of the enclosing source tetrahedron. Anything outside the source
/// triangulation, which in practice is the outer surface of the target mesh,
/// takes an inverse-distance weighted average of the closest source points
/// instead.
///
/// The fields are public for direct use, but a builder is also implemented
/// for those who prefer it.
///
/// ```rust
/// # use thermofit_fit::{Fitter, SourceCloud, Targets};
/// let cloud = SourceCloud::new(
///     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
///     vec![0.0, 10.0, 20.0, 30.0],
/// )
/// .unwrap();
///
/// let targets = Targets::new(vec![7], vec![1], vec![[0.25, 0.25, 0.25]]).unwrap();
///
/// let fitter = Fitter::builder()
///     .neighbours(3)
///     .tolerance(1e-9)
///     .disable_progress(true)
///     .build();
///
/// let records = fitter.fit(&cloud, &targets).unwrap();
/// assert!((records[0].value - 15.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Fitter {
    /// Number of nearest source points used outside the triangulation
    pub neighbours: usize,
    /// Slack on barycentric coordinates when deciding a target is inside
    pub tolerance: f64,
    /// Do not print the kdam progress indicators
    pub disable_progress: bool,
}

impl Fitter {
    /// Start with the default configuration
    pub fn new() -> Fitter {
        Default::default()
    }

    /// Get an instance of the [FitterBuilder]
    pub fn builder() -> FitterBuilder {
        FitterBuilder::default()
    }

    /// Fit the source values onto every target
    ///
    /// Returns exactly one record per target, sorted by node index. Targets
    /// sharing an index keep their input order.
    ///
    /// A degenerate source cloud is fatal and nothing is returned. Targets
    /// that can not be located in the triangulation are not an error, they
    /// are extrapolated.
    pub fn fit(&self, cloud: &SourceCloud, targets: &Targets) -> Result<Vec<FitRecord>> {
        let triangulation = Triangulation::new(cloud.coords())?;

        if targets.is_empty() {
            debug!("No targets to fit");
            return Ok(Vec::new());
        }

        let tree = build_tree(cloud.coords());
        let k = self.neighbours.clamp(1, cloud.len());
        let values = cloud.values();

        let mut progress_bar = self.init_progress_bar(targets.len())?;
        if !self.disable_progress {
            progress_bar.refresh()?;
        }

        let mut records = Vec::with_capacity(targets.len());
        for (id, index, p) in targets.iter() {
            let weights = triangulation
                .locate_with_tolerance(p, self.tolerance)
                .tetrahedron()
                .and_then(|t| Some((t, triangulation.barycentric(t, p)?)));

            let (value, method) = match weights {
                Some((t, weights)) => {
                    let tet = triangulation.tetrahedra()[t];
                    let value = tet
                        .iter()
                        .zip(weights)
                        .map(|(v, w)| w * values[*v])
                        .sum::<f64>();
                    (value, Method::Interpolated)
                }
                None => (idw(values, &nearest(&tree, p, k)), Method::Extrapolated),
            };

            records.push(FitRecord {
                index,
                id,
                x: p[0],
                y: p[1],
                z: p[2],
                value,
                method,
            });
            progress_bar.update(1)?;
        }

        // stable, so duplicate indices keep their input order
        records.sort_by_key(|r| r.index);

        let extrapolated = records.iter().filter(|r| r.is_extrapolated()).count();
        info!(
            "Fitted {} targets ({} interpolated, {} extrapolated)",
            records.len(),
            records.len() - extrapolated,
            extrapolated
        );

        Ok(records)
    }

    /// Initialise the progress bar, if wanted
    fn init_progress_bar(&self, total: usize) -> Result<Bar> {
        BarBuilder::default()
            .total(total)
            .unit(" nodes")
            .disable(self.disable_progress)
            .bar_format("{desc}{percentage:.0}%|{animation}| {count}/{total} [{rate:.0} nodes/s]")
            .desc("Fitting ")
            .build()
            .map_err(Error::ProgressError)
    }
}

impl Default for Fitter {
    fn default() -> Self {
        FitterBuilder::default().build()
    }
}

/// Fit source values onto target nodes with the default [Fitter]
///
/// This is the plain form of [Fitter::fit()], taking the raw arrays directly.
///
/// - `source_coords`: x, y, z of every source point
/// - `source_values`: value at every source point
/// - `target_ids`: node id of every target
/// - `target_indices`: node index of every target, used to sort the output
/// - `target_coords`: x, y, z of every target
///
/// ```rust
/// # use thermofit_fit::{fit_data, Method};
/// let source = [
///     [0.0, 0.0, 0.0],
///     [1.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0],
///     [0.0, 0.0, 1.0],
/// ];
/// let values = [0.0, 10.0, 20.0, 30.0];
///
/// let records = fit_data(
///     &source,
///     &values,
///     &[7, 8],
///     &[2, 1],
///     &[[0.25, 0.25, 0.25], [10.0, 10.0, 10.0]],
/// )
/// .unwrap();
///
/// // sorted by index
/// assert_eq!(records[0].id, 8);
/// assert_eq!(records[0].method, Method::Extrapolated);
/// assert!((records[1].value - 15.0).abs() < 1e-12);
/// ```
pub fn fit_data(
    source_coords: &[[f64; 3]],
    source_values: &[f64],
    target_ids: &[u64],
    target_indices: &[usize],
    target_coords: &[[f64; 3]],
) -> Result<Vec<FitRecord>> {
    let cloud = SourceCloud::new(source_coords.to_vec(), source_values.to_vec())?;
    let targets = Targets::new(
        target_ids.to_vec(),
        target_indices.to_vec(),
        target_coords.to_vec(),
    )?;
    Fitter::new().fit(&cloud, &targets)
}
