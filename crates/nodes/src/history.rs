//! Nodal fields at a sequence of times
//!
//! Transient thermostructural runs take a nodal temperature field at a
//! handful of time markers. A typical pulse history is a uniform lock-in
//! temperature, then the fitted steady state, then steady state plus the
//! fitted pulse increment for as long as the pulse is held.

// crate modules
use crate::error::{Error, Result};

// thermofit modules
use thermofit_fit::FitRecord;
use thermofit_utils::FloatExt;

// external crates
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Time value of a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeMarker {
    /// Simulation time
    pub time: f64,
    /// Frame number, starting from 1
    pub frame: usize,
}

impl std::fmt::Display for TimeMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "frame {} @ {}", self.frame, self.time.sci(5, 2))
    }
}

/// Named nodal field at a sequence of time markers
///
/// Every frame has exactly one value per node, and frame times never go
/// backwards. Equal times are allowed for step changes.
///
/// ```rust
/// # use thermofit_nodes::NodalHistory;
/// let steady = vec![100.0, 120.0, 140.0];
/// let pulse = vec![5.0, 50.0, 500.0];
///
/// let mut history = NodalHistory::new("NodalTempField", 3);
/// history.push_constant(0.0, 30.0).unwrap();
/// history.push_field(0.01, steady.clone()).unwrap();
/// history.push_sum(0.0100007, &[&steady, &pulse]).unwrap();
///
/// assert_eq!(history.len(), 3);
/// assert_eq!(history.frame(3).unwrap(), &[105.0, 170.0, 640.0]);
/// assert_eq!(history.markers()[2].frame, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodalHistory {
    name: String,
    n_nodes: usize,
    markers: Vec<TimeMarker>,
    frames: Vec<Vec<f64>>,
}

impl NodalHistory {
    /// Empty history for a mesh of `n_nodes`
    pub fn new<S: Into<String>>(name: S, n_nodes: usize) -> Self {
        Self {
            name: name.into(),
            n_nodes,
            markers: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of values in every frame
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if no frames have been added
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Time marker of every frame, in order
    pub fn markers(&self) -> &[TimeMarker] {
        &self.markers
    }

    /// Every frame, in order
    pub fn frames(&self) -> &[Vec<f64>] {
        &self.frames
    }

    /// Values of a frame by its 1-based frame number
    pub fn frame(&self, frame: usize) -> Option<&[f64]> {
        let i = frame.checked_sub(1)?;
        self.frames.get(i).map(|f| f.as_slice())
    }

    /// Same value at every node
    pub fn push_constant(&mut self, time: f64, value: f64) -> Result<TimeMarker> {
        self.push_field(time, vec![value; self.n_nodes])
    }

    /// Full nodal field
    pub fn push_field(&mut self, time: f64, values: Vec<f64>) -> Result<TimeMarker> {
        self.check_time(time)?;
        self.check_length(values.len())?;
        Ok(self.push_unchecked(time, values))
    }

    /// Node by node sum of several fields
    ///
    /// For example a steady state plus a pulse increment. Summing no fields
    /// at all gives zero everywhere.
    pub fn push_sum(&mut self, time: f64, fields: &[&[f64]]) -> Result<TimeMarker> {
        self.check_time(time)?;

        let mut total = vec![0.0; self.n_nodes];
        for field in fields {
            self.check_length(field.len())?;
            for (t, v) in total.iter_mut().zip(field.iter()) {
                *t += v;
            }
        }

        Ok(self.push_unchecked(time, total))
    }

    fn push_unchecked(&mut self, time: f64, values: Vec<f64>) -> TimeMarker {
        let marker = TimeMarker {
            time,
            frame: self.frames.len() + 1,
        };
        debug!("{}: added {marker}", self.name);

        self.markers.push(marker);
        self.frames.push(values);
        marker
    }

    fn check_time(&self, time: f64) -> Result<()> {
        let previous = self.markers.last().map_or(f64::NEG_INFINITY, |m| m.time);
        if !time.is_finite() || time < previous {
            return Err(Error::NonMonotonicTime { previous, time });
        }
        Ok(())
    }

    fn check_length(&self, found: usize) -> Result<()> {
        if found != self.n_nodes {
            return Err(Error::FieldLength {
                expected: self.n_nodes,
                found,
            });
        }
        Ok(())
    }
}

/// Scatter fitted records into a full nodal field
///
/// Records are placed by their 1-based index. Nodes without a record take
/// the `fill` value. Records with an index outside the mesh are an error.
///
/// ```rust
/// # use thermofit_fit::{FitRecord, Method};
/// # use thermofit_nodes::values_from_records;
/// let record = |index, value| FitRecord {
///     index,
///     id: 0,
///     x: 0.0,
///     y: 0.0,
///     z: 0.0,
///     value,
///     method: Method::Interpolated,
/// };
///
/// let field = values_from_records(&[record(3, 7.0), record(1, 2.0)], 4, 0.0).unwrap();
/// assert_eq!(field, vec![2.0, 0.0, 7.0, 0.0]);
/// ```
pub fn values_from_records(records: &[FitRecord], n_nodes: usize, fill: f64) -> Result<Vec<f64>> {
    let mut values = vec![fill; n_nodes];
    let mut filled = vec![false; n_nodes];

    for record in records {
        if record.index == 0 || record.index > n_nodes {
            return Err(Error::IndexOutOfRange {
                index: record.index,
                len: n_nodes,
            });
        }
        values[record.index - 1] = record.value;
        filled[record.index - 1] = true;
    }

    let missing = filled.iter().filter(|f| !**f).count();
    if missing > 0 {
        warn!("{missing} node(s) had no fitted value, using {fill}");
    }

    Ok(values)
}
