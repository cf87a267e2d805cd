// thermofit modules
use thermofit_utils::FloatExt;

// external crates
use serde::{Deserialize, Serialize};

/// How a fitted value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Barycentric interpolation inside a source tetrahedron
    Interpolated,
    /// Inverse-distance weighting of the nearest source points
    Extrapolated,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Method::Interpolated => write!(f, "interpolated"),
            Method::Extrapolated => write!(f, "extrapolated"),
        }
    }
}

/// Fitted value at a single target node
///
/// Node id, index, and coordinates are echoed back from the input so the
/// records can be joined or written without the original targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitRecord {
    /// Node index, the sort key
    pub index: usize,
    /// Node id
    pub id: u64,
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// z coordinate
    pub z: f64,
    /// Fitted value
    pub value: f64,
    /// Whether the target was inside the source triangulation
    pub method: Method,
}

impl FitRecord {
    /// Coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// True if the value came from the nearest-neighbour fallback
    pub fn is_extrapolated(&self) -> bool {
        self.method == Method::Extrapolated
    }
}

impl std::fmt::Display for FitRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:>8} {:>10} {} {} {} {} {}",
            self.index,
            self.id,
            self.x.sci(5, 2),
            self.y.sci(5, 2),
            self.z.sci(5, 2),
            self.value.sci(5, 2),
            self.method
        )
    }
}
