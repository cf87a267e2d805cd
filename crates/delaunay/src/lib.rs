//! Delaunay tetrahedralisation for scattered point clouds
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod locate;
mod order;
mod triangulation;

pub mod predicates;

// Inline anything important for a nice public API
#[doc(inline)]
pub use locate::Location;

#[doc(inline)]
pub use triangulation::{Triangulation, DEFAULT_TOLERANCE};

#[doc(inline)]
pub use predicates::{barycentric, orient3d, Sphere};

#[doc(inline)]
pub use error::{Error, Result};
