//! Target meshes, named node sets, and nodal time histories
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod history;
mod mesh;
mod sets;

// Inline anything important for a nice public API
#[doc(inline)]
pub use mesh::TargetMesh;

#[doc(inline)]
pub use sets::NodeSets;

#[doc(inline)]
pub use history::{values_from_records, NodalHistory, TimeMarker};

#[doc(inline)]
pub use error::{Error, Result};
