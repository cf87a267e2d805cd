//! Fit scattered point cloud fields onto finite element mesh nodes
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod builder;
mod cloud;
mod error;
mod fitter;
mod neighbours;
mod record;
mod regions;
mod targets;
mod writer;

pub mod vtk;

// Inline anything important for a nice public API
#[doc(inline)]
pub use fitter::{fit_data, Fitter};

#[doc(inline)]
pub use builder::FitterBuilder;

#[doc(inline)]
pub use cloud::SourceCloud;

#[doc(inline)]
pub use targets::Targets;

#[doc(inline)]
pub use record::{FitRecord, Method};

#[doc(inline)]
pub use neighbours::{build_tree, idw, nearest, Neighbour};

#[doc(inline)]
pub use regions::{fit_regions, merge_max};

#[doc(inline)]
pub use writer::{read_csv, write_ascii, write_csv, write_json};

#[doc(inline)]
pub use vtk::{records_to_vtk, triangulation_to_vtk, write_vtk, VtkFormat};

#[doc(inline)]
pub use error::{Error, Result};
