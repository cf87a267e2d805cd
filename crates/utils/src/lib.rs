//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, consistent scientific formatting of field values or finding
//! the extent of a point cloud are useful everywhere.
#![doc = include_str!("../readme.md")]

// Alias for the format! macro
pub use std::format as f;

// Modules
mod bounds;
mod error;
mod float_ext;
mod slice_ext;

// Flatten
pub use bounds::Bounds;
pub use error::{Error, Result};
pub use float_ext::FloatExt;
pub use slice_ext::SliceExt;
