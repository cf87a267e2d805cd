//! `thermofit` maps scattered physical fields onto finite element meshes for
//! thermostructural analysis
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use thermofit_utils as utils;

#[cfg(feature = "delaunay")]
#[cfg_attr(docsrs, doc(cfg(feature = "delaunay")))]
#[doc(inline)]
pub use thermofit_delaunay as delaunay;

#[cfg(feature = "fit")]
#[cfg_attr(docsrs, doc(cfg(feature = "fit")))]
#[doc(inline)]
pub use thermofit_fit as fit;

#[cfg(feature = "nodes")]
#[cfg_attr(docsrs, doc(cfg(feature = "nodes")))]
#[doc(inline)]
pub use thermofit_nodes as nodes;
