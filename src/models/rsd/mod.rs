//! Redshift-space distorted correlation templates
//!
//! Tabulated multipole curves are turned into smooth functions by [`interp::Interpolator`]
//! and grouped by [`correlation::RsdCorrelationFunction`] into a template that can be
//! queried either at (r, μ) for a given distortion β or directly per multipole.

pub mod correlation;
pub mod interp;
pub mod types;

pub use correlation::*;
pub use interp::*;
pub use types::*;
