//! BAO correlation model
//!
//! [`bao_model::BaoCorrelationModel`] owns the five correlation templates and combines them
//! into a prediction for a nine-entry parameter vector, bound to named fields by
//! [`bao_params::BaoParams`].

pub mod bao_model;
pub mod bao_params;

pub use bao_model::*;
pub use bao_params::*;
