//! # BAO-Lib: Parametric BAO Models of the Two-Point Correlation Function
//!
//! `bao-lib` predicts the galaxy or quasar two-point correlation function around the baryon
//! acoustic oscillation (BAO) peak, for use inside a cosmological fitting driver. The model
//! combines a fiducial (wiggly) template, a no-wiggle template and three broadband nuisance
//! templates, each built from tabulated monopole, quadrupole and hexadecapole curves.
//!
//! ## Core Features
//!
//! - **Template loading**: 15 tabulated multipole files, smoothed by linear or natural
//!   cubic spline interpolation
//! - **Redshift-space distortion**: linear (Kaiser) distortion applied per evaluation
//! - **Two coordinate systems**: predictions at (r, μ) or per multipole ℓ = 0, 2, 4
//! - **Thread safe**: models are immutable once built and can be shared by parallel fitters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bao_lib::{load_bao_model, default_configs, CorrelationModel, Multipole};
//!
//! let mut config = default_configs::dr9_lya_mocks();
//! config.model_root = "models".to_string();
//! let model = load_bao_model(&config)?;
//!
//! // [alpha, beta, (1+beta)*bias, BAO amplitude, BAO scale, xio, a0, a1, a2]
//! let params = model.parameters().values();
//! let xi = model.evaluate(100.0, 0.5, 2.4, &params)?;
//! let xi2 = model.evaluate_multipole(100.0, Multipole::Quadrupole, 2.4, &params)?;
//! println!("xi(r=100, mu=0.5) = {:.6e}, xi_2(r=100) = {:.6e}", xi, xi2);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Parameter Vector
//!
//! The nine parameters are always ordered as listed in [`PARAM_NAMES`]. Fitting drivers own
//! the vector; [`ParameterSet`] provides the initial values, errors and fixed flags.

// ================================================================================================
// MODULES
// ================================================================================================

pub mod config;
pub mod export;
pub mod model_params;
pub mod models;

// ================================================================================================
// IMPORTS
// ================================================================================================

use anyhow::Result;
use std::path::Path;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

// Configuration
pub use config::BaoModelConfig;

// Parameter schema
pub use model_params::{ModelParameter, ParameterSet, ReportFormat};

// BAO model types
pub use models::bao::{
    broadband_file_name, define_bao_parameters, normalize_root, template_file_name,
    BaoCorrelationModel, BaoParams, BaoTemplates, BroadbandCategory, PARAM_COUNT, PARAM_NAMES,
};

// Correlation templates and interpolation
pub use models::rsd::{
    distortion_coefficients, read_tabulated, InterpMethod, Interpolator, Multipole,
    RsdCorrelationFunction,
};

// Model traits
pub use models::traits::{CorrelationModel, CorrelationTemplate};

// Tabulation
pub use export::{
    tabulate_angular, tabulate_multipoles, write_grid_csv, GridPoint, GridSpec, MultipolePoint,
};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured model settings for common fits.
///
/// Every preset reads templates from the working directory; set
/// [`BaoModelConfig::model_root`] to point elsewhere.
pub mod default_configs {
    use crate::config::BaoModelConfig;

    /// DR9 Lyman-alpha mock templates at zref = 2.25, every parameter free.
    pub fn dr9_lya_mocks() -> BaoModelConfig {
        BaoModelConfig::default()
    }

    /// Peak and physical parameters only: broadband coefficients held at their defaults.
    pub fn peak_only() -> BaoModelConfig {
        BaoModelConfig {
            no_bband: true,
            ..BaoModelConfig::default()
        }
    }

    /// BAO amplitude and scale fixed at their initial values, e.g. to fit the broadband
    /// shape around a known peak position.
    pub fn fixed_peak() -> BaoModelConfig {
        BaoModelConfig {
            fix_bao: true,
            ..BaoModelConfig::default()
        }
    }
}

/// Build a BAO model, loading every template named by `config`.
///
/// # Errors
///
/// * `anyhow::Error` if the configuration is invalid
/// * `anyhow::Error` naming the first tabulated file that is missing or malformed
pub fn load_bao_model(config: &BaoModelConfig) -> Result<BaoCorrelationModel> {
    BaoCorrelationModel::new(config)
}

/// Build a BAO model from a TOML configuration file.
pub fn load_bao_model_from_file<P: AsRef<Path>>(path: P) -> Result<BaoCorrelationModel> {
    let config = BaoModelConfig::from_file(path)?;
    BaoCorrelationModel::new(&config)
}
