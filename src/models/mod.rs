pub mod bao;
pub mod rsd;

/// Common traits used by correlation models and their templates
pub mod traits {
    use crate::model_params::{ParameterSet, ReportFormat};
    use crate::models::rsd::Multipole;
    use anyhow::Result;
    use std::io;

    /// A correlation function template that can be queried in redshift space.
    pub trait CorrelationTemplate {
        /// ξ(r, μ) with the linear distortion `beta` applied.
        fn at_angle(&self, r: f64, mu: f64, beta: f64) -> f64;

        /// Undistorted multipole ξ_ℓ(r).
        fn at_multipole(&self, r: f64, multipole: Multipole) -> f64;
    }

    /// Parametric correlation model evaluated by an external fitting driver.
    ///
    /// `params` is always ordered like [`CorrelationModel::parameters`].
    pub trait CorrelationModel {
        fn name(&self) -> &str;

        fn parameters(&self) -> &ParameterSet;

        /// Predicted correlation at separation `r`, line-of-sight cosine `mu` and redshift `z`.
        fn evaluate(&self, r: f64, mu: f64, z: f64, params: &[f64]) -> Result<f64>;

        /// Predicted `multipole` of the correlation at separation `r` and redshift `z`.
        fn evaluate_multipole(
            &self,
            r: f64,
            multipole: Multipole,
            z: f64,
            params: &[f64],
        ) -> Result<f64>;

        /// Write a human readable description of the model.
        fn print_to_stream(
            &self,
            out: &mut dyn io::Write,
            format: &ReportFormat,
        ) -> io::Result<()> {
            self.parameters().print_to_stream(out, format)
        }
    }
}

/// Utility functions shared by the correlation models
pub mod utils {
    use crate::models::rsd::Multipole;

    /// Legendre polynomial P_ℓ(μ) of the given multipole.
    pub fn legendre(multipole: Multipole, mu: f64) -> f64 {
        let mu_sq = mu * mu;
        match multipole {
            Multipole::Monopole => 1.0,
            Multipole::Quadrupole => (3.0 * mu_sq - 1.0) / 2.0,
            Multipole::Hexadecapole => (35.0 * mu_sq * mu_sq - 30.0 * mu_sq + 3.0) / 8.0,
        }
    }

}
