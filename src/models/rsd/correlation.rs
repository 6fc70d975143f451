// src/models/rsd/correlation.rs

//! Redshift-space distorted correlation function
//!
//! Combines the three undistorted multipoles ξ₀, ξ₂, ξ₄ of a real-space correlation
//! function with the linear (Kaiser) redshift-space distortion parameter β:
//!
//! ξ(r, μ) = C₀(β) ξ₀(r) P₀(μ) + C₂(β) ξ₂(r) P₂(μ) + C₄(β) ξ₄(r) P₄(μ)
//!
//! with C₀ = 1 + 2β/3 + β²/5, C₂ = 4β/3 + 4β²/7 and C₄ = 8β²/35.
//!
//! β is an argument of every angular query rather than state on the object, so a single
//! instance can be shared freely between threads.

use anyhow::{Context, Result};
use std::path::Path;

use super::interp::Interpolator;
use super::types::{InterpMethod, Multipole};
use crate::models::traits::CorrelationTemplate;
use crate::models::utils::legendre;

/// Kaiser coefficients (C₀, C₂, C₄) for distortion parameter `beta`.
pub fn distortion_coefficients(beta: f64) -> [f64; 3] {
    let beta_sq = beta * beta;
    [
        1.0 + (2.0 / 3.0) * beta + (1.0 / 5.0) * beta_sq,
        (4.0 / 3.0) * beta + (4.0 / 7.0) * beta_sq,
        (8.0 / 35.0) * beta_sq,
    ]
}

/// Correlation function template built from its three tabulated multipoles.
#[derive(Debug, Clone, PartialEq)]
pub struct RsdCorrelationFunction {
    xi0: Interpolator,
    xi2: Interpolator,
    xi4: Interpolator,
}

impl RsdCorrelationFunction {
    pub fn new(xi0: Interpolator, xi2: Interpolator, xi4: Interpolator) -> Self {
        Self { xi0, xi2, xi4 }
    }

    /// Load the monopole, quadrupole and hexadecapole from `paths` (in that order).
    pub fn from_files<P: AsRef<Path>>(paths: [P; 3], method: InterpMethod) -> Result<Self> {
        let [p0, p2, p4] = paths;
        let load = |path: &Path, multipole: Multipole| {
            Interpolator::from_file(path, method)
                .with_context(|| format!("Failed to load {} template", multipole))
        };

        Ok(Self {
            xi0: load(p0.as_ref(), Multipole::Monopole)?,
            xi2: load(p2.as_ref(), Multipole::Quadrupole)?,
            xi4: load(p4.as_ref(), Multipole::Hexadecapole)?,
        })
    }

    /// The underlying interpolator for `multipole`.
    pub fn multipole_fn(&self, multipole: Multipole) -> &Interpolator {
        match multipole {
            Multipole::Monopole => &self.xi0,
            Multipole::Quadrupole => &self.xi2,
            Multipole::Hexadecapole => &self.xi4,
        }
    }
}

impl CorrelationTemplate for RsdCorrelationFunction {
    fn at_angle(&self, r: f64, mu: f64, beta: f64) -> f64 {
        let [c0, c2, c4] = distortion_coefficients(beta);
        c0 * self.xi0.eval(r)
            + c2 * legendre(Multipole::Quadrupole, mu) * self.xi2.eval(r)
            + c4 * legendre(Multipole::Hexadecapole, mu) * self.xi4.eval(r)
    }

    fn at_multipole(&self, r: f64, multipole: Multipole) -> f64 {
        self.multipole_fn(multipole).eval(r)
    }
}
