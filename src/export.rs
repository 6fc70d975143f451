//! Tabulate model predictions on a grid and write them to CSV.
//!
//! Handy for plotting a model next to the data it was fitted to, or for comparing the output
//! of two parameter vectors.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::rsd::Multipole;
use crate::models::traits::CorrelationModel;

/// Evaluation grid in separation and line-of-sight cosine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub r_min: f64,
    pub r_max: f64,
    /// Number of evenly spaced radii, including both ends
    pub n_r: usize,
    /// Line-of-sight cosines for angular tabulation
    pub mu_values: Vec<f64>,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            r_min: 20.0,
            r_max: 200.0,
            n_r: 46,
            mu_values: vec![0.0, 0.5, 1.0],
        }
    }
}

impl GridSpec {
    /// Evenly spaced radii from `r_min` to `r_max`.
    pub fn radii(&self) -> Vec<f64> {
        match self.n_r {
            0 => Vec::new(),
            1 => vec![self.r_min],
            n => {
                let step = (self.r_max - self.r_min) / (n - 1) as f64;
                (0..n).map(|i| self.r_min + step * i as f64).collect()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.r_min.is_finite() || !self.r_max.is_finite() || self.r_max < self.r_min {
            return Err(anyhow!(
                "Invalid radial range [{}, {}]",
                self.r_min,
                self.r_max
            ));
        }
        if self.n_r == 0 {
            return Err(anyhow!("Grid needs at least one radius"));
        }
        Ok(())
    }
}

/// Prediction at one (r, mu) grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub r: f64,
    pub mu: f64,
    pub xi: f64,
}

/// Prediction of one multipole at one radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultipolePoint {
    pub r: f64,
    pub ell: u32,
    pub xi: f64,
}

/// Evaluate `model` at every (r, mu) of `grid`, radius-major.
pub fn tabulate_angular<M: CorrelationModel + ?Sized>(
    model: &M,
    z: f64,
    params: &[f64],
    grid: &GridSpec,
) -> Result<Vec<GridPoint>> {
    grid.validate()?;
    let mut points = Vec::with_capacity(grid.n_r * grid.mu_values.len());
    for r in grid.radii() {
        for &mu in &grid.mu_values {
            let xi = model.evaluate(r, mu, z, params)?;
            points.push(GridPoint { r, mu, xi });
        }
    }
    Ok(points)
}

/// Evaluate the monopole, quadrupole and hexadecapole of `model` at every radius of `grid`.
pub fn tabulate_multipoles<M: CorrelationModel + ?Sized>(
    model: &M,
    z: f64,
    params: &[f64],
    grid: &GridSpec,
) -> Result<Vec<MultipolePoint>> {
    grid.validate()?;
    let mut points = Vec::with_capacity(grid.n_r * Multipole::ALL.len());
    for r in grid.radii() {
        for multipole in Multipole::ALL {
            let xi = model.evaluate_multipole(r, multipole, z, params)?;
            points.push(MultipolePoint {
                r,
                ell: multipole.order(),
                xi,
            });
        }
    }
    Ok(points)
}

/// Write `rows` to a CSV file with a header line.
pub fn write_grid_csv<P: AsRef<Path>, R: Serialize>(path: P, rows: &[R]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    log::debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
