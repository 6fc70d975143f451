use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

use super::types::InterpMethod;

/// Read tabulated (x, y) pairs from a plain text file.
/// Columns may be separated by whitespace or commas; blank lines and `#` comments are skipped
/// and any columns after the second are ignored.
pub fn read_tabulated<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, Vec<f64>)> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tabulated data from {}", path.display()))?;

    let mut xs = Vec::new();
    let mut ys = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty());

        let (x_str, y_str) = match (fields.next(), fields.next()) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(anyhow!(
                    "{}:{}: expected at least two columns, got '{}'",
                    path.display(),
                    idx + 1,
                    line
                ))
            }
        };

        let x: f64 = x_str.parse().with_context(|| {
            format!("{}:{}: invalid x value '{}'", path.display(), idx + 1, x_str)
        })?;
        let y: f64 = y_str.parse().with_context(|| {
            format!("{}:{}: invalid y value '{}'", path.display(), idx + 1, y_str)
        })?;

        xs.push(x);
        ys.push(y);
    }

    Ok((xs, ys))
}

/// Smooth 1-D function built from tabulated nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator {
    method: InterpMethod,
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the nodes (cubic spline only, empty for linear)
    y2: Vec<f64>,
}

impl Interpolator {
    /// Build an interpolator after validating the nodes.
    pub fn new(x: Vec<f64>, y: Vec<f64>, method: InterpMethod) -> Result<Self> {
        if x.len() != y.len() {
            return Err(anyhow!(
                "Tabulated x and y must have the same length ({} != {})",
                x.len(),
                y.len()
            ));
        }
        if x.len() < method.min_points() {
            return Err(anyhow!(
                "Interpolation method '{}' needs at least {} points, got {}",
                method,
                method.min_points(),
                x.len()
            ));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(anyhow!("Tabulated values must be finite"));
        }
        if let Some(w) = x.windows(2).find(|w| w[1] <= w[0]) {
            return Err(anyhow!(
                "Tabulated x must be strictly increasing (found {} followed by {})",
                w[0],
                w[1]
            ));
        }

        let y2 = match method {
            InterpMethod::Linear => Vec::new(),
            InterpMethod::CubicSpline => natural_spline_second_derivatives(&x, &y),
        };

        Ok(Self { method, x, y, y2 })
    }

    /// Load nodes from `path` and build an interpolator.
    pub fn from_file<P: AsRef<Path>>(path: P, method: InterpMethod) -> Result<Self> {
        let path = path.as_ref();
        let (x, y) = read_tabulated(path)?;
        let interp = Self::new(x, y, method)
            .with_context(|| format!("Invalid tabulated data in {}", path.display()))?;
        log::debug!(
            "Loaded {} nodes on [{}, {}] from {} ({})",
            interp.x.len(),
            interp.x[0],
            interp.x[interp.x.len() - 1],
            path.display(),
            method
        );
        Ok(interp)
    }

    pub fn method(&self) -> InterpMethod {
        self.method
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Range covered by the tabulated nodes.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Evaluate at `query_x`.
    ///
    /// Outside the tabulated range the polynomial of the nearest end segment is extended,
    /// so out-of-range queries (e.g. negative radii) return a finite but unphysical value.
    pub fn eval(&self, query_x: f64) -> f64 {
        let i = self.segment(query_x);
        let (x1, x2) = (self.x[i], self.x[i + 1]);
        let (y1, y2) = (self.y[i], self.y[i + 1]);
        let h = x2 - x1;

        match self.method {
            InterpMethod::Linear => {
                let t = (query_x - x1) / h;
                y1 + t * (y2 - y1)
            }
            InterpMethod::CubicSpline => {
                let a = (x2 - query_x) / h;
                let b = (query_x - x1) / h;
                a * y1
                    + b * y2
                    + ((a * a * a - a) * self.y2[i] + (b * b * b - b) * self.y2[i + 1]) * h * h
                        / 6.0
            }
        }
    }

    /// Index of the segment [x_i, x_{i+1}] used for `query_x`, clamped to the end segments.
    fn segment(&self, query_x: f64) -> usize {
        let n = self.x.len();
        let idx = self.x.partition_point(|v| *v <= query_x);
        idx.saturating_sub(1).min(n - 2)
    }
}

/// Second derivatives of the natural cubic spline through (x, y), via the tridiagonal system.
fn natural_spline_second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut y2 = vec![0.0; n];
    if n < 3 {
        return y2;
    }

    // Forward sweep over the interior nodes
    let m = n - 2;
    let mut c_prime = vec![0.0; m];
    let mut d_prime = vec![0.0; m];

    for k in 0..m {
        let i = k + 1;
        let h0 = x[i] - x[i - 1];
        let h1 = x[i + 1] - x[i];
        let diag = 2.0 * (h0 + h1);
        let rhs = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);

        if k == 0 {
            c_prime[k] = h1 / diag;
            d_prime[k] = rhs / diag;
        } else {
            let denom = diag - h0 * c_prime[k - 1];
            c_prime[k] = h1 / denom;
            d_prime[k] = (rhs - h0 * d_prime[k - 1]) / denom;
        }
    }

    // Back substitution
    y2[m] = d_prime[m - 1];
    for k in (0..m - 1).rev() {
        y2[k + 1] = d_prime[k] - c_prime[k] * y2[k + 2];
    }

    y2
}
