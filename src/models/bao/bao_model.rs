// src/models/bao/bao_model.rs

//! Parametric BAO model of the two-point correlation function
//!
//! The prediction combines five correlation templates, each built from tabulated
//! multipoles:
//!
//! ξ(r, μ, z) = b² ((1+z)/(1+z_ref))^α [ A (ξ_fid(s r, μ) - ξ_nw(s r, μ))
//!              + x ξ_c(r, μ) + (1 + a₀) ξ_nw(r, μ) + a₁ ξ_1(r, μ) + a₂ ξ_2(r, μ) ]
//!
//! where b = ((1+β) b) / (1+β), A is the BAO amplitude and s the BAO scale. The scale only
//! dilates the radius fed to the peak templates; μ is unchanged because the dilation
//! cancels in the angular coordinate. The same combination is available per multipole,
//! using the undistorted template multipoles.

use anyhow::{Context, Result};
use std::fmt;
use std::io;

use super::bao_params::{define_bao_parameters, BaoParams};
use crate::config::BaoModelConfig;
use crate::model_params::{ParameterSet, ReportFormat};
use crate::models::rsd::{InterpMethod, Multipole, RsdCorrelationFunction};
use crate::models::traits::{CorrelationModel, CorrelationTemplate};

/// Broadband nuisance template families, identified by a one-character file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadbandCategory {
    Constant,
    Linear1,
    Linear2,
}

impl BroadbandCategory {
    pub const ALL: [BroadbandCategory; 3] = [
        BroadbandCategory::Constant,
        BroadbandCategory::Linear1,
        BroadbandCategory::Linear2,
    ];

    pub fn suffix(self) -> char {
        match self {
            BroadbandCategory::Constant => 'c',
            BroadbandCategory::Linear1 => '1',
            BroadbandCategory::Linear2 => '2',
        }
    }
}

/// Append a trailing `/` to a non-empty root that lacks one.
pub fn normalize_root(root: &str) -> String {
    let mut root = root.to_string();
    if !root.is_empty() && !root.ends_with('/') {
        root.push('/');
    }
    root
}

/// `{root}{base}.{order}.dat`
pub fn template_file_name(root: &str, base: &str, multipole: Multipole) -> String {
    format!("{}{}.{}.dat", normalize_root(root), base, multipole.order())
}

/// `{root}{base}{category}.{order}.dat`
pub fn broadband_file_name(
    root: &str,
    base: &str,
    category: BroadbandCategory,
    multipole: Multipole,
) -> String {
    format!(
        "{}{}{}.{}.dat",
        normalize_root(root),
        base,
        category.suffix(),
        multipole.order()
    )
}

/// The five correlation templates of the BAO model.
#[derive(Debug, Clone)]
pub struct BaoTemplates<T> {
    /// Fiducial template, with BAO peak
    pub fiducial: T,
    /// Same cosmology without the peak
    pub nowiggle: T,
    /// Constant broadband template
    pub bband_c: T,
    /// First linear broadband template
    pub bband_1: T,
    /// Second linear broadband template
    pub bband_2: T,
}

impl BaoTemplates<RsdCorrelationFunction> {
    /// Load the 15 tabulated multipole files below `root`.
    /// Any missing or malformed file aborts the whole load.
    pub fn load(
        root: &str,
        fiducial_name: &str,
        nowiggles_name: &str,
        broadband_name: &str,
        method: InterpMethod,
    ) -> Result<Self> {
        let family = |base: &str| {
            let paths = Multipole::ALL.map(|m| template_file_name(root, base, m));
            RsdCorrelationFunction::from_files(paths, method)
                .with_context(|| format!("Failed to load correlation template '{}'", base))
        };
        let broadband = |category: BroadbandCategory| {
            let paths =
                Multipole::ALL.map(|m| broadband_file_name(root, broadband_name, category, m));
            RsdCorrelationFunction::from_files(paths, method).with_context(|| {
                format!(
                    "Failed to load broadband template '{}{}'",
                    broadband_name,
                    category.suffix()
                )
            })
        };

        Ok(Self {
            fiducial: family(fiducial_name)?,
            nowiggle: family(nowiggles_name)?,
            bband_c: broadband(BroadbandCategory::Constant)?,
            bband_1: broadband(BroadbandCategory::Linear1)?,
            bband_2: broadband(BroadbandCategory::Linear2)?,
        })
    }
}

/// BAO correlation model over five templates.
///
/// Evaluation is a pure function of its arguments and the immutable templates, so a single
/// instance may be shared between threads evaluating different parameter vectors.
#[derive(Debug, Clone)]
pub struct BaoCorrelationModel<T = RsdCorrelationFunction> {
    zref: f64,
    templates: BaoTemplates<T>,
    parameters: ParameterSet,
}

impl BaoCorrelationModel<RsdCorrelationFunction> {
    /// Register the parameters and eagerly load every template described by `config`.
    pub fn new(config: &BaoModelConfig) -> Result<Self> {
        config.validate()?;
        if config.fixes_every_parameter() {
            log::warn!("BAO model configuration fixes every parameter");
        }
        let parameters = define_bao_parameters(config)?;
        let templates = BaoTemplates::load(
            &config.model_root,
            &config.fiducial_name,
            &config.nowiggles_name,
            &config.broadband_name,
            config.interp_method,
        )?;

        log::info!(
            "Built BAO model from {} (fiducial={}, nowiggles={}, broadband={}, method={}, zref={})",
            display_root(&config.model_root),
            config.fiducial_name,
            config.nowiggles_name,
            config.broadband_name,
            config.interp_method,
            config.zref
        );

        Ok(Self::with_templates(config.zref, templates, parameters))
    }
}

impl<T: CorrelationTemplate> BaoCorrelationModel<T> {
    /// Assemble a model from already-built templates.
    pub fn with_templates(zref: f64, templates: BaoTemplates<T>, parameters: ParameterSet) -> Self {
        Self {
            zref,
            templates,
            parameters,
        }
    }

    /// Reference redshift of the evolution factor.
    pub fn zref(&self) -> f64 {
        self.zref
    }

    pub fn templates(&self) -> &BaoTemplates<T> {
        &self.templates
    }

    /// Predicted ξ(r, μ) at redshift `z`.
    ///
    /// Fails only when `params` does not have exactly nine entries. `beta == -1` yields a
    /// non-finite result. Negative `r` is passed through to the templates unchecked.
    pub fn evaluate(&self, r: f64, mu: f64, z: f64, params: &[f64]) -> Result<f64> {
        let p = BaoParams::from_slice(params)?;
        let beta = p.beta;
        Ok(self.combine(r, z, &p, |template, radius| template.at_angle(radius, mu, beta)))
    }

    /// Predicted multipole ξ_ℓ(r) at redshift `z`, from the undistorted template multipoles.
    pub fn evaluate_multipole(
        &self,
        r: f64,
        multipole: Multipole,
        z: f64,
        params: &[f64],
    ) -> Result<f64> {
        let p = BaoParams::from_slice(params)?;
        Ok(self.combine(r, z, &p, |template, radius| {
            template.at_multipole(radius, multipole)
        }))
    }

    /// Peak plus broadband combination shared by both coordinate systems.
    /// `query` evaluates one template at the given radius.
    fn combine<F>(&self, r: f64, z: f64, p: &BaoParams, query: F) -> f64
    where
        F: Fn(&T, f64) -> f64,
    {
        let bias = p.bias();
        let zfactor = p.redshift_factor(z, self.zref);
        let t = &self.templates;

        let mut peak = 0.0;
        if p.amplitude != 0.0 {
            let scaled_r = r * p.scale;
            let fid = query(&t.fiducial, scaled_r);
            let nw = query(&t.nowiggle, scaled_r);
            peak = p.amplitude * (fid - nw);
        }

        // Exact zero coefficients skip the template lookup
        let mut broadband = 0.0;
        if p.xio != 0.0 {
            broadband += p.xio * query(&t.bband_c, r);
        }
        if 1.0 + p.a0 != 0.0 {
            broadband += (1.0 + p.a0) * query(&t.nowiggle, r);
        }
        if p.a1 != 0.0 {
            broadband += p.a1 * query(&t.bband_1, r);
        }
        if p.a2 != 0.0 {
            broadband += p.a2 * query(&t.bband_2, r);
        }

        bias * bias * zfactor * (peak + broadband)
    }

    /// Parameter report followed by the reference redshift.
    pub fn print_to_stream(
        &self,
        out: &mut dyn io::Write,
        format: &ReportFormat,
    ) -> io::Result<()> {
        self.parameters.print_to_stream(out, format)?;
        writeln!(out)?;
        writeln!(out, "Reference redshift = {}", self.zref)
    }
}

impl<T: CorrelationTemplate> CorrelationModel for BaoCorrelationModel<T> {
    fn name(&self) -> &str {
        self.parameters.model_name()
    }

    fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    fn evaluate(&self, r: f64, mu: f64, z: f64, params: &[f64]) -> Result<f64> {
        BaoCorrelationModel::evaluate(self, r, mu, z, params)
    }

    fn evaluate_multipole(
        &self,
        r: f64,
        multipole: Multipole,
        z: f64,
        params: &[f64],
    ) -> Result<f64> {
        BaoCorrelationModel::evaluate_multipole(self, r, multipole, z, params)
    }

    fn print_to_stream(&self, out: &mut dyn io::Write, format: &ReportFormat) -> io::Result<()> {
        BaoCorrelationModel::print_to_stream(self, out, format)
    }
}

impl<T: CorrelationTemplate> fmt::Display for BaoCorrelationModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.print_to_stream(&mut buf, &ReportFormat::default())
            .map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

fn display_root(root: &str) -> &str {
    if root.is_empty() {
        "."
    } else {
        root
    }
}
