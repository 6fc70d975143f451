use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::rsd::InterpMethod;

/// Construction options for [`crate::BaoCorrelationModel`].
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// model_root = "models"
/// zref = 2.3
/// fix_scale = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaoModelConfig {
    /// Directory holding the tabulated templates ("" for the working directory)
    #[serde(default)]
    pub model_root: String,

    /// Base name of the fiducial (with BAO peak) template files
    #[serde(default = "default_fiducial_name")]
    pub fiducial_name: String,

    /// Base name of the no-wiggles template files
    #[serde(default = "default_nowiggles_name")]
    pub nowiggles_name: String,

    /// Base name of the broadband template files
    #[serde(default = "default_broadband_name")]
    pub broadband_name: String,

    /// Reference redshift of the evolution factor
    #[serde(default = "default_zref")]
    pub zref: f64,

    /// Initial BAO amplitude
    #[serde(default = "default_initial_amp")]
    pub initial_amp: f64,

    /// Initial BAO scale
    #[serde(default = "default_initial_scale")]
    pub initial_scale: f64,

    /// Interpolation applied to every tabulated file
    #[serde(default)]
    pub interp_method: InterpMethod,

    #[serde(default)]
    pub fix_alpha: bool,

    #[serde(default)]
    pub fix_beta: bool,

    #[serde(default)]
    pub fix_bias: bool,

    /// Fix both the BAO amplitude and scale
    #[serde(default)]
    pub fix_bao: bool,

    /// Fix the BAO scale only
    #[serde(default)]
    pub fix_scale: bool,

    /// Fix all four broadband coefficients
    #[serde(default)]
    pub no_bband: bool,
}

impl Default for BaoModelConfig {
    fn default() -> Self {
        Self {
            model_root: String::new(),
            fiducial_name: default_fiducial_name(),
            nowiggles_name: default_nowiggles_name(),
            broadband_name: default_broadband_name(),
            zref: default_zref(),
            initial_amp: default_initial_amp(),
            initial_scale: default_initial_scale(),
            interp_method: InterpMethod::default(),
            fix_alpha: false,
            fix_beta: false,
            fix_bias: false,
            fix_bao: false,
            fix_scale: false,
            no_bband: false,
        }
    }
}

impl BaoModelConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Invalid BAO model configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("In configuration {}", path.display()))
    }

    /// True when no parameter is left free for the fit.
    pub fn fixes_every_parameter(&self) -> bool {
        self.fix_alpha && self.fix_beta && self.fix_bias && self.fix_bao && self.no_bband
    }

    pub fn validate(&self) -> Result<()> {
        if !self.zref.is_finite() || self.zref <= -1.0 {
            return Err(anyhow!(
                "Reference redshift must be finite and > -1, got {}",
                self.zref
            ));
        }
        for (label, name) in [
            ("fiducial_name", &self.fiducial_name),
            ("nowiggles_name", &self.nowiggles_name),
            ("broadband_name", &self.broadband_name),
        ] {
            if name.trim().is_empty() {
                return Err(anyhow!("{} must not be empty", label));
            }
        }
        if !self.initial_amp.is_finite() || !self.initial_scale.is_finite() {
            return Err(anyhow!(
                "Initial BAO amplitude and scale must be finite (amp={}, scale={})",
                self.initial_amp,
                self.initial_scale
            ));
        }
        Ok(())
    }
}

fn default_fiducial_name() -> String {
    "DR9LyaMocksLCDM".to_string()
}

fn default_nowiggles_name() -> String {
    "DR9LyaMocksLCDMSB".to_string()
}

fn default_broadband_name() -> String {
    "DR9LyaMocksBBand".to_string()
}

fn default_zref() -> f64 {
    2.25
}

fn default_initial_amp() -> f64 {
    1.0
}

fn default_initial_scale() -> f64 {
    1.0
}
