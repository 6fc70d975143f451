// src/models/bao/bao_params.rs

//! Typed view of the BAO model parameter vector.
//!
//! The external parameter vector has exactly nine entries in a fixed order:
//!
//! | Index | Name            | Role                                            |
//! |-------|-----------------|-------------------------------------------------|
//! | 0     | `alpha`         | redshift-evolution exponent                     |
//! | 1     | `beta`          | redshift-space distortion parameter             |
//! | 2     | `(1+beta)*bias` | combined bias, bias = value / (1 + beta)        |
//! | 3     | `BAO amplitude` | scale of the peak (wiggles minus no-wiggles)    |
//! | 4     | `BAO scale`     | dilation of r in the peak templates             |
//! | 5     | `BBand xio`     | constant broadband coefficient                  |
//! | 6     | `BBand a0`      | no-wiggles template enters as (1 + a0)          |
//! | 7     | `BBand a1`      | first linear broadband coefficient              |
//! | 8     | `BBand a2`      | second linear broadband coefficient             |
//!
//! The order is read in exactly one place, [`BaoParams::from_slice`].

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::config::BaoModelConfig;
use crate::model_params::ParameterSet;

/// Number of entries in a BAO parameter vector.
pub const PARAM_COUNT: usize = 9;

/// Parameter names in parameter-vector order.
pub const PARAM_NAMES: [&str; PARAM_COUNT] = [
    "alpha",
    "beta",
    "(1+beta)*bias",
    "BAO amplitude",
    "BAO scale",
    "BBand xio",
    "BBand a0",
    "BBand a1",
    "BBand a2",
];

/// Named BAO model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaoParams {
    /// Redshift-evolution exponent
    pub alpha: f64,
    /// Redshift-space distortion parameter
    pub beta: f64,
    /// (1 + beta) * bias
    pub combined_bias: f64,
    /// BAO peak amplitude (0 disables the peak)
    pub amplitude: f64,
    /// BAO scale applied to r in the peak templates
    pub scale: f64,
    /// Constant broadband coefficient
    pub xio: f64,
    /// No-wiggles broadband offset
    pub a0: f64,
    /// First linear broadband coefficient
    pub a1: f64,
    /// Second linear broadband coefficient
    pub a2: f64,
}

impl BaoParams {
    /// Bind a parameter vector to named fields. The vector must have exactly nine entries.
    pub fn from_slice(params: &[f64]) -> Result<Self> {
        let p: &[f64; PARAM_COUNT] = params.try_into().map_err(|_| {
            anyhow!(
                "BAO model expects {} parameters, got {}",
                PARAM_COUNT,
                params.len()
            )
        })?;

        Ok(Self {
            alpha: p[0],
            beta: p[1],
            combined_bias: p[2],
            amplitude: p[3],
            scale: p[4],
            xio: p[5],
            a0: p[6],
            a1: p[7],
            a2: p[8],
        })
    }

    /// Parameter vector in the external order.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.alpha,
            self.beta,
            self.combined_bias,
            self.amplitude,
            self.scale,
            self.xio,
            self.a0,
            self.a1,
            self.a2,
        ]
    }

    /// Linear bias. Not finite when beta == -1.
    pub fn bias(&self) -> f64 {
        self.combined_bias / (1.0 + self.beta)
    }

    /// ((1+z)/(1+zref))^alpha, exactly 1 when z == zref.
    pub fn redshift_factor(&self, z: f64, zref: f64) -> f64 {
        ((1.0 + z) / (1.0 + zref)).powf(self.alpha)
    }
}

/// Register the nine BAO parameters with their default values, errors and fixed flags.
pub fn define_bao_parameters(config: &BaoModelConfig) -> Result<ParameterSet> {
    let bband_fixed = config.no_bband;
    let defaults: [(f64, f64, bool); PARAM_COUNT] = [
        (3.8, 0.3, config.fix_alpha),
        (1.0, 0.1, config.fix_beta),
        (-0.34, 0.03, config.fix_bias),
        (config.initial_amp, 0.15, config.fix_bao),
        (config.initial_scale, 0.02, config.fix_bao || config.fix_scale),
        (0.0, 0.001, bband_fixed),
        (-2.5, 0.2, bband_fixed),
        (-1.8, 2.0, bband_fixed),
        (0.0, 2.0, bband_fixed),
    ];

    let mut set = ParameterSet::new("BAO");
    for (name, (value, error, fixed)) in PARAM_NAMES.iter().zip(defaults) {
        set.define_parameter(name, value, error, fixed)?;
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_binds_positions() {
        let v: Vec<f64> = (0..PARAM_COUNT).map(|i| i as f64 + 0.5).collect();
        let p = BaoParams::from_slice(&v).unwrap();

        assert_eq!(p.alpha, 0.5);
        assert_eq!(p.beta, 1.5);
        assert_eq!(p.combined_bias, 2.5);
        assert_eq!(p.amplitude, 3.5);
        assert_eq!(p.scale, 4.5);
        assert_eq!(p.xio, 5.5);
        assert_eq!(p.a0, 6.5);
        assert_eq!(p.a1, 7.5);
        assert_eq!(p.a2, 8.5);
        assert_eq!(p.to_vec(), v);
    }

    #[test]
    fn test_wrong_length_fails_fast() {
        let err = BaoParams::from_slice(&[1.0; 8]).unwrap_err();
        assert!(err.to_string().contains("expects 9 parameters, got 8"));
        assert!(BaoParams::from_slice(&[1.0; 10]).is_err());
        assert!(BaoParams::from_slice(&[]).is_err());
    }

    #[test]
    fn test_bias_and_redshift_factor() {
        let mut p =
            BaoParams::from_slice(&[3.8, 1.0, -0.34, 1.0, 1.0, 0.0, -2.5, -1.8, 0.0]).unwrap();
        assert!((p.bias() + 0.17).abs() < 1e-15);

        for alpha in [-4.0, 0.0, 3.8, 12.5] {
            p.alpha = alpha;
            assert_eq!(p.redshift_factor(2.25, 2.25), 1.0);
        }
        p.alpha = 2.0;
        assert!((p.redshift_factor(3.0, 1.0) - 4.0).abs() < 1e-12);

        // beta == -1 is not guarded
        p.beta = -1.0;
        assert!(!p.bias().is_finite());
    }

    #[test]
    fn test_default_schema() {
        let set = define_bao_parameters(&BaoModelConfig::default()).unwrap();
        assert_eq!(set.model_name(), "BAO");
        assert_eq!(set.names(), PARAM_NAMES.to_vec());
        assert_eq!(
            set.values(),
            vec![3.8, 1.0, -0.34, 1.0, 1.0, 0.0, -2.5, -1.8, 0.0]
        );
        assert_eq!(set.errors(), vec![0.3, 0.1, 0.03, 0.15, 0.02, 0.001, 0.2, 2.0, 2.0]);
        assert_eq!(set.free_count(), PARAM_COUNT);
    }

    #[test]
    fn test_fixed_flags() {
        let config = BaoModelConfig {
            fix_scale: true,
            no_bband: true,
            initial_amp: 0.8,
            initial_scale: 1.02,
            ..BaoModelConfig::default()
        };
        let set = define_bao_parameters(&config).unwrap();
        let fixed: Vec<bool> = set.iter().map(|p| p.fixed).collect();
        assert_eq!(
            fixed,
            vec![false, false, false, false, true, true, true, true, true]
        );
        assert_eq!(set.get(3).unwrap().value, 0.8);
        assert_eq!(set.get(4).unwrap().value, 1.02);

        let config = BaoModelConfig {
            fix_bao: true,
            fix_alpha: true,
            ..BaoModelConfig::default()
        };
        let set = define_bao_parameters(&config).unwrap();
        let fixed: Vec<bool> = set.iter().map(|p| p.fixed).collect();
        assert_eq!(
            fixed,
            vec![true, false, false, true, true, false, false, false, false]
        );
    }
}
