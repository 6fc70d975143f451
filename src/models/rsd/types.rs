use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multipole moments of an anisotropic correlation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multipole {
    /// Order 0
    Monopole,
    /// Order 2
    Quadrupole,
    /// Order 4
    Hexadecapole,
}

impl Multipole {
    /// All supported multipoles in ascending order.
    pub const ALL: [Multipole; 3] = [
        Multipole::Monopole,
        Multipole::Quadrupole,
        Multipole::Hexadecapole,
    ];

    /// Legendre order of this multipole.
    pub fn order(self) -> u32 {
        match self {
            Multipole::Monopole => 0,
            Multipole::Quadrupole => 2,
            Multipole::Hexadecapole => 4,
        }
    }
}

impl TryFrom<u32> for Multipole {
    type Error = anyhow::Error;

    fn try_from(order: u32) -> Result<Self> {
        match order {
            0 => Ok(Multipole::Monopole),
            2 => Ok(Multipole::Quadrupole),
            4 => Ok(Multipole::Hexadecapole),
            _ => Err(anyhow!(
                "Unsupported multipole order {} (expected 0, 2 or 4)",
                order
            )),
        }
    }
}

impl fmt::Display for Multipole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Multipole::Monopole => "monopole",
            Multipole::Quadrupole => "quadrupole",
            Multipole::Hexadecapole => "hexadecapole",
        };
        write!(f, "{} (l={})", name, self.order())
    }
}

/// Interpolation scheme applied to every tabulated multipole curve.
///
/// Serialized as `"linear"` or `"cspline"`. Deserialization goes through [`FromStr`], so
/// configuration files accept the same case-insensitive names and `"cubic"` alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum InterpMethod {
    /// Piecewise linear between nodes
    #[serde(rename = "linear")]
    Linear,
    /// Natural cubic spline (zero curvature at both ends)
    #[default]
    #[serde(rename = "cspline")]
    CubicSpline,
}

impl InterpMethod {
    /// Minimum number of tabulated nodes the method needs.
    pub fn min_points(self) -> usize {
        match self {
            InterpMethod::Linear => 2,
            InterpMethod::CubicSpline => 3,
        }
    }

    /// Identifier used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            InterpMethod::Linear => "linear",
            InterpMethod::CubicSpline => "cspline",
        }
    }
}

impl FromStr for InterpMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(InterpMethod::Linear),
            "cspline" | "cubic" => Ok(InterpMethod::CubicSpline),
            other => Err(anyhow!("Unknown interpolation method: '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for InterpMethod {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for InterpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
