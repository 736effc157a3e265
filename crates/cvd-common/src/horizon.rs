//! Risk horizons.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Time window over which an absolute risk is expressed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
pub enum Horizon {
    /// Five years.
    #[serde(rename = "5yr", alias = "5y", alias = "5")]
    #[value(name = "5yr", alias = "5y", alias = "5")]
    FiveYear,
    /// Ten years (the risk model's reference horizon).
    #[default]
    #[serde(rename = "10yr", alias = "10y", alias = "10")]
    #[value(name = "10yr", alias = "10y", alias = "10")]
    TenYear,
    /// From current age until age 85.
    #[serde(rename = "lifetime")]
    #[value(name = "lifetime", alias = "lt")]
    Lifetime,
}

impl Horizon {
    /// All horizons, shortest first.
    pub const ALL: [Horizon; 3] = [Horizon::FiveYear, Horizon::TenYear, Horizon::Lifetime];

    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::FiveYear => "5yr",
            Horizon::TenYear => "10yr",
            Horizon::Lifetime => "lifetime",
        }
    }

    /// Human label used in rendered output.
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::FiveYear => "5-yr",
            Horizon::TenYear => "10-yr",
            Horizon::Lifetime => "Lifetime",
        }
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5" | "5y" | "5yr" | "five" => Ok(Horizon::FiveYear),
            "10" | "10y" | "10yr" | "ten" => Ok(Horizon::TenYear),
            "lifetime" | "lt" | "life" => Ok(Horizon::Lifetime),
            _ => Err(format!("unknown horizon: {}", s)),
        }
    }
}
