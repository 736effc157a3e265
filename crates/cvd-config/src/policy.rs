//! Reduction policy configuration.
//!
//! These types match policy.json: the per-unit effect sizes of LDL and blood
//! pressure lowering, their caps, the drug titration rule and the accepted SBP
//! window.

use cvd_common::{InputBounds, SbpRange};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How newly added lipid-lowering drugs count toward the projected LDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TitrationPolicy {
    /// Every drug at its full listed efficacy.
    #[default]
    Full,
    /// Newly added drugs at half efficacy (partial titration).
    HalfWeight,
}

impl TitrationPolicy {
    /// Multiplier applied to the efficacy of a newly added drug.
    pub fn new_drug_weight(&self) -> f64 {
        match self {
            TitrationPolicy::Full => 1.0,
            TitrationPolicy::HalfWeight => 0.5,
        }
    }
}

impl std::fmt::Display for TitrationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TitrationPolicy::Full => write!(f, "full"),
            TitrationPolicy::HalfWeight => write!(f, "half_weight"),
        }
    }
}

/// Complete reduction policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReductionPolicy {
    pub schema_version: String,

    #[serde(default)]
    pub policy_id: Option<String>,

    /// Relative risk reduction (%) per mmol/L of LDL lowering.
    #[serde(default = "default_ldl_rrr_per_mmol")]
    pub ldl_rrr_per_mmol: f64,

    /// Ceiling (%) on the LDL contribution.
    #[serde(default = "default_ldl_rrr_cap")]
    pub ldl_rrr_cap: f64,

    /// Relative risk reduction (%) per 10 mmHg of SBP lowering.
    #[serde(default = "default_bp_rrr_per_10_mmhg")]
    pub bp_rrr_per_10_mmhg: f64,

    /// Ceiling (%) on the blood pressure contribution.
    #[serde(default = "default_bp_rrr_cap")]
    pub bp_rrr_cap: f64,

    #[serde(default)]
    pub titration: TitrationPolicy,

    #[serde(default)]
    pub sbp_range: SbpRange,

    /// Injectables are only indicated while LDL on oral therapy stays above this (mmol/L).
    #[serde(default = "default_injectable_ldl_threshold")]
    pub injectable_ldl_threshold: f64,

    #[serde(default)]
    pub notes: Option<String>,
}

fn default_ldl_rrr_per_mmol() -> f64 {
    22.0
}

fn default_ldl_rrr_cap() -> f64 {
    35.0
}

fn default_bp_rrr_per_10_mmhg() -> f64 {
    15.0
}

fn default_bp_rrr_cap() -> f64 {
    20.0
}

fn default_injectable_ldl_threshold() -> f64 {
    1.8
}

impl Default for ReductionPolicy {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            policy_id: None,
            ldl_rrr_per_mmol: default_ldl_rrr_per_mmol(),
            ldl_rrr_cap: default_ldl_rrr_cap(),
            bp_rrr_per_10_mmhg: default_bp_rrr_per_10_mmhg(),
            bp_rrr_cap: default_bp_rrr_cap(),
            titration: TitrationPolicy::default(),
            sbp_range: SbpRange::default(),
            injectable_ldl_threshold: default_injectable_ldl_threshold(),
            notes: None,
        }
    }
}

impl ReductionPolicy {
    /// Parse policy from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, crate::validate::ValidationError> {
        serde_json::from_str(json).map_err(|e| {
            crate::validate::ValidationError::ParseError(format!("Invalid JSON: {}", e))
        })
    }

    /// Input bounds implied by the configured SBP window.
    pub fn input_bounds(&self) -> InputBounds {
        InputBounds::for_sbp_range(self.sbp_range)
    }

    /// Same policy with a different titration rule.
    pub fn with_titration(mut self, titration: TitrationPolicy) -> Self {
        self.titration = titration;
        self
    }
}
