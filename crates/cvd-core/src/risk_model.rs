//! Baseline 10-year risk model.
//!
//! A log-linear score over the patient covariates is turned into an absolute
//! risk through the model's baseline survival:
//!
//! ```text
//! risk = 1 - S0 ^ exp(lp - offset)
//! ```
//!
//! The result is expressed as a percentage, capped at
//! [`MAX_MODELED_RISK`](cvd_math::MAX_MODELED_RISK) and rounded to one decimal.

use cvd_common::{Horizon, InputBounds, PatientProfile, Result};
use cvd_config::RiskCoefficients;
use cvd_math::{cap_percent, prob_to_percent, MAX_MODELED_RISK};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::horizon::{convert_5yr, convert_lifetime};

/// Risk over every supported horizon, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RiskEstimate {
    pub risk_5yr: f64,
    pub risk_10yr: f64,
    pub risk_lifetime: f64,
    /// Linear predictor the estimate was derived from.
    pub linear_predictor: f64,
}

impl RiskEstimate {
    pub fn for_horizon(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::FiveYear => self.risk_5yr,
            Horizon::TenYear => self.risk_10yr,
            Horizon::Lifetime => self.risk_lifetime,
        }
    }

    /// 10-year risk sits at the modeling ceiling.
    pub fn is_saturated(&self) -> bool {
        self.risk_10yr >= MAX_MODELED_RISK
    }
}

/// Risk model bound to a coefficient set and input bounds.
#[derive(Debug, Clone, Default)]
pub struct RiskModel {
    coefficients: RiskCoefficients,
    bounds: InputBounds,
}

impl RiskModel {
    pub fn new(coefficients: RiskCoefficients, bounds: InputBounds) -> Self {
        Self {
            coefficients,
            bounds,
        }
    }

    pub fn coefficients(&self) -> &RiskCoefficients {
        &self.coefficients
    }

    pub fn bounds(&self) -> &InputBounds {
        &self.bounds
    }

    /// Linear predictor for a profile. Does not validate.
    ///
    /// The current SBP feeds the model; the target only matters for the
    /// blood pressure reduction.
    pub fn linear_predictor(&self, profile: &PatientProfile) -> f64 {
        let c = &self.coefficients;
        let indicator = |flag: bool| if flag { 1.0 } else { 0.0 };

        c.age * f64::from(profile.age)
            + c.male * indicator(profile.sex.is_male())
            + c.sbp * profile.sbp
            + c.total_cholesterol * profile.total_cholesterol
            + c.hdl * profile.hdl
            + c.smoker * indicator(profile.smoker)
            + c.diabetes * indicator(profile.diabetes)
            + c.egfr_per_10 * (profile.egfr / 10.0)
            + c.log_crp * profile.crp.ln_1p()
            + c.vascular_bed * f64::from(profile.vascular_count())
    }

    /// 10-year event probability before capping or rounding.
    pub fn raw_probability(&self, linear_predictor: f64) -> f64 {
        let c = &self.coefficients;
        1.0 - c
            .baseline_survival
            .powf((linear_predictor - c.linear_predictor_offset).exp())
    }

    /// Baseline 10-year risk (percent, `[0, 95]`, one decimal).
    pub fn estimate_10y_risk(&self, profile: &PatientProfile) -> Result<f64> {
        profile.validate(&self.bounds)?;
        let lp = self.linear_predictor(profile);
        Ok(cap_percent(prob_to_percent(self.raw_probability(lp))))
    }

    /// Risk over every horizon.
    ///
    /// The rounded 10-year percentage feeds both horizon conversions.
    pub fn estimate(&self, profile: &PatientProfile) -> Result<RiskEstimate> {
        profile.validate(&self.bounds)?;
        let lp = self.linear_predictor(profile);
        let risk_10yr = cap_percent(prob_to_percent(self.raw_probability(lp)));
        let risk_5yr = convert_5yr(risk_10yr)?;
        let risk_lifetime = convert_lifetime(profile.age, risk_10yr)?;

        debug!(
            lp,
            risk_5yr, risk_10yr, risk_lifetime, "baseline risk estimated"
        );

        Ok(RiskEstimate {
            risk_5yr,
            risk_10yr,
            risk_lifetime,
            linear_predictor: lp,
        })
    }
}

/// Baseline 10-year risk under the built-in coefficients and standard bounds.
pub fn estimate_10y_risk(profile: &PatientProfile) -> Result<f64> {
    RiskModel::default().estimate_10y_risk(profile)
}
