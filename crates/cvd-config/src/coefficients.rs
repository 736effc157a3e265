//! Risk model coefficients.
//!
//! These types match coefficients.json. The defaults are the published
//! SMART-style 10-year model; a file may override them as long as every
//! covariate term keeps its sign.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Direction a covariate pushes risk as it rises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectDirection {
    /// Risk never falls as the covariate rises.
    Harmful,
    /// Risk never rises as the covariate rises.
    Protective,
}

impl EffectDirection {
    pub fn requirement(&self) -> &'static str {
        match self {
            EffectDirection::Harmful => ">= 0",
            EffectDirection::Protective => "<= 0",
        }
    }
}

/// Coefficients of the log-linear 10-year risk model.
///
/// ```text
/// lp   = Σ coefficient × covariate
/// risk = 1 - baseline_survival ^ exp(lp - linear_predictor_offset)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RiskCoefficients {
    pub schema_version: String,

    #[serde(default)]
    pub model_id: Option<String>,

    /// Per year of age.
    pub age: f64,
    /// Male sex indicator.
    pub male: f64,
    /// Per mmHg systolic blood pressure.
    pub sbp: f64,
    /// Per mmol/L total cholesterol.
    pub total_cholesterol: f64,
    /// Per mmol/L HDL-C.
    pub hdl: f64,
    /// Current smoker indicator.
    pub smoker: f64,
    /// Diabetes indicator.
    pub diabetes: f64,
    /// Per 10 mL/min/1.73m² eGFR.
    pub egfr_per_10: f64,
    /// Per unit ln(hs-CRP + 1).
    pub log_crp: f64,
    /// Per affected vascular bed.
    pub vascular_bed: f64,

    /// 10-year baseline survival.
    pub baseline_survival: f64,
    /// Centring constant subtracted from the linear predictor.
    pub linear_predictor_offset: f64,

    #[serde(default)]
    pub notes: Option<String>,
}

impl Default for RiskCoefficients {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            model_id: Some("smart-10y".to_string()),
            age: 0.064,
            male: 0.34,
            sbp: 0.02,
            total_cholesterol: 0.25,
            hdl: -0.25,
            smoker: 0.44,
            diabetes: 0.51,
            egfr_per_10: -0.2,
            log_crp: 0.25,
            vascular_bed: 0.4,
            baseline_survival: 0.900,
            linear_predictor_offset: 5.8,
            notes: None,
        }
    }
}

impl RiskCoefficients {
    /// Parse coefficients from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, crate::validate::ValidationError> {
        serde_json::from_str(json).map_err(|e| {
            crate::validate::ValidationError::ParseError(format!("Invalid JSON: {}", e))
        })
    }

    /// Model identifier for reporting.
    pub fn model_name(&self) -> &str {
        self.model_id.as_deref().unwrap_or("custom")
    }

    /// Covariate terms with the sign the published model gives them.
    pub fn covariate_terms(&self) -> [(&'static str, f64, EffectDirection); 10] {
        use EffectDirection::{Harmful, Protective};
        [
            ("age", self.age, Harmful),
            ("male", self.male, Harmful),
            ("sbp", self.sbp, Harmful),
            ("total_cholesterol", self.total_cholesterol, Harmful),
            ("hdl", self.hdl, Protective),
            ("smoker", self.smoker, Harmful),
            ("diabetes", self.diabetes, Harmful),
            ("egfr_per_10", self.egfr_per_10, Protective),
            ("log_crp", self.log_crp, Harmful),
            ("vascular_bed", self.vascular_bed, Harmful),
        ]
    }

    /// Every coefficient paired with its field name.
    pub fn named_values(&self) -> [(&'static str, f64); 12] {
        [
            ("age", self.age),
            ("male", self.male),
            ("sbp", self.sbp),
            ("total_cholesterol", self.total_cholesterol),
            ("hdl", self.hdl),
            ("smoker", self.smoker),
            ("diabetes", self.diabetes),
            ("egfr_per_10", self.egfr_per_10),
            ("log_crp", self.log_crp),
            ("vascular_bed", self.vascular_bed),
            ("baseline_survival", self.baseline_survival),
            ("linear_predictor_offset", self.linear_predictor_offset),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_coefficients() {
        let json = r#"{
            "schema_version": "1.0.0",
            "model_id": "smart-10y",
            "age": 0.064, "male": 0.34, "sbp": 0.02, "total_cholesterol": 0.25,
            "hdl": -0.25, "smoker": 0.44, "diabetes": 0.51, "egfr_per_10": -0.2,
            "log_crp": 0.25, "vascular_bed": 0.4,
            "baseline_survival": 0.9, "linear_predictor_offset": 5.8
        }"#;

        let coefficients = RiskCoefficients::parse_json(json).unwrap();
        assert_eq!(coefficients, RiskCoefficients::default());
        assert_eq!(coefficients.model_name(), "smart-10y");
    }

    #[test]
    fn test_missing_coefficient_rejected() {
        let json = r#"{"schema_version": "1.0.0", "age": 0.064}"#;
        assert!(RiskCoefficients::parse_json(json).is_err());
    }

    #[test]
    fn test_protective_terms_are_negative() {
        let coefficients = RiskCoefficients::default();
        assert!(coefficients.hdl < 0.0);
        assert!(coefficients.egfr_per_10 < 0.0);
    }
}
