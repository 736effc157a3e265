//! Patient profile and clinical input bounds.
//!
//! A [`PatientProfile`] is built once per computation and never mutated. The
//! core validates it against [`InputBounds`] before use and fails with a
//! descriptive error instead of clamping inputs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// hs-CRP above this value (mg/L) suggests acute inflammation.
pub const ACUTE_INFLAMMATION_CRP: f64 = 10.0;

/// Biological sex as used by the risk model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    pub fn is_male(&self) -> bool {
        matches!(self, Sex::Male)
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(format!("unknown sex: {}", s)),
        }
    }
}

/// Established vascular disease, one flag per vascular bed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct VascularHistory {
    #[serde(default)]
    pub coronary: bool,
    #[serde(default)]
    pub cerebrovascular: bool,
    #[serde(default)]
    pub peripheral: bool,
}

impl VascularHistory {
    /// Number of affected vascular beds (0-3).
    pub fn count(&self) -> u8 {
        [self.coronary, self.cerebrovascular, self.peripheral]
            .iter()
            .filter(|b| **b)
            .count() as u8
    }
}

/// Closed numeric interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Check a named value, rejecting non-finite and out-of-range inputs.
    pub fn check(&self, field: &'static str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::NonFinite { field });
        }
        if !self.contains(value) {
            return Err(Error::out_of_range(field, value, self.min, self.max));
        }
        Ok(())
    }
}

/// Accepted systolic blood pressure window.
///
/// Two variants of the entry form existed; `Standard` is canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SbpRange {
    /// 80-220 mmHg.
    #[default]
    Standard,
    /// 90-200 mmHg.
    Tabbed,
}

impl SbpRange {
    pub fn range(&self) -> Range {
        match self {
            SbpRange::Standard => Range::new(80.0, 220.0),
            SbpRange::Tabbed => Range::new(90.0, 200.0),
        }
    }
}

impl std::fmt::Display for SbpRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SbpRange::Standard => write!(f, "standard"),
            SbpRange::Tabbed => write!(f, "tabbed"),
        }
    }
}

/// Clinical bounds for every numeric input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InputBounds {
    pub age: Range,
    pub sbp: Range,
    pub total_cholesterol: Range,
    pub hdl: Range,
    pub ldl: Range,
    pub triglycerides: Range,
    pub hba1c: Range,
    pub crp: Range,
    pub egfr: Range,
    pub weight_kg: Range,
    pub height_cm: Range,
    pub risk_percent: Range,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self::for_sbp_range(SbpRange::Standard)
    }
}

impl InputBounds {
    pub fn for_sbp_range(sbp: SbpRange) -> Self {
        Self {
            age: Range::new(30.0, 90.0),
            sbp: sbp.range(),
            total_cholesterol: Range::new(2.0, 10.0),
            hdl: Range::new(0.5, 3.0),
            ldl: Range::new(0.5, 6.0),
            triglycerides: Range::new(0.3, 5.0),
            hba1c: Range::new(4.0, 14.0),
            crp: Range::new(0.1, 20.0),
            egfr: Range::new(15.0, 120.0),
            weight_kg: Range::new(40.0, 200.0),
            height_cm: Range::new(140.0, 210.0),
            risk_percent: Range::new(0.0, 100.0),
        }
    }
}

/// Patient covariates for one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PatientProfile {
    /// Age in whole years (30-90).
    pub age: u32,
    pub sex: Sex,
    /// Current systolic blood pressure (mmHg).
    pub sbp: f64,
    /// Target systolic blood pressure (mmHg). Defaults to the current value.
    #[serde(default)]
    pub sbp_target: Option<f64>,
    /// Total cholesterol (mmol/L).
    pub total_cholesterol: f64,
    /// HDL-C (mmol/L).
    pub hdl: f64,
    /// Baseline LDL-C (mmol/L).
    pub ldl: f64,
    /// Triglycerides (mmol/L).
    pub triglycerides: f64,
    /// HbA1c (%).
    pub hba1c: f64,
    #[serde(default)]
    pub smoker: bool,
    #[serde(default)]
    pub diabetes: bool,
    /// eGFR (mL/min/1.73m²).
    pub egfr: f64,
    /// hs-CRP (mg/L).
    pub crp: f64,
    #[serde(default)]
    pub vascular: VascularHistory,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
}

impl Default for PatientProfile {
    fn default() -> Self {
        Self {
            age: 60,
            sex: Sex::Male,
            sbp: 140.0,
            sbp_target: None,
            total_cholesterol: 5.2,
            hdl: 1.3,
            ldl: 3.0,
            triglycerides: 1.2,
            hba1c: 7.0,
            smoker: false,
            diabetes: false,
            egfr: 90.0,
            crp: 2.5,
            vascular: VascularHistory::default(),
            weight_kg: None,
            height_cm: None,
        }
    }
}

impl PatientProfile {
    /// Validate every field against `bounds`, reporting the first violation.
    pub fn validate(&self, bounds: &InputBounds) -> Result<()> {
        bounds.age.check("age", f64::from(self.age))?;
        bounds.sbp.check("sbp", self.sbp)?;
        if let Some(target) = self.sbp_target {
            bounds.sbp.check("sbp_target", target)?;
        }
        bounds
            .total_cholesterol
            .check("total_cholesterol", self.total_cholesterol)?;
        bounds.hdl.check("hdl", self.hdl)?;
        bounds.ldl.check("ldl", self.ldl)?;
        bounds.triglycerides.check("triglycerides", self.triglycerides)?;
        bounds.hba1c.check("hba1c", self.hba1c)?;
        bounds.egfr.check("egfr", self.egfr)?;
        bounds.crp.check("crp", self.crp)?;
        if let Some(weight) = self.weight_kg {
            bounds.weight_kg.check("weight_kg", weight)?;
        }
        if let Some(height) = self.height_cm {
            bounds.height_cm.check("height_cm", height)?;
        }
        Ok(())
    }

    pub fn vascular_count(&self) -> u8 {
        self.vascular.count()
    }

    /// Target SBP, falling back to the current reading.
    pub fn effective_sbp_target(&self) -> f64 {
        self.sbp_target.unwrap_or(self.sbp)
    }

    /// Body-mass index (kg/m²), when weight and height are both known.
    pub fn bmi(&self) -> Option<f64> {
        match (self.weight_kg, self.height_cm) {
            (Some(weight), Some(height)) if height > 0.0 => {
                let metres = height / 100.0;
                Some(weight / (metres * metres))
            }
            _ => None,
        }
    }

    /// hs-CRP high enough to suggest acute inflammation.
    pub fn has_acute_inflammation(&self) -> bool {
        self.crp > ACUTE_INFLAMMATION_CRP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        let profile = PatientProfile::default();
        assert!(profile.validate(&InputBounds::default()).is_ok());
    }

    #[test]
    fn test_age_out_of_range() {
        let profile = PatientProfile {
            age: 25,
            ..Default::default()
        };
        let err = profile.validate(&InputBounds::default()).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { field: "age", .. }));
    }

    #[test]
    fn test_nan_rejected() {
        let profile = PatientProfile {
            hdl: f64::NAN,
            ..Default::default()
        };
        let err = profile.validate(&InputBounds::default()).unwrap_err();
        assert!(matches!(err, Error::NonFinite { field: "hdl" }));
    }

    #[test]
    fn test_sbp_range_variants() {
        let profile = PatientProfile {
            sbp: 85.0,
            ..Default::default()
        };
        assert!(profile.validate(&InputBounds::default()).is_ok());
        assert!(profile
            .validate(&InputBounds::for_sbp_range(SbpRange::Tabbed))
            .is_err());
    }

    #[test]
    fn test_sbp_target_checked() {
        let profile = PatientProfile {
            sbp_target: Some(60.0),
            ..Default::default()
        };
        let err = profile.validate(&InputBounds::default()).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { field: "sbp_target", .. }));
    }

    #[test]
    fn test_vascular_count() {
        let vascular = VascularHistory {
            coronary: true,
            cerebrovascular: false,
            peripheral: true,
        };
        assert_eq!(vascular.count(), 2);
        assert_eq!(VascularHistory::default().count(), 0);
    }

    #[test]
    fn test_bmi() {
        let profile = PatientProfile {
            weight_kg: Some(75.0),
            height_cm: Some(170.0),
            ..Default::default()
        };
        let bmi = profile.bmi().unwrap();
        assert!((bmi - 25.95).abs() < 0.01);
        assert!(PatientProfile::default().bmi().is_none());
    }

    #[test]
    fn test_acute_inflammation_flag() {
        let profile = PatientProfile {
            crp: 12.0,
            ..Default::default()
        };
        assert!(profile.has_acute_inflammation());
        assert!(!PatientProfile::default().has_acute_inflammation());
    }

    #[test]
    fn test_profile_json_defaults() {
        let json = r#"{
            "age": 60, "sex": "Female", "sbp": 145.0, "total_cholesterol": 5.0,
            "hdl": 1.0, "ldl": 3.2, "triglycerides": 1.4, "hba1c": 6.1,
            "egfr": 80.0, "crp": 2.0
        }"#;
        let profile: PatientProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.sex, Sex::Female);
        assert!(!profile.smoker);
        assert_eq!(profile.vascular_count(), 0);
        assert_eq!(profile.effective_sbp_target(), 145.0);
    }
}
