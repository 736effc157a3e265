//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::coefficients::{EffectDirection, RiskCoefficients};
use crate::policy::ReductionPolicy;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::ParseError(_) => 31,
            ValidationError::SemanticError(_) => 32,
            ValidationError::InvalidValue { .. } => 33,
            ValidationError::VersionMismatch { .. } => 34,
        }
    }
}

fn check_version(actual: &str) -> ValidationResult<()> {
    if actual != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

fn check_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be finite, got {}", value),
        });
    }
    Ok(())
}

fn check_percent(field: &str, value: f64) -> ValidationResult<()> {
    check_finite(field, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in [0, 100], got {}", value),
        });
    }
    Ok(())
}

fn check_sign(field: &str, value: f64, direction: EffectDirection) -> ValidationResult<()> {
    let ok = match direction {
        EffectDirection::Harmful => value >= 0.0,
        EffectDirection::Protective => value <= 0.0,
    };
    if !ok {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be {}, got {}", direction.requirement(), value),
        });
    }
    Ok(())
}

/// Validate risk coefficients semantically.
///
/// Besides finiteness, every covariate term must keep the direction of the
/// published model so that risk never falls as a risk factor worsens.
pub fn validate_coefficients(coefficients: &RiskCoefficients) -> ValidationResult<()> {
    check_version(&coefficients.schema_version)?;

    for (field, value) in coefficients.named_values() {
        check_finite(field, value)?;
    }

    for (field, value, direction) in coefficients.covariate_terms() {
        check_sign(field, value, direction)?;
    }

    let s0 = coefficients.baseline_survival;
    if s0 <= 0.0 || s0 >= 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "baseline_survival".to_string(),
            message: format!("Must be in (0, 1), got {}", s0),
        });
    }

    Ok(())
}

/// Validate reduction policy semantically.
pub fn validate_policy(policy: &ReductionPolicy) -> ValidationResult<()> {
    check_version(&policy.schema_version)?;

    check_percent("ldl_rrr_per_mmol", policy.ldl_rrr_per_mmol)?;
    check_percent("ldl_rrr_cap", policy.ldl_rrr_cap)?;
    check_percent("bp_rrr_per_10_mmhg", policy.bp_rrr_per_10_mmhg)?;
    check_percent("bp_rrr_cap", policy.bp_rrr_cap)?;

    if policy.ldl_rrr_cap > 0.0 && policy.ldl_rrr_per_mmol == 0.0 {
        return Err(ValidationError::SemanticError(
            "ldl_rrr_cap is set but ldl_rrr_per_mmol is 0; the cap can never be reached"
                .to_string(),
        ));
    }

    let threshold = policy.injectable_ldl_threshold;
    check_finite("injectable_ldl_threshold", threshold)?;
    let ldl = policy.input_bounds().ldl;
    if !ldl.contains(threshold) {
        return Err(ValidationError::InvalidValue {
            field: "injectable_ldl_threshold".to_string(),
            message: format!(
                "Must be within the LDL range [{}, {}], got {}",
                ldl.min, ldl.max, threshold
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_term(coefficients: &mut RiskCoefficients, field: &str, value: f64) {
        let slot = match field {
            "age" => &mut coefficients.age,
            "male" => &mut coefficients.male,
            "sbp" => &mut coefficients.sbp,
            "total_cholesterol" => &mut coefficients.total_cholesterol,
            "hdl" => &mut coefficients.hdl,
            "smoker" => &mut coefficients.smoker,
            "diabetes" => &mut coefficients.diabetes,
            "egfr_per_10" => &mut coefficients.egfr_per_10,
            "log_crp" => &mut coefficients.log_crp,
            "vascular_bed" => &mut coefficients.vascular_bed,
            other => panic!("unknown term {other}"),
        };
        *slot = value;
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_coefficients(&RiskCoefficients::default()).is_ok());
        assert!(validate_policy(&ReductionPolicy::default()).is_ok());
    }

    #[test]
    fn test_version_mismatch() {
        let coefficients = RiskCoefficients {
            schema_version: "0.9.0".to_string(),
            ..Default::default()
        };
        let err = validate_coefficients(&coefficients).unwrap_err();
        assert!(matches!(err, ValidationError::VersionMismatch { .. }));
        assert_eq!(err.code(), 34);
    }

    #[test]
    fn test_survival_bounds() {
        for s0 in [0.0, 1.0, 1.5] {
            let coefficients = RiskCoefficients {
                baseline_survival: s0,
                ..Default::default()
            };
            assert!(validate_coefficients(&coefficients).is_err(), "{}", s0);
        }
    }

    #[test]
    fn test_non_finite_coefficient() {
        let coefficients = RiskCoefficients {
            sbp: f64::INFINITY,
            ..Default::default()
        };
        match validate_coefficients(&coefficients).unwrap_err() {
            ValidationError::InvalidValue { field, .. } => assert_eq!(field, "sbp"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reversed_age_term_rejected() {
        let coefficients = RiskCoefficients {
            age: -0.064,
            ..Default::default()
        };
        let err = validate_coefficients(&coefficients).unwrap_err();
        assert_eq!(err.code(), 33);
        match err {
            ValidationError::InvalidValue { field, message } => {
                assert_eq!(field, "age");
                assert!(message.contains(">= 0"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_every_term_direction_enforced() {
        let defaults = RiskCoefficients::default();
        for (field, value, _) in defaults.covariate_terms() {
            let mut flipped = defaults.clone();
            set_term(&mut flipped, field, -value - 0.1);
            match validate_coefficients(&flipped) {
                Err(ValidationError::InvalidValue { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{field}: expected InvalidValue, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_zero_terms_allowed() {
        let coefficients = RiskCoefficients {
            log_crp: 0.0,
            egfr_per_10: 0.0,
            ..Default::default()
        };
        assert!(validate_coefficients(&coefficients).is_ok());
    }

    #[test]
    fn test_policy_cap_range() {
        let policy = ReductionPolicy {
            bp_rrr_cap: 120.0,
            ..Default::default()
        };
        assert!(validate_policy(&policy).is_err());
    }

    #[test]
    fn test_unreachable_ldl_cap() {
        let policy = ReductionPolicy {
            ldl_rrr_per_mmol: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            validate_policy(&policy),
            Err(ValidationError::SemanticError(_))
        ));
    }

    #[test]
    fn test_injectable_threshold_in_ldl_range() {
        let policy = ReductionPolicy {
            injectable_ldl_threshold: 0.2,
            ..Default::default()
        };
        assert!(validate_policy(&policy).is_err());
    }
}
