//! Horizon conversion of a 10-year risk percentage.
//!
//! Both conversions cap the input at the modeling ceiling, assume a constant
//! hazard, and cap and round the output the same way.

use cvd_common::{InputBounds, Result};
use cvd_math::{
    cap_percent, five_year_probability, lifetime_probability, percent_to_prob, prob_to_percent,
    MAX_MODELED_RISK,
};

fn checked_p10(risk_10yr: f64) -> Result<f64> {
    InputBounds::default()
        .risk_percent
        .check("risk_10yr", risk_10yr)?;
    Ok(percent_to_prob(risk_10yr.min(MAX_MODELED_RISK)))
}

/// 5-year risk (percent) from a 10-year risk (percent).
pub fn convert_5yr(risk_10yr: f64) -> Result<f64> {
    let p10 = checked_p10(risk_10yr)?;
    Ok(cap_percent(prob_to_percent(five_year_probability(p10))))
}

/// Risk from `age` until 85 (percent) from a 10-year risk (percent).
///
/// Zero at or beyond age 85.
pub fn convert_lifetime(age: u32, risk_10yr: f64) -> Result<f64> {
    InputBounds::default().age.check("age", f64::from(age))?;
    let p10 = checked_p10(risk_10yr)?;
    Ok(cap_percent(prob_to_percent(lifetime_probability(age, p10))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvd_common::Error;

    #[test]
    fn test_five_year_from_worked_example() {
        assert_eq!(convert_5yr(33.5).unwrap(), 18.5);
    }

    #[test]
    fn test_lifetime_from_worked_example() {
        assert_eq!(convert_lifetime(60, 33.5).unwrap(), 63.9);
    }

    #[test]
    fn test_lifetime_zero_beyond_horizon_age() {
        assert_eq!(convert_lifetime(85, 40.0).unwrap(), 0.0);
        assert_eq!(convert_lifetime(90, 40.0).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_risk_stays_zero() {
        assert_eq!(convert_5yr(0.0).unwrap(), 0.0);
        assert_eq!(convert_lifetime(40, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_input_above_ceiling_is_capped_first() {
        assert_eq!(convert_5yr(100.0).unwrap(), convert_5yr(95.0).unwrap());
        assert_eq!(convert_lifetime(60, 100.0).unwrap(), convert_lifetime(60, 95.0).unwrap());
    }

    #[test]
    fn test_lifetime_output_capped() {
        assert_eq!(convert_lifetime(30, 90.0).unwrap(), MAX_MODELED_RISK);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            convert_5yr(-1.0),
            Err(Error::OutOfRange {
                field: "risk_10yr",
                ..
            })
        ));
        assert!(matches!(
            convert_5yr(f64::NAN),
            Err(Error::NonFinite { .. })
        ));
        assert!(convert_lifetime(20, 10.0).is_err());
    }
}
