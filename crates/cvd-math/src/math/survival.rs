//! Constant-hazard conversions between risk horizons.
//!
//! All functions work on event probabilities in `[0, 1]`. Under a constant
//! hazard, survival over `t` years is `S(t) = S(1)^t`, so a risk known over one
//! horizon can be rescaled to any other:
//!
//! ```text
//! p(t2) = 1 - (1 - p(t1))^(t2 / t1)
//! ```

/// Horizon of the underlying risk model, in years.
pub const REFERENCE_HORIZON_YEARS: f64 = 10.0;

/// Age at which the lifetime horizon ends.
pub const LIFETIME_HORIZON_AGE: u32 = 85;

/// Rescale an event probability from `from_years` to `to_years`.
///
/// Probabilities are clamped to `[0, 1]`. A non-positive target horizon yields 0;
/// a non-positive source horizon is undefined and yields NaN.
pub fn rescale_probability(p: f64, from_years: f64, to_years: f64) -> f64 {
    if p.is_nan() || from_years <= 0.0 {
        return f64::NAN;
    }
    if to_years <= 0.0 {
        return 0.0;
    }
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powf(to_years / from_years)
}

/// Annual hazard implied by a 10-year event probability.
pub fn annual_hazard(p10: f64) -> f64 {
    rescale_probability(p10, REFERENCE_HORIZON_YEARS, 1.0)
}

/// 5-year event probability from a 10-year one.
///
/// 5-year survival is the square root of 10-year survival.
pub fn five_year_probability(p10: f64) -> f64 {
    rescale_probability(p10, REFERENCE_HORIZON_YEARS, 5.0)
}

/// Years remaining until [`LIFETIME_HORIZON_AGE`], never negative.
pub fn years_to_lifetime_horizon(age: u32) -> u32 {
    LIFETIME_HORIZON_AGE.saturating_sub(age)
}

/// Event probability from `age` until [`LIFETIME_HORIZON_AGE`].
///
/// Compounds the annual hazard over the remaining years; 0 once the horizon age
/// is reached.
pub fn lifetime_probability(age: u32, p10: f64) -> f64 {
    let years = years_to_lifetime_horizon(age);
    if years == 0 {
        return 0.0;
    }
    let annual = annual_hazard(p10);
    1.0 - (1.0 - annual).powi(years as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn five_year_is_square_root_of_survival() {
        let p5 = five_year_probability(0.335);
        assert!(approx_eq(p5, 1.0 - 0.665f64.sqrt(), 1e-12));
    }

    #[test]
    fn annual_hazard_compounds_back_to_ten_years() {
        let h = annual_hazard(0.2);
        let p10 = 1.0 - (1.0 - h).powi(10);
        assert!(approx_eq(p10, 0.2, 1e-12));
    }

    #[test]
    fn lifetime_matches_hand_computation() {
        let p = lifetime_probability(60, 0.335);
        assert!(approx_eq(p, 0.639376, 1e-5));
    }

    #[test]
    fn lifetime_is_zero_at_or_beyond_horizon_age() {
        assert_eq!(lifetime_probability(85, 0.5), 0.0);
        assert_eq!(lifetime_probability(90, 0.5), 0.0);
    }

    #[test]
    fn lifetime_at_75_equals_ten_year() {
        let p = lifetime_probability(75, 0.3);
        assert!(approx_eq(p, 0.3, 1e-12));
    }

    #[test]
    fn rescale_edge_cases() {
        assert_eq!(rescale_probability(0.0, 10.0, 5.0), 0.0);
        assert_eq!(rescale_probability(1.0, 10.0, 5.0), 1.0);
        assert_eq!(rescale_probability(0.4, 10.0, 0.0), 0.0);
        assert!(rescale_probability(0.4, 0.0, 5.0).is_nan());
        assert!(rescale_probability(f64::NAN, 10.0, 5.0).is_nan());
    }

    #[test]
    fn years_to_horizon_saturates() {
        assert_eq!(years_to_lifetime_horizon(30), 55);
        assert_eq!(years_to_lifetime_horizon(85), 0);
        assert_eq!(years_to_lifetime_horizon(90), 0);
    }
}
