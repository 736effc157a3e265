//! Rounding and capping rules for risk percentages.

/// Ceiling for every modeled risk percentage.
///
/// The risk model saturates well before 100%; anything above this is clamped,
/// never extrapolated.
pub const MAX_MODELED_RISK: f64 = 95.0;

/// Round to `decimals` places, half away from zero.
///
/// Negative zero is normalised to `0.0` so that a zero difference never prints
/// as `-0.0`. Non-finite inputs are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

/// Cap a percentage at [`MAX_MODELED_RISK`] and round to one decimal.
pub fn cap_percent(percent: f64) -> f64 {
    round1(percent.min(MAX_MODELED_RISK))
}

/// Percentage (0-100) to probability (0-1).
pub fn percent_to_prob(percent: f64) -> f64 {
    percent / 100.0
}

/// Probability (0-1) to percentage (0-100).
pub fn prob_to_percent(prob: f64) -> f64 {
    prob * 100.0
}
