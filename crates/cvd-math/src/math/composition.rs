//! Multiplicative composition of independent relative risk reductions.
//!
//! Each reduction acts on the risk that *remains* after the previous ones, so
//! reductions of `a%` and `b%` leave `(1 - a/100)(1 - b/100)` of the baseline,
//! never `1 - (a + b)/100`.

/// Relative risk reduction (percent) from a linear per-unit effect.
///
/// Non-positive or non-finite deltas contribute nothing; the result never
/// exceeds `cap`.
pub fn capped_linear_rrr(delta: f64, rrr_per_unit: f64, cap: f64) -> f64 {
    if !delta.is_finite() || delta <= 0.0 {
        return 0.0;
    }
    (rrr_per_unit * delta).min(cap).max(0.0)
}

/// Apply one relative reduction (percent, clamped to `[0, 100]`) to a remaining
/// probability.
pub fn apply_reduction(remaining: f64, rrr_percent: f64) -> f64 {
    remaining * (1.0 - rrr_percent.clamp(0.0, 100.0) / 100.0)
}

/// Fraction of the baseline left after applying `reductions` in order.
pub fn compose_reductions(reductions: &[f64]) -> f64 {
    reductions
        .iter()
        .fold(1.0, |remaining, rrr| apply_reduction(remaining, *rrr))
}

/// Running product of relative reductions over a baseline probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReductionChain {
    baseline: f64,
    remaining: f64,
}

impl ReductionChain {
    /// Start a chain at `baseline` (probability).
    pub fn new(baseline: f64) -> Self {
        Self {
            baseline,
            remaining: baseline,
        }
    }

    /// Apply a reduction and return the remaining probability after it.
    pub fn apply(&mut self, rrr_percent: f64) -> f64 {
        self.remaining = apply_reduction(self.remaining, rrr_percent);
        self.remaining
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Combined relative reduction so far, as a fraction. Zero for a zero baseline.
    pub fn combined_fraction(&self) -> f64 {
        if self.baseline <= 0.0 {
            0.0
        } else {
            1.0 - self.remaining / self.baseline
        }
    }
}
