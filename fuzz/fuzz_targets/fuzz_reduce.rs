//! Fuzz target for the reduction engine.
//!
//! Arbitrary numeric inputs and intervention names: the engine either
//! rejects them or returns a finite final risk no higher than the
//! rounded baseline.

#![no_main]

use arbitrary::Arbitrary;
use cvd_common::Horizon;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    baseline_risk: f64,
    interventions: Vec<String>,
    horizon: u8,
    ldl_baseline: f64,
    ldl_final: f64,
    sbp_current: f64,
    sbp_target: f64,
}

fuzz_target!(|input: Input| {
    let horizon = Horizon::ALL[usize::from(input.horizon) % Horizon::ALL.len()];
    if let Ok(result) = cvd_core::reduce(
        input.baseline_risk,
        &input.interventions,
        horizon,
        input.ldl_baseline,
        input.ldl_final,
        input.sbp_current,
        input.sbp_target,
    ) {
        assert!(result.final_risk.is_finite());
        // One-decimal rounding may lift the final risk by at most 0.05.
        assert!(result.final_risk <= input.baseline_risk + 0.05 + 1e-9);
    }
});
