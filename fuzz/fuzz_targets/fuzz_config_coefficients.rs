//! Fuzz target for coefficients.json parsing and validation.

#![no_main]

use cvd_config::validate::validate_coefficients;
use cvd_config::RiskCoefficients;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(coefficients) = serde_json::from_slice::<RiskCoefficients>(data) {
        let _ = validate_coefficients(&coefficients);
    }
});
