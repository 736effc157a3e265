//! Fuzz target for policy.json parsing and validation.

#![no_main]

use cvd_config::validate::validate_policy;
use cvd_config::ReductionPolicy;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(policy) = serde_json::from_slice::<ReductionPolicy>(data) {
        if validate_policy(&policy).is_ok() {
            let _ = policy.input_bounds();
        }
    }
});
