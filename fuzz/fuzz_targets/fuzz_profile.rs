//! Fuzz target for patient profile JSON.
//!
//! Parses arbitrary bytes as a profile and runs every accepted profile
//! through the full risk estimate. Out-of-range values must surface as
//! errors, never as panics or non-finite risks.

#![no_main]

use cvd_common::PatientProfile;
use cvd_core::RiskModel;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(profile) = serde_json::from_slice::<PatientProfile>(data) else {
        return;
    };
    if let Ok(estimate) = RiskModel::default().estimate(&profile) {
        for risk in [estimate.risk_5yr, estimate.risk_10yr, estimate.risk_lifetime] {
            assert!((0.0..=95.0).contains(&risk), "risk out of range: {}", risk);
        }
    }
});
