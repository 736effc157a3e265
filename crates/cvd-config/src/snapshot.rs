//! Configuration snapshots for reproducible output.
//!
//! A snapshot records which coefficients and policy produced a result, so an
//! assessment can be traced back to the exact configuration files.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::policy::{ReductionPolicy, TitrationPolicy};
use crate::resolve::{ConfigPaths, ConfigSource};
use crate::RiskCoefficients;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConfigSnapshot {
    pub timestamp: DateTime<Utc>,

    pub schema_version: String,

    /// SHA-256 of the coefficients file content.
    #[serde(default)]
    pub coefficients_hash: Option<String>,

    #[serde(default)]
    pub coefficients_path: Option<String>,

    pub coefficients_source: String,

    /// SHA-256 of the policy file content.
    #[serde(default)]
    pub policy_hash: Option<String>,

    #[serde(default)]
    pub policy_path: Option<String>,

    pub policy_source: String,

    /// Combined hash of all config files (for quick comparison).
    pub combined_hash: String,

    pub summary: ConfigSummary,
}

/// Key configuration values for quick reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigSummary {
    pub model: String,
    pub baseline_survival: f64,
    pub titration: TitrationPolicy,
    pub sbp_range: String,
    pub ldl_rrr_per_mmol: f64,
    pub ldl_rrr_cap: f64,
    pub bp_rrr_per_10_mmhg: f64,
    pub bp_rrr_cap: f64,
    pub injectable_ldl_threshold: f64,
}

impl ConfigSummary {
    pub fn from_config(coefficients: &RiskCoefficients, policy: &ReductionPolicy) -> Self {
        ConfigSummary {
            model: coefficients.model_name().to_string(),
            baseline_survival: coefficients.baseline_survival,
            titration: policy.titration,
            sbp_range: policy.sbp_range.to_string(),
            ldl_rrr_per_mmol: policy.ldl_rrr_per_mmol,
            ldl_rrr_cap: policy.ldl_rrr_cap,
            bp_rrr_per_10_mmhg: policy.bp_rrr_per_10_mmhg,
            bp_rrr_cap: policy.bp_rrr_cap,
            injectable_ldl_threshold: policy.injectable_ldl_threshold,
        }
    }
}

impl ConfigSnapshot {
    /// Create a snapshot from loaded configuration and the raw file contents.
    pub fn new(
        coefficients: &RiskCoefficients,
        policy: &ReductionPolicy,
        paths: &ConfigPaths,
        coefficients_json: Option<&str>,
        policy_json: Option<&str>,
    ) -> Self {
        let coefficients_hash = coefficients_json.map(hash_content);
        let policy_hash = policy_json.map(hash_content);

        let combined = format!(
            "{}:{}",
            coefficients_hash.as_deref().unwrap_or("none"),
            policy_hash.as_deref().unwrap_or("none")
        );

        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            coefficients_hash,
            coefficients_path: paths.coefficients.as_ref().map(|p| p.display().to_string()),
            coefficients_source: paths.coefficients_source.to_string(),
            policy_hash,
            policy_path: paths.policy.as_ref().map(|p| p.display().to_string()),
            policy_source: paths.policy_source.to_string(),
            combined_hash: hash_content(&combined),
            summary: ConfigSummary::from_config(coefficients, policy),
        }
    }

    /// Snapshot with only built-in defaults (no config files loaded).
    pub fn defaults_only() -> Self {
        let paths = ConfigPaths {
            coefficients_source: ConfigSource::BuiltinDefault,
            policy_source: ConfigSource::BuiltinDefault,
            ..Default::default()
        };
        Self::new(
            &RiskCoefficients::default(),
            &ReductionPolicy::default(),
            &paths,
            None,
            None,
        )
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same config files).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.combined_hash == other.combined_hash
    }

    /// Short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.combined_hash[..12.min(self.combined_hash.len())]
    }
}

/// Hash content with SHA-256 and return hex string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
