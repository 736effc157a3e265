//! JSON Schema generation for input and output types.
//!
//! ```bash
//! cvd-core schema --list
//! cvd-core schema PatientProfile
//! cvd-core schema --all
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::assess::{Assessment, ClinicalFlag, ProfileSummary};
pub use crate::engine::{ReductionResult, ReductionStep};
pub use crate::risk_model::RiskEstimate;
pub use crate::therapy::{InjectableEligibility, LdlProjection};
pub use cvd_common::{Horizon, PatientProfile};
pub use cvd_config::{
    ConfigSnapshot, DrugRecord, InterventionRecord, ReductionPolicy, RiskCoefficients,
    TrialReference,
};

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Inputs
        ("PatientProfile", "Patient covariates for one computation"),
        ("Horizon", "Risk horizon (5yr, 10yr, lifetime)"),
        // Results
        ("RiskEstimate", "Baseline risk over every horizon"),
        ("LdlProjection", "Projected LDL under a therapy selection"),
        (
            "InjectableEligibility",
            "Whether injectable LDL therapy is indicated",
        ),
        ("ReductionStep", "One applied relative risk reduction"),
        ("ReductionResult", "Composed risk reduction for one horizon"),
        ("ClinicalFlag", "Condition surfaced next to a result"),
        ("ProfileSummary", "Patient details echoed with an assessment"),
        ("Assessment", "Full assessment of one patient"),
        // Reference data
        ("InterventionRecord", "Catalog intervention with ARR per horizon"),
        ("DrugRecord", "Lipid-lowering drug with LDL efficacy"),
        ("TrialReference", "Outcome trial backing an intervention"),
        // Configuration
        ("RiskCoefficients", "Risk model coefficients (coefficients.json)"),
        ("ReductionPolicy", "Reduction effect sizes (policy.json)"),
        ("ConfigSnapshot", "Configuration provenance embedded in output"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns `None` for unknown type names.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "PatientProfile" => schema_for!(PatientProfile),
        "Horizon" => schema_for!(Horizon),
        "RiskEstimate" => schema_for!(RiskEstimate),
        "LdlProjection" => schema_for!(LdlProjection),
        "InjectableEligibility" => schema_for!(InjectableEligibility),
        "ReductionStep" => schema_for!(ReductionStep),
        "ReductionResult" => schema_for!(ReductionResult),
        "ClinicalFlag" => schema_for!(ClinicalFlag),
        "ProfileSummary" => schema_for!(ProfileSummary),
        "Assessment" => schema_for!(Assessment),
        "InterventionRecord" => schema_for!(InterventionRecord),
        "DrugRecord" => schema_for!(DrugRecord),
        "TrialReference" => schema_for!(TrialReference),
        "RiskCoefficients" => schema_for!(RiskCoefficients),
        "ReductionPolicy" => schema_for!(ReductionPolicy),
        "ConfigSnapshot" => schema_for!(ConfigSnapshot),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|schema| (name.to_string(), schema)))
        .collect()
}

/// Schema output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

/// Format a schema value for output.
pub fn format_schema(schema: &Value, format: SchemaFormat) -> serde_json::Result<String> {
    match format {
        SchemaFormat::Json => serde_json::to_string_pretty(schema),
        SchemaFormat::JsonCompact => serde_json::to_string(schema),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_generate() {
        for (name, _desc) in available_schemas() {
            assert!(
                generate_schema(name).is_some(),
                "Schema for '{}' should generate",
                name
            );
        }
    }

    #[test]
    fn test_unknown_schema_returns_none() {
        assert!(generate_schema("Plan").is_none());
        assert!(generate_schema("").is_none());
    }

    #[test]
    fn test_profile_schema_lists_fields() {
        let schema = generate_schema("PatientProfile").unwrap();
        let properties = &schema["properties"];
        assert!(properties.get("age").is_some());
        assert!(properties.get("crp").is_some());
    }

    #[test]
    fn test_generate_all_schemas() {
        let all = generate_all_schemas();
        assert_eq!(all.len(), available_schemas().len());
        assert!(all.contains_key("Assessment"));
    }

    #[test]
    fn test_format_schema() {
        let schema = generate_schema("Horizon").unwrap();
        let pretty = format_schema(&schema, SchemaFormat::Json).unwrap();
        let compact = format_schema(&schema, SchemaFormat::JsonCompact).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));
    }
}
