//! CVD risk reference data and configuration.
//!
//! This crate provides:
//! - The static intervention catalog, drug-efficacy table and trial evidence
//! - Typed Rust structs for coefficients.json and policy.json
//! - Config resolution (CLI → env → XDG → /etc → defaults)
//! - Semantic validation
//! - Config snapshots for reproducible output

pub mod catalog;
pub mod coefficients;
pub mod evidence;
pub mod policy;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use catalog::{drug, drugs, DrugClass, DrugRecord, InterventionCatalog, InterventionRecord};
pub use coefficients::{EffectDirection, RiskCoefficients};
pub use evidence::{evidence_for, trials, TrialReference};
pub use policy::{ReductionPolicy, TitrationPolicy};
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use snapshot::{ConfigSnapshot, ConfigSummary};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
