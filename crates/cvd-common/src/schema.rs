//! Versioning of machine-readable output.

/// Schema version stamped on every JSON payload.
pub const SCHEMA_VERSION: &str = "1.0.0";
