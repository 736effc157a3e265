//! Error types for CVD risk computations.
//!
//! Every error carries:
//! - A stable numeric code for machine parsing
//! - A category for grouping
//! - A remediation hint for humans
//!
//! Errors serialize to structured JSON for agent-facing output:
//! ```json
//! {
//!   "code": 10,
//!   "category": "input",
//!   "message": "age = 25 is outside the supported range [30, 90]",
//!   "hint": "Correct the value so it lies inside the clinical bound"
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for CVD risk operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Patient covariates or numeric arguments outside their bounds.
    Input,
    /// Inconsistent lipid-lowering therapy selections.
    Therapy,
    /// Configuration file errors (coefficients, policy).
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Therapy => write!(f, "therapy"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("{field} = {value} is outside the supported range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("invalid patient profile: {0}")]
    InvalidProfile(String),

    // Therapy errors (20-29)
    #[error("{drug} is listed as both pre-existing and newly added therapy")]
    TherapyConflict { drug: String },

    #[error("{drug} is listed more than once in the {set} therapy set")]
    DuplicateTherapy { drug: String, set: &'static str },

    #[error("only one statin may be selected in the {set} therapy set (got {first} and {second})")]
    MultipleStatins {
        set: &'static str,
        first: String,
        second: String,
    },

    // Configuration errors (30-39)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code.
    ///
    /// - 10-19: Input errors
    /// - 20-29: Therapy selection errors
    /// - 30-39: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::OutOfRange { .. } => 10,
            Error::NonFinite { .. } => 11,
            Error::InvalidProfile(_) => 12,
            Error::TherapyConflict { .. } => 20,
            Error::DuplicateTherapy { .. } => 21,
            Error::MultipleStatins { .. } => 22,
            Error::Config(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            10..=19 => ErrorCategory::Input,
            20..=29 => ErrorCategory::Therapy,
            30..=39 => ErrorCategory::Config,
            _ => ErrorCategory::Io,
        }
    }

    /// Short remediation hint for humans.
    pub fn hint(&self) -> &'static str {
        match self {
            Error::OutOfRange { .. } => "Correct the value so it lies inside the clinical bound",
            Error::NonFinite { .. } => "Provide a numeric value",
            Error::InvalidProfile(_) => "Check the profile fields against the profile schema",
            Error::TherapyConflict { .. } => {
                "List each drug either as pre-existing or as newly added, not both"
            }
            Error::DuplicateTherapy { .. } => "Remove the repeated drug",
            Error::MultipleStatins { .. } => "Select a single statin per therapy set",
            Error::Config(_) => "Run 'cvd-core check' to validate configuration",
            Error::Io(_) => "Check the file path and permissions",
            Error::Json(_) => "Check that the input is valid JSON",
        }
    }

    /// Structured form for machine-readable output.
    pub fn to_structured(&self) -> StructuredError {
        StructuredError {
            code: self.code(),
            category: self.category(),
            message: self.to_string(),
            hint: self.hint().to_string(),
        }
    }

    /// Build an out-of-range error.
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Error::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }
}

/// Serializable error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub hint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_by_category() {
        let err = Error::out_of_range("age", 25.0, 30.0, 90.0);
        assert_eq!(err.code(), 10);
        assert_eq!(err.category(), ErrorCategory::Input);

        let err = Error::TherapyConflict {
            drug: "Ezetimibe 10 mg".to_string(),
        };
        assert_eq!(err.code(), 20);
        assert_eq!(err.category(), ErrorCategory::Therapy);

        let err = Error::Config("bad".to_string());
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_out_of_range_message() {
        let err = Error::out_of_range("age", 25.0, 30.0, 90.0);
        assert_eq!(
            err.to_string(),
            "age = 25 is outside the supported range [30, 90]"
        );
    }

    #[test]
    fn test_structured_serialization() {
        let err = Error::NonFinite { field: "hdl" };
        let json = serde_json::to_value(err.to_structured()).unwrap();
        assert_eq!(json["code"], 11);
        assert_eq!(json["category"], "input");
        assert_eq!(json["message"], "hdl must be a finite number");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert_eq!(err.category(), ErrorCategory::Io);
    }
}
