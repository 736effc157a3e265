//! Exit codes for the cvd-core CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing and
//! are a stable contract for automation.
//!
//! Exit code ranges:
//! - 0-1: Completed (1 means the result carries clinical flags)
//! - 10-19: User errors (fixable by changing arguments, inputs or config)
//! - 20-29: Internal errors

use cvd_common::{Error, ErrorCategory};

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Result produced, nothing to flag
    Clean = 0,

    /// Result produced with at least one clinical flag
    Flagged = 1,

    /// Invalid command-line arguments
    ArgsError = 10,

    /// Patient input outside the supported bounds
    InputError = 11,

    /// Inconsistent therapy selection
    TherapyError = 12,

    /// Invalid or unreadable configuration
    ConfigError = 13,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// A result was produced (codes 0-1).
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean | ExitCode::Flagged)
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Name used in JSON error envelopes.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::Flagged => "OK_FLAGGED",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::TherapyError => "ERR_THERAPY",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Clean or flagged, depending on whether anything was flagged.
    pub fn for_flags(flagged: bool) -> Self {
        if flagged {
            ExitCode::Flagged
        } else {
            ExitCode::Clean
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Input => ExitCode::InputError,
            ErrorCategory::Therapy => ExitCode::TherapyError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::IoError { .. } => ExitCode::IoError,
            _ => ExitCode::ConfigError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert!(ExitCode::Flagged.is_success());
        assert!(!ExitCode::ArgsError.is_success());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
        assert!(!ExitCode::TherapyError.is_internal_error());
    }

    #[test]
    fn test_error_mapping() {
        let err = Error::out_of_range("age", 25.0, 30.0, 90.0);
        assert_eq!(ExitCode::from(&err), ExitCode::InputError);

        let err = Error::TherapyConflict {
            drug: "Ezetimibe 10 mg".to_string(),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::TherapyError);

        let err = ConfigError::NotFound {
            path: "/missing.json".into(),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::ConfigError);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::Flagged.to_string(), "OK_FLAGGED (1)");
        assert_eq!(i32::from(ExitCode::InputError), 11);
        assert_eq!(ExitCode::for_flags(false), ExitCode::Clean);
    }
}
