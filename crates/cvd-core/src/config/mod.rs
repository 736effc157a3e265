//! Configuration loading and validation for cvd-core.
//!
//! This module handles:
//! - Loading coefficients.json and policy.json
//! - Resolution order (CLI > env > XDG > /etc > defaults)
//! - Semantic validation
//! - Config snapshots embedded in assessment output

pub use cvd_config::validate::ValidationError;
pub use cvd_config::{
    ConfigPaths, ConfigSnapshot, ConfigSource, ReductionPolicy, RiskCoefficients,
    TitrationPolicy,
};

use cvd_config::validate::{validate_coefficients, validate_policy};
use cvd_config::{resolve_config, InterventionCatalog};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::engine::ReductionEngine;
use crate::logging::event_names;
use crate::risk_model::RiskModel;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Validation failed for {path}: {source}")]
    ValidationError {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Stable error code for structured output.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::NotFound { .. } => 35,
            ConfigError::ValidationError { source, .. } => source.code(),
            ConfigError::IoError { .. } => 60,
        }
    }
}

/// Configuration resolution options.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// Directory searched for both files before the environment.
    pub config_dir: Option<PathBuf>,
    pub coefficients_path: Option<PathBuf>,
    pub policy_path: Option<PathBuf>,
}

/// Loaded configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub coefficients: RiskCoefficients,
    pub policy: ReductionPolicy,
    pub paths: ConfigPaths,
    pub snapshot: ConfigSnapshot,
}

impl ResolvedConfig {
    /// Built-in coefficients and policy, no files.
    pub fn defaults() -> Self {
        Self {
            coefficients: RiskCoefficients::default(),
            policy: ReductionPolicy::default(),
            paths: ConfigPaths::default(),
            snapshot: ConfigSnapshot::defaults_only(),
        }
    }

    pub fn risk_model(&self) -> RiskModel {
        RiskModel::new(self.coefficients.clone(), self.policy.input_bounds())
    }

    pub fn engine(&self) -> ReductionEngine {
        ReductionEngine::new(InterventionCatalog::builtin(), self.policy.clone())
    }
}

/// Load configuration with the standard resolution order.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let paths = resolve_config(
        options.config_dir.as_deref(),
        options.coefficients_path.as_deref(),
        options.policy_path.as_deref(),
    );

    let (coefficients, coefficients_json) = match &paths.coefficients {
        Some(path) => {
            let raw = read_file(path)?;
            let value = RiskCoefficients::parse_json(&raw)
                .and_then(|value| validate_coefficients(&value).map(|()| value))
                .map_err(|source| ConfigError::ValidationError {
                    path: path.clone(),
                    source,
                })?;
            (value, Some(raw))
        }
        None => (RiskCoefficients::default(), None),
    };

    let (policy, policy_json) = match &paths.policy {
        Some(path) => {
            let raw = read_file(path)?;
            let value = ReductionPolicy::parse_json(&raw)
                .and_then(|value| validate_policy(&value).map(|()| value))
                .map_err(|source| ConfigError::ValidationError {
                    path: path.clone(),
                    source,
                })?;
            (value, Some(raw))
        }
        None => (ReductionPolicy::default(), None),
    };

    debug!(
        event = event_names::CONFIG_LOADED,
        coefficients_source = %paths.coefficients_source,
        policy_source = %paths.policy_source,
        titration = %policy.titration,
        "configuration loaded"
    );

    let snapshot = ConfigSnapshot::new(
        &coefficients,
        &policy,
        &paths,
        coefficients_json.as_deref(),
        policy_json.as_deref(),
    );

    Ok(ResolvedConfig {
        coefficients,
        policy,
        paths,
        snapshot,
    })
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_missing_file_is_not_found() {
        let options = ConfigOptions {
            policy_path: Some(PathBuf::from("/nonexistent/cvd/policy.json")),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert_eq!(err.code(), 35);
    }

    #[test]
    fn test_policy_file_is_hashed_and_applied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(
            &path,
            r#"{"schema_version": "1.0.0", "titration": "half_weight"}"#,
        )
        .unwrap();

        let options = ConfigOptions {
            policy_path: Some(path),
            ..Default::default()
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.policy.titration, TitrationPolicy::HalfWeight);
        assert_eq!(config.paths.policy_source, ConfigSource::CliArgument);
        assert!(config.snapshot.policy_hash.is_some());
        assert_eq!(config.snapshot.summary.titration, TitrationPolicy::HalfWeight);
    }

    #[test]
    fn test_invalid_coefficients_rejected() {
        let dir = TempDir::new().unwrap();
        let mut coefficients = RiskCoefficients::default();
        coefficients.baseline_survival = 1.2;
        std::fs::write(
            dir.path().join("coefficients.json"),
            serde_json::to_string(&coefficients).unwrap(),
        )
        .unwrap();

        let options = ConfigOptions {
            config_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let options = ConfigOptions {
            policy_path: Some(path),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError {
                source: ValidationError::ParseError(_),
                ..
            }
        ));
        assert_eq!(err.code(), 31);
    }

    #[test]
    fn test_reversed_coefficient_file_rejected() {
        let dir = TempDir::new().unwrap();
        let coefficients = RiskCoefficients {
            age: -0.064,
            hdl: 0.25,
            linear_predictor_offset: 0.0,
            ..Default::default()
        };
        std::fs::write(
            dir.path().join("coefficients.json"),
            serde_json::to_string(&coefficients).unwrap(),
        )
        .unwrap();

        let options = ConfigOptions {
            config_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError {
                source: ValidationError::InvalidValue { .. },
                ..
            }
        ));
        assert_eq!(err.code(), 33);
    }
}
