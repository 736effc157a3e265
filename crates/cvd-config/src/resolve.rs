//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI arguments → environment variables → XDG paths → /etc → defaults.

use std::path::{Path, PathBuf};

/// Discovered configuration file paths.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to coefficients.json (or None if not found).
    pub coefficients: Option<PathBuf>,

    /// Path to policy.json (or None if not found).
    pub policy: Option<PathBuf>,

    pub coefficients_source: ConfigSource,

    pub policy_source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in the user config directory.
    XdgConfig,

    /// Found in /etc/cvd-risk/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

pub const ENV_COEFFICIENTS_PATH: &str = "CVD_COEFFICIENTS";
pub const ENV_POLICY_PATH: &str = "CVD_POLICY";
pub const ENV_CONFIG_DIR: &str = "CVD_CONFIG_DIR";

pub const COEFFICIENTS_FILENAME: &str = "coefficients.json";
pub const POLICY_FILENAME: &str = "policy.json";

/// Application name for config directories.
pub const APP_NAME: &str = "cvd-risk";

/// Resolve configuration paths using the standard resolution order.
///
/// For each file:
/// 1. Explicit CLI path (returned even when missing, so loading fails loudly)
/// 2. `CVD_COEFFICIENTS` / `CVD_POLICY`
/// 3. `CVD_CONFIG_DIR` + filename, or the `--config` directory when given
/// 4. User config directory (`~/.config/cvd-risk/`)
/// 5. System config (`/etc/cvd-risk/`)
/// 6. Built-in defaults (None)
pub fn resolve_config(
    cli_dir: Option<&Path>,
    cli_coefficients: Option<&Path>,
    cli_policy: Option<&Path>,
) -> ConfigPaths {
    let mut paths = ConfigPaths::default();

    paths.coefficients = resolve_single_config(
        cli_dir,
        cli_coefficients,
        ENV_COEFFICIENTS_PATH,
        COEFFICIENTS_FILENAME,
        &mut paths.coefficients_source,
    );

    paths.policy = resolve_single_config(
        cli_dir,
        cli_policy,
        ENV_POLICY_PATH,
        POLICY_FILENAME,
        &mut paths.policy_source,
    );

    paths
}

fn resolve_single_config(
    cli_dir: Option<&Path>,
    cli_path: Option<&Path>,
    env_var: &str,
    filename: &str,
    source: &mut ConfigSource,
) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        *source = ConfigSource::CliArgument;
        return Some(path.to_path_buf());
    }

    if let Some(dir) = cli_dir {
        let path = dir.join(filename);
        if path.exists() {
            *source = ConfigSource::CliArgument;
            return Some(path);
        }
    }

    if let Ok(env_path) = std::env::var(env_var) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(filename);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(filename);
        if path.exists() {
            *source = ConfigSource::XdgConfig;
            return Some(path);
        }
    }

    let system_path = system_config_dir().join(filename);
    if system_path.exists() {
        *source = ConfigSource::SystemConfig;
        return Some(system_path);
    }

    *source = ConfigSource::BuiltinDefault;
    None
}

/// User config directory for cvd-risk.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
