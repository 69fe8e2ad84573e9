//! Configuration file loading with precedence handling.

use crate::diff::{DiffAlgorithm, DiffOptions, DEFAULT_CONTEXT_LINES};
use crate::present::{RenderOptions, DEFAULT_SHELL_PREVIEW_LINES};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CCHIST_CONFIG";
/// Environment override for `context_lines`.
pub const CONTEXT_LINES_ENV: &str = "CCHIST_CONTEXT_LINES";
/// Environment override for `diff_algorithm`.
pub const DIFF_ALGORITHM_ENV: &str = "CCHIST_DIFF_ALGORITHM";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment override holds a value that cannot be used.
    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        /// Environment variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/cchist/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Unchanged lines kept around each diff change.
    #[serde(default)]
    pub context_lines: Option<usize>,

    /// Line alignment algorithm (`myers`, `patience`, `lcs`).
    #[serde(default)]
    pub diff_algorithm: Option<DiffAlgorithm>,

    /// Shell output lines shown before abbreviating.
    #[serde(default)]
    pub shell_preview_lines: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Diff context lines.
    pub context_lines: usize,
    /// Diff algorithm.
    pub diff_algorithm: DiffAlgorithm,
    /// Shell preview length.
    pub shell_preview_lines: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            diff_algorithm: DiffAlgorithm::Myers,
            shell_preview_lines: DEFAULT_SHELL_PREVIEW_LINES,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Diff options for these settings.
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            context_lines: self.context_lines,
            algorithm: self.diff_algorithm,
        }
    }

    /// Transcript options for these settings.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            diff: self.diff_options(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/cchist/cchist.log` on Unix-like systems,
/// or the platform state directory elsewhere.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("cchist").join("cchist.log")
    } else {
        PathBuf::from("cchist.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/cchist/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cchist").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CCHIST_CONFIG` environment variable
/// 3. Default path `~/.config/cchist/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        context_lines: config.context_lines.unwrap_or(defaults.context_lines),
        diff_algorithm: config.diff_algorithm.unwrap_or(defaults.diff_algorithm),
        shell_preview_lines: config
            .shell_preview_lines
            .unwrap_or(defaults.shell_preview_lines),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CCHIST_CONTEXT_LINES`: Override diff context lines
/// - `CCHIST_DIFF_ALGORITHM`: Override diff algorithm
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a set variable cannot be parsed.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(value) = std::env::var(CONTEXT_LINES_ENV) {
        config.context_lines =
            value
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    name: CONTEXT_LINES_ENV,
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
    }

    if let Ok(value) = std::env::var(DIFF_ALGORITHM_ENV) {
        config.diff_algorithm = value.parse().map_err(|e: crate::diff::UnknownAlgorithm| {
            ConfigError::InvalidValue {
                name: DIFF_ALGORITHM_ENV,
                value: value.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    context_override: Option<usize>,
    algorithm_override: Option<DiffAlgorithm>,
) -> ResolvedConfig {
    if let Some(context_lines) = context_override {
        config.context_lines = context_lines;
    }

    if let Some(algorithm) = algorithm_override {
        config.diff_algorithm = algorithm;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
