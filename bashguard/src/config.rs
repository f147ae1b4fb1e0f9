//! Configuration loading from `.bashguard.toml`.

use crate::constants::{CONFIG_FILENAME, DEFAULT_FIXED_SUFFIX};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Per-detector enable switches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorToggles {
    /// Direct command injection check
    pub command_injection: bool,
    /// `eval`/`source` injection check
    pub eval_source: bool,
    /// `sh -c`/`bash -c` injection check
    pub interpreter: bool,
    /// Array subscript injection check
    pub array_index: bool,
    /// Unquoted expansion check
    pub unquoted: bool,
    /// `$0` expansion check
    pub parameter: bool,
    /// Co-declared tainted pair check (stricter audits only)
    pub declared_pair: bool,
    /// Missing PATH declaration check
    pub environment: bool,
}

impl Default for DetectorToggles {
    fn default() -> Self {
        Self {
            command_injection: true,
            eval_source: true,
            interpreter: true,
            array_index: true,
            unquoted: true,
            parameter: true,
            declared_pair: false,
            environment: true,
        }
    }
}

/// Tool configuration, merged from `.bashguard.toml` when present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detector switches
    pub detectors: DetectorToggles,
    /// Whether to run the external shellcheck pass before analysis
    pub shellcheck: bool,
    /// Suffix inserted before the extension of auto-fixed files
    pub fixed_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detectors: DetectorToggles::default(),
            shellcheck: true,
            fixed_suffix: DEFAULT_FIXED_SUFFIX.to_string(),
        }
    }
}

/// Error while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Offending path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema
    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        /// Offending path
        path: String,
        /// Underlying error
        source: toml::de::Error,
    },
}

impl Config {
    /// Loads `.bashguard.toml` from the given directory, falling back to
    /// defaults when the file does not exist.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
