//! Runtime configuration
//!
//! Controls how the interpreter talks to its host: whether `read` prints the
//! `introduce ...` prompts and whether output is flushed after each write.
//!
//! Configuration is resolved in the following order (later overrides earlier):
//! 1. Defaults (prompts on, flushing on)
//! 2. A TOML file (`RuntimeConfig::load_from_file`)
//! 3. Environment variables (`GUARDED_NO_PROMPT`, `GUARDED_NO_FLUSH`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that disables `read` prompts
pub const ENV_NO_PROMPT: &str = "GUARDED_NO_PROMPT";
/// Environment variable that disables flushing after each write
pub const ENV_NO_FLUSH: &str = "GUARDED_NO_FLUSH";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Host-facing interpreter settings
///
/// ```toml
/// prompts = false
/// flush_output = true
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Print `introduce ...` before every `read`
    pub prompts: bool,
    /// Flush the output stream after every `print`, `println` and prompt
    pub flush_output: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            prompts: true,
            flush_output: true,
        }
    }
}

impl RuntimeConfig {
    /// Configuration for non-interactive hosts: no prompts, no per-write flush
    pub fn quiet() -> Self {
        Self {
            prompts: false,
            flush_output: false,
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Self::parse(content, Path::new("<string>"))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, file: &Path) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|error| ConfigError::TomlParseError {
            file: file.to_path_buf(),
            error,
        })
    }

    /// Apply `GUARDED_NO_PROMPT` / `GUARDED_NO_FLUSH` from the process environment
    pub fn apply_env(self) -> ConfigResult<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// A variable set to `1`, `true`, `yes` or `on` switches the feature off;
    /// `0`, `false`, `no` or `off` leaves it on. Anything else is rejected.
    pub fn apply_env_with(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        if let Some(value) = lookup(ENV_NO_PROMPT) {
            self.prompts = !parse_flag(ENV_NO_PROMPT, &value)?;
        }
        if let Some(value) = lookup(ENV_NO_FLUSH) {
            self.flush_output = !parse_flag(ENV_NO_FLUSH, &value)?;
        }
        tracing::debug!(
            prompts = self.prompts,
            flush_output = self.flush_output,
            "runtime config resolved"
        );
        Ok(self)
    }
}

fn parse_flag(field: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected a boolean flag, found '{}'", other),
        }),
    }
}
