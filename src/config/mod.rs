//! Configuration management.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a config file (`--config <path>`, or `citeas-ack.toml` in the working directory)
//! 3. `CITEAS_ACK_*` environment variables (`__` separates nested keys,
//!    e.g. `CITEAS_ACK_RETRY__MAX_ATTEMPTS=3`)
//!
//! The binary applies its own flags and the `INPUT_*` action variables on top.
//!
//! ```toml
//! input_file = "requirements.txt"
//! format = "nature"          # or 0..=5
//! output_file = "ACKNOWLEDGMENTS.md"
//! email = "someone@example.org"
//! on_failure = "abort"       # or "skip"
//! request_delay_ms = 0
//!
//! [retry]
//! max_attempts = 7
//! delay_ms = 1000
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::bibliography::DEFAULT_OUTPUT_FILE;
use crate::error::{Error, Result};
use crate::manifest::find_manifest;
use crate::models::CitationFormat;
use crate::sources::{CITEAS_API_BASE, DEFAULT_CONTACT_EMAIL};
use crate::utils::{RetryConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "citeas-ack.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "CITEAS_ACK";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Manifest to read; `requirements.txt` in the working directory when unset
    pub input_file: Option<PathBuf>,

    /// Citation style to keep
    pub format: CitationFormat,

    /// Where the bibliography is written
    pub output_file: PathBuf,

    /// Contact tag sent to CiteAs
    pub email: String,

    /// CiteAs API root
    pub api_base: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Pause between consecutive packages in milliseconds
    pub request_delay_ms: u64,

    /// What to do when a package cannot be cited
    pub on_failure: FailurePolicy,

    /// Retry settings
    pub retry: RetrySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: None,
            format: CitationFormat::default(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            email: DEFAULT_CONTACT_EMAIL.to_string(),
            api_base: CITEAS_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            request_delay_ms: 0,
            on_failure: FailurePolicy::default(),
            retry: RetrySettings::default(),
        }
    }
}

/// Behaviour when a package's citation cannot be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole run; nothing is written
    #[default]
    Abort,
    /// Leave the package out, keep going, and report it at the end
    Skip,
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
        }
    }
}

impl Config {
    /// Manifest path, falling back to `requirements.txt` in the working directory
    pub fn manifest_path(&self) -> PathBuf {
        self.input_file.clone().unwrap_or_else(|| find_manifest(""))
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.retry.max_attempts,
            delay: Duration::from_millis(self.retry.delay_ms),
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs must be at least 1"));
        }
        if self.api_base.trim().is_empty() {
            return Err(invalid("api_base must not be empty"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::Config(config::ConfigError::Message(message.to_string()))
}

/// Look for the default config file in the working directory
pub fn find_config_file() -> Option<PathBuf> {
    let path = PathBuf::from(DEFAULT_CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Load configuration from an optional file plus `CITEAS_ACK_*` environment variables
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    load_config_with_env(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_config_with_env(path: Option<&Path>, env: config::Environment) -> Result<Config> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let config: Config = builder.add_source(env).build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.format, CitationFormat::Nature);
        assert_eq!(config.output_file, PathBuf::from("ACKNOWLEDGMENTS.md"));
        assert_eq!(config.on_failure, FailurePolicy::Abort);
        assert_eq!(config.retry_config(), RetryConfig::default());
        assert_eq!(config.manifest_path(), PathBuf::from("requirements.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_sources_gives_defaults() {
        let config = load_config_with_env(None, env(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("citeas-ack.toml");
        std::fs::write(
            &path,
            r#"
input_file = "deps/requirements.txt"
format = 3
output_file = "docs/CITATIONS.md"
on_failure = "skip"
request_delay_ms = 5000

[retry]
max_attempts = 2
"#,
        )
        .unwrap();

        let config = load_config_with_env(Some(&path), env(&[])).unwrap();
        assert_eq!(
            config.input_file,
            Some(PathBuf::from("deps/requirements.txt"))
        );
        assert_eq!(config.format, CitationFormat::Mla);
        assert_eq!(config.output_file, PathBuf::from("docs/CITATIONS.md"));
        assert_eq!(config.on_failure, FailurePolicy::Skip);
        assert_eq!(config.request_delay(), Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.delay_ms, 1000);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("citeas-ack.toml");
        std::fs::write(&path, "format = \"harvard\"\nemail = \"file@example.org\"\n").unwrap();

        let config = load_config_with_env(
            Some(&path),
            env(&[
                ("CITEAS_ACK_FORMAT", "vancouver"),
                ("CITEAS_ACK_RETRY__MAX_ATTEMPTS", "3"),
            ]),
        )
        .unwrap();

        assert_eq!(config.format, CitationFormat::Vancouver);
        assert_eq!(config.email, "file@example.org");
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_out_of_range_format_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("citeas-ack.toml");
        std::fs::write(&path, "format = 6\n").unwrap();

        assert!(load_config_with_env(Some(&path), env(&[])).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let path = PathBuf::from("/nonexistent/citeas-ack.toml");
        assert!(load_config_with_env(Some(&path), env(&[])).is_err());
    }
}
