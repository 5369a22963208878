//! Mock flag configuration.
//!
//! [`MockConfig`] names the store key of the mock flag, the environment
//! variable that carries the [`ExecutionMode`], and an optional file path for
//! durable flag storage. Defaults work without any configuration.
//!
//! # Example
//!
//! ```
//! use safe_provider::config::{ExecutionMode, MockConfig};
//!
//! let config = MockConfig::new().with_store_key("app:mock");
//! assert_eq!(config.store_key, "app:mock");
//! assert_eq!("test".parse::<ExecutionMode>().unwrap(), ExecutionMode::Test);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default store key holding the mock flag.
pub const DEFAULT_STORE_KEY: &str = "dp:mock.enabled";

/// Default environment variable naming the execution mode.
pub const DEFAULT_MODE_VAR: &str = "SAFE_PROVIDER_ENV";

/// Environment variable naming a JSON file for durable flag storage.
pub const STORE_PATH_VAR: &str = "SAFE_PROVIDER_STORE";

/// The mode the surrounding process runs in.
///
/// `Test` forces mocks on; `Production` disables the default logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Local development (the default when the variable is unset).
    #[default]
    Development,
    /// Production deployment.
    Production,
    /// Test execution.
    Test,
}

impl ExecutionMode {
    /// Reads the mode from the environment variable `var`.
    ///
    /// An unset variable yields [`ExecutionMode::Development`].
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        std::env::var(var).map_or(Ok(Self::default()), |value| value.parse())
    }

    /// Returns true for [`ExecutionMode::Test`].
    #[must_use]
    pub const fn is_test(self) -> bool {
        matches!(self, Self::Test)
    }

    /// Returns true for [`ExecutionMode::Production`].
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Returns the mode name in lowercase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the mock flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Store key holding `"true"`/`"false"`.
    pub store_key: String,
    /// Environment variable carrying the execution mode.
    pub mode_var: String,
    /// JSON file for durable storage; in-memory when `None`.
    pub store_path: Option<PathBuf>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            store_key: DEFAULT_STORE_KEY.to_string(),
            mode_var: DEFAULT_MODE_VAR.to_string(),
            store_path: None,
        }
    }
}

impl MockConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings, with `store_path` taken from [`STORE_PATH_VAR`].
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os(STORE_PATH_VAR).filter(|p| !p.is_empty()) {
            config.store_path = Some(PathBuf::from(path));
        }
        config
    }

    /// Set the store key.
    #[must_use]
    pub fn with_store_key(mut self, key: impl Into<String>) -> Self {
        self.store_key = key.into();
        self
    }

    /// Set the execution mode variable.
    #[must_use]
    pub fn with_mode_var(mut self, var: impl Into<String>) -> Self {
        self.mode_var = var.into();
        self
    }

    /// Set the durable store path.
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Reads the execution mode from [`MockConfig::mode_var`].
    pub fn execution_mode(&self) -> Result<ExecutionMode, ConfigError> {
        ExecutionMode::from_env(&self.mode_var)
    }

    /// Parses a config from TOML text. Missing fields take their defaults.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a config from a TOML file.
    #[cfg(feature = "config-file")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
