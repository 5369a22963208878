//! Error types.
//!
//! Operations wrapped by [`safe`](crate::safe) and providers keep their own
//! error type `E`. The types here cover the crate's supporting surfaces: the
//! mock flag store and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Dynamic error type used for kind-based filtering with
/// [`ErrorKind::of`](crate::safe::ErrorKind::of).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by a [`KeyValueStore`](crate::mock::KeyValueStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("store I/O failed for {path}: {source}")]
    Io {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The backing file does not hold a JSON object of strings.
    #[error("store file {path} is not a valid JSON string map: {source}")]
    Corrupt {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Error returned while loading [`MockConfig`](crate::config::MockConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The execution mode variable held an unrecognized value.
    #[error("invalid execution mode {0:?} (expected development, production, or test)")]
    InvalidMode(String),
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`MockConfig`](crate::config::MockConfig).
    #[cfg(feature = "config-file")]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
