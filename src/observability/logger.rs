//! Prefixed application logger.

use super::LogLevel;
use crate::config::{DEFAULT_MODE_VAR, ExecutionMode};
use crate::tracing_compat::{debug, error, info, warn};

/// A logger that tags messages with an optional prefix and can be switched
/// off.
///
/// Messages are formatted as `[prefix][LEVEL]: message` and emitted as
/// `tracing` events at the matching level. A logger created with
/// [`Logger::new`] is disabled when the execution mode is production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    prefix: Option<String>,
    enabled: bool,
}

impl Logger {
    /// Creates a logger, enabled unless the process runs in production mode.
    #[must_use]
    pub fn new() -> Self {
        Self::for_mode(ExecutionMode::from_env(DEFAULT_MODE_VAR).unwrap_or_default())
    }

    /// Creates a logger for an explicit execution mode.
    #[must_use]
    pub fn for_mode(mode: ExecutionMode) -> Self {
        Self {
            prefix: None,
            enabled: !mode.is_production(),
        }
    }

    /// Sets the prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Overrides the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns the prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns true if messages are emitted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Formats a message the way it is emitted.
    #[must_use]
    pub fn format(&self, level: LogLevel, message: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("[{prefix}][{level}]: {message}"),
            None => format!("[{level}]: {message}"),
        }
    }

    /// Emits `message` at `level`. Returns false if the logger is disabled.
    pub fn log(&self, level: LogLevel, message: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let line = self.format(level, message);
        match level {
            LogLevel::Debug => debug!(target: "safe_provider::logger", "{line}"),
            LogLevel::Info => info!(target: "safe_provider::logger", "{line}"),
            LogLevel::Warn => warn!(target: "safe_provider::logger", "{line}"),
            LogLevel::Error => error!(target: "safe_provider::logger", "{line}"),
        }
        true
    }

    /// Emits at debug level.
    pub fn debug(&self, message: &str) -> bool {
        self.log(LogLevel::Debug, message)
    }

    /// Emits at info level.
    pub fn info(&self, message: &str) -> bool {
        self.log(LogLevel::Info, message)
    }

    /// Emits at warn level.
    pub fn warn(&self, message: &str) -> bool {
        self.log(LogLevel::Warn, message)
    }

    /// Emits at error level.
    pub fn error(&self, message: &str) -> bool {
        self.log(LogLevel::Error, message)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_logging;

    #[test]
    fn formats_prefix_and_level() {
        let logger = Logger::for_mode(ExecutionMode::Development).with_prefix("TestPrefix");
        assert_eq!(
            logger.format(LogLevel::Warn, "Test message"),
            "[TestPrefix][WARN]: Test message"
        );
        assert_eq!(
            Logger::for_mode(ExecutionMode::Test).format(LogLevel::Info, "hi"),
            "[INFO]: hi"
        );
    }

    #[test]
    fn emits_every_level_when_enabled() {
        init_test_logging();
        let logger = Logger::for_mode(ExecutionMode::Development).with_prefix("TestPrefix");
        for level in LogLevel::ALL {
            assert!(logger.log(level, "Test message"));
        }
        assert!(logger.debug("d") && logger.info("i") && logger.warn("w") && logger.error("e"));
    }

    #[test]
    fn production_mode_is_silent() {
        let logger = Logger::for_mode(ExecutionMode::Production).with_prefix("TestPrefix");
        assert!(!logger.is_enabled());
        assert!(!logger.info("Test message"));
        assert!(!logger.error("Test message"));

        let forced = logger.with_enabled(true);
        assert!(forced.warn("Test message"));
        assert_eq!(forced.prefix(), Some("TestPrefix"));
    }
}
