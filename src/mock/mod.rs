//! Mock substitution gate and helpers.
//!
//! A provider consults a [`MockGate`] on every call to decide whether its mock
//! operation (if any) replaces the real one. Gates are injected into providers;
//! [`MockFlag::global`] is the process-wide default, backed by a
//! [`KeyValueStore`] and forced on in [`ExecutionMode::Test`].
//!
//! # Example
//!
//! ```
//! use safe_provider::mock::{MemoryStore, MockFlag, MockGate};
//!
//! let flag = MockFlag::new(MemoryStore::new());
//! assert!(!flag.is_enabled());
//! flag.enable().unwrap();
//! assert!(flag.is_enabled());
//! ```

mod delay;
mod store;

pub use delay::delay;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

use crate::config::{DEFAULT_STORE_KEY, ExecutionMode, MockConfig};
use crate::error::StoreError;
use crate::tracing_compat::{debug, warn};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Decides whether mock operations replace real ones.
pub trait MockGate: Send + Sync {
    /// Returns true if mocks should run.
    fn is_enabled(&self) -> bool;
}

impl<G: MockGate + ?Sized> MockGate for Arc<G> {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

impl<G: MockGate + ?Sized> MockGate for &'static G {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

/// An in-process gate that can be flipped at any time.
#[derive(Debug, Default)]
pub struct ToggleGate {
    enabled: AtomicBool,
}

impl ToggleGate {
    /// Creates a gate in the given state.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Creates an enabled gate.
    #[must_use]
    pub const fn enabled() -> Self {
        Self::new(true)
    }

    /// Creates a disabled gate.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(false)
    }

    /// Sets the gate state.
    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }
}

impl MockGate for ToggleGate {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

/// Store-backed mock flag.
///
/// The flag reads `"true"` from its store key as enabled and anything else
/// (including a missing key or an unreadable store) as disabled. In
/// [`ExecutionMode::Test`] the flag is enabled regardless of the store.
pub struct MockFlag {
    store: Arc<dyn KeyValueStore>,
    key: String,
    mode: ExecutionMode,
}

impl MockFlag {
    /// Creates a flag over `store` with the default key, in development mode.
    #[must_use]
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            key: DEFAULT_STORE_KEY.to_string(),
            mode: ExecutionMode::Development,
        }
    }

    /// Creates a flag over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Builds a flag from configuration, reading the execution mode from the
    /// environment. An unparseable mode is logged and treated as development.
    #[must_use]
    pub fn from_config(config: &MockConfig) -> Self {
        let store: Arc<dyn KeyValueStore> = match &config.store_path {
            Some(path) => Arc::new(JsonFileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };
        let mode = config.execution_mode().unwrap_or_else(|err| {
            warn!(error = %err, var = %config.mode_var, "ignoring execution mode");
            ExecutionMode::Development
        });
        Self {
            store,
            key: config.store_key.clone(),
            mode,
        }
    }

    /// Returns the process-wide flag, built from [`MockConfig::from_env`] on
    /// first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<MockFlag> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::from_config(&MockConfig::from_env()))
    }

    /// Sets the store key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the execution mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the store key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the execution mode.
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Persists the flag as enabled.
    pub fn enable(&self) -> Result<(), StoreError> {
        debug!(key = %self.key, "mock flag enabled");
        self.store.set_item(&self.key, "true")
    }

    /// Persists the flag as disabled.
    pub fn disable(&self) -> Result<(), StoreError> {
        debug!(key = %self.key, "mock flag disabled");
        self.store.set_item(&self.key, "false")
    }
}

impl MockGate for MockFlag {
    fn is_enabled(&self) -> bool {
        if self.mode.is_test() {
            return true;
        }
        match self.store.get_item(&self.key) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(err) => {
                warn!(error = %err, key = %self.key, "mock flag unreadable, treating as disabled");
                false
            }
        }
    }
}

impl fmt::Debug for MockFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockFlag")
            .field("key", &self.key)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Returns the state of the process-wide mock flag.
#[must_use]
pub fn is_mock_enabled() -> bool {
    MockFlag::global().is_enabled()
}

/// Enables the process-wide mock flag.
pub fn enable_mock() -> Result<(), StoreError> {
    MockFlag::global().enable()
}

/// Disables the process-wide mock flag.
pub fn disable_mock() -> Result<(), StoreError> {
    MockFlag::global().disable()
}
