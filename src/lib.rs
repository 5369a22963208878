//! Safe-provider: result-oriented wrappers and mockable data providers.
//!
//! # Overview
//!
//! Two small layers make fallible asynchronous operations predictable to
//! consume:
//!
//! - [`safe`](mod@safe) turns a call's failure into a value. A wrapped call
//!   yields an [`Outcome`] holding either data or an absorbed error; errors the
//!   configured filter does not recognize still propagate.
//! - [`provider`] wraps an operation in a fixed settlement pipeline with
//!   chainable `and_then`, `and_catch`, `and_finally` and `and_mock` hooks.
//!   A [`MockGate`] decides on every call whether the mock replaces the real
//!   operation.
//!
//! # Module Structure
//!
//! - [`types`]: [`Outcome`] and cancellation primitives
//! - [`safe`](mod@safe): the safe wrapper, error filters and transformers
//! - [`provider`]: provider builder, handles and factories
//! - [`mock`]: mock gates, the persisted mock flag, latency simulation
//! - [`config`]: execution mode and mock flag configuration
//! - [`observability`]: prefixed application logger
//! - [`time`]: runtime-agnostic sleep future
//! - [`error`](mod@error): error types
//!
//! # Example
//!
//! ```
//! use safe_provider::mock::ToggleGate;
//! use safe_provider::provider::create_safe_provider_with_gate;
//! use safe_provider::safe::ErrorFilter;
//! use safe_provider::Outcome;
//!
//! let gate = std::sync::Arc::new(ToggleGate::disabled());
//! let users = create_safe_provider_with_gate(
//!     gate.clone(),
//!     |id: u32| async move { Err::<String, _>(format!("user {id} not found")) },
//!     ErrorFilter::any(),
//! )
//! .and_mock(|id: u32| async move { Ok(format!("mock user {id}")) });
//!
//! let outcome = futures_lite::future::block_on(users.call(7));
//! assert_eq!(outcome, Ok(Outcome::Error("user 7 not found".to_string())));
//!
//! gate.set(true);
//! let outcome = futures_lite::future::block_on(users.call(7));
//! assert_eq!(outcome, Ok(Outcome::Data("mock user 7".to_string())));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_inception)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::type_complexity)]

pub mod config;
pub mod error;
pub mod mock;
pub mod observability;
pub mod provider;
pub mod safe;
pub mod time;
mod tracing_compat;
pub mod types;

// ── Test-only modules ───────────────────────────────────────────────────
#[cfg(any(test, feature = "test-internals"))]
pub mod test_utils;

// Re-exports for convenient access to core types
pub use config::{ExecutionMode, MockConfig};
pub use error::{BoxError, ConfigError, StoreError};
pub use mock::{MockFlag, MockGate, ToggleGate, disable_mock, enable_mock, is_mock_enabled};
pub use observability::{LogLevel, Logger};
pub use provider::{
    Provider, ProviderBuilder, SafeProvider, create_provider, create_provider_with_gate,
    create_safe_provider, create_safe_provider_with_gate,
};
pub use safe::{ErrorFilter, ErrorKind, Safe, safe};
pub use types::{CancelKind, CancelReason, CancelToken, Cancelled, Outcome};
