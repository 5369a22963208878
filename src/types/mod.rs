//! Core types shared by the wrapper and the providers.
//!
//! - [`outcome`]: Two-state outcome type (data XOR error)
//! - [`cancel`]: Cancellation reason, kind, and signal types

pub mod cancel;
pub mod outcome;

pub use cancel::{CancelKind, CancelReason, CancelToken, Cancellation, Cancelled};
pub use outcome::Outcome;
