//! Application logging.
//!
//! [`Logger`] is a small prefixed logger for code built on providers. It
//! writes through `tracing` when the `tracing-integration` feature is on.

mod level;
mod logger;

pub use level::{LogLevel, ParseLevelError};
pub use logger::Logger;
