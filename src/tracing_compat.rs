//! Optional tracing integration.
//!
//! With the `tracing-integration` feature the logging macros used across the
//! crate are the `tracing` macros. Without it they expand to code that only
//! borrows the event's fields and format arguments, so instrumented code
//! carries no runtime cost and its bindings still count as used.

#[cfg(feature = "tracing-integration")]
pub(crate) use tracing::{debug, error, info, trace, warn};

#[cfg(not(feature = "tracing-integration"))]
pub(crate) mod noop {
    /// Accepts the `tracing` event syntax used in this crate
    /// (`target: ..`, `name = %value`, `name = ?value`, `name = value`,
    /// then a format string with arguments) and emits nothing.
    macro_rules! noop_event {
        (@fields) => {};
        (@fields target: $target:expr, $($rest:tt)*) => {
            let _ = $target;
            $crate::tracing_compat::noop::noop_event!(@fields $($rest)*);
        };
        (@fields $name:ident = % $value:expr $(, $($rest:tt)*)?) => {
            let _ = &$value;
            $crate::tracing_compat::noop::noop_event!(@fields $($($rest)*)?);
        };
        (@fields $name:ident = ? $value:expr $(, $($rest:tt)*)?) => {
            let _ = &$value;
            $crate::tracing_compat::noop::noop_event!(@fields $($($rest)*)?);
        };
        (@fields $name:ident = $value:expr $(, $($rest:tt)*)?) => {
            let _ = &$value;
            $crate::tracing_compat::noop::noop_event!(@fields $($($rest)*)?);
        };
        (@fields $message:literal $(, $arg:expr)* $(,)?) => {
            let _ = format_args!($message $(, $arg)*);
        };
        ($($arg:tt)*) => {{
            $crate::tracing_compat::noop::noop_event!(@fields $($arg)*);
        }};
    }

    pub(crate) use noop_event;
    pub(crate) use noop_event as debug;
    pub(crate) use noop_event as error;
    pub(crate) use noop_event as info;
    pub(crate) use noop_event as trace;
    pub(crate) use noop_event as warn;
}

#[cfg(not(feature = "tracing-integration"))]
pub(crate) use noop::{debug, error, info, trace, warn};
