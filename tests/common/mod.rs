//! Shared helpers for integration tests.

#![allow(dead_code, unused_macros)]

macro_rules! test_phase {
    ($name:expr) => {
        tracing::info!(test = %$name, "test phase start")
    };
}

macro_rules! test_complete {
    ($name:expr) => {
        tracing::info!(test = %$name, "test complete")
    };
}

macro_rules! assert_with_log {
    ($cond:expr, $msg:expr, $expected:expr, $actual:expr) => {{
        let passed = $cond;
        if !passed {
            tracing::error!(
                expected = ?$expected,
                actual = ?$actual,
                "assertion failed: {}",
                $msg
            );
        }
        assert!(passed, "{}: expected {:?}, got {:?}", $msg, $expected, $actual);
    }};
}

use std::future::Future;
use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Installs a test-writer tracing subscriber once per test binary.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("safe_provider=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Initializes logging and marks the start of `name`.
pub fn init_test(name: &str) {
    init_test_logging();
    test_phase!(name);
}

/// Drives `future` to completion on the current thread.
pub fn block_on<F: Future>(future: F) -> F::Output {
    futures_lite::future::block_on(future)
}
