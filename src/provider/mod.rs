//! Providers: operations with a configurable settlement pipeline.
//!
//! A provider wraps an asynchronous operation and runs every call through a
//! fixed pipeline: mock substitution, the `and_then` transform, the
//! `and_catch` recovery, then the `and_finally` side effect. Hooks are
//! installed through chain methods on the returned handle and are read live
//! on every call.
//!
//! Use [`create_provider`] for calls that return `Result<U, E>` and
//! [`create_safe_provider`] for calls that settle into an
//! [`Outcome`](crate::Outcome).
//!
//! # Example
//!
//! ```
//! use safe_provider::mock::ToggleGate;
//! use safe_provider::provider::create_safe_provider_with_gate;
//! use safe_provider::safe::ErrorFilter;
//! use safe_provider::Outcome;
//!
//! let provider = create_safe_provider_with_gate(
//!     ToggleGate::disabled(),
//!     |(): ()| async { Ok::<_, String>(1) },
//!     ErrorFilter::any(),
//! )
//! .and_then(|v| Ok(v + 1));
//!
//! let outcome = futures_lite::future::block_on(provider.call(()));
//! assert_eq!(outcome, Ok(Outcome::Data(2)));
//! ```

mod builder;
mod handle;
mod hooks;

pub use builder::ProviderBuilder;
pub use handle::{Caught, Open, Provider, SafeProvider};
pub use hooks::HookSummary;

use crate::mock::MockGate;
use crate::safe::ErrorFilter;
use std::future::Future;

/// Creates a provider whose calls return the operation's `Result`, gated by
/// [`MockFlag::global`](crate::mock::MockFlag::global).
pub fn create_provider<A, T, E, F, Fut>(operation: F) -> Provider<A, T, E>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    ProviderBuilder::new(operation).build()
}

/// Like [`create_provider`], consulting `gate` for mock substitution.
pub fn create_provider_with_gate<A, T, E, F, Fut, G>(gate: G, operation: F) -> Provider<A, T, E>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    G: MockGate + 'static,
{
    ProviderBuilder::new(operation).gate(gate).build()
}

/// Creates a provider whose calls settle into an
/// [`Outcome`](crate::Outcome), gated by
/// [`MockFlag::global`](crate::mock::MockFlag::global).
///
/// Errors matching `filter` (or any error, for an empty filter) become
/// `Ok(Outcome::Error(..))`; the rest propagate as `Err`.
pub fn create_safe_provider<A, T, E, F, Fut>(
    operation: F,
    filter: ErrorFilter<E>,
) -> SafeProvider<A, T, E>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    ProviderBuilder::new(operation).build_safe(filter)
}

/// Like [`create_safe_provider`], consulting `gate` for mock substitution.
pub fn create_safe_provider_with_gate<A, T, E, F, Fut, G>(
    gate: G,
    operation: F,
    filter: ErrorFilter<E>,
) -> SafeProvider<A, T, E>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    G: MockGate + 'static,
{
    ProviderBuilder::new(operation).gate(gate).build_safe(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::mock::{ToggleGate, delay};
    use crate::safe::ErrorKind;
    use crate::test_utils::{init_test_logging, run_test};
    use crate::types::{CancelReason, CancelToken, Cancelled, Outcome};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    enum FetchError {
        #[error("fetch cancelled")]
        Cancelled,
        #[error("fetch failed: {0}")]
        Failed(&'static str),
    }

    impl From<Cancelled> for FetchError {
        fn from(_: Cancelled) -> Self {
            Self::Cancelled
        }
    }

    fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        (Arc::clone(&count), count)
    }

    #[test]
    fn safe_then_transforms_success() {
        init_test_logging();
        crate::test_phase!("safe_then_transforms_success");
        let provider = create_safe_provider_with_gate(
            ToggleGate::disabled(),
            |(): ()| async { Ok::<_, FetchError>(1) },
            ErrorFilter::any(),
        )
        .and_then(|v| Ok(v + 1));

        let outcome = run_test(provider.call(()));
        crate::assert_with_log!(
            outcome == Ok(Outcome::Data(2)),
            "then hook applied",
            Ok::<_, FetchError>(Outcome::<i32, FetchError>::Data(2)),
            outcome
        );
        assert_eq!(outcome.unwrap().into_tuple(), (None, Some(2)));
        crate::test_complete!("safe_then_transforms_success");
    }

    #[test]
    fn failing_then_is_recovered_by_catch() {
        init_test_logging();
        let provider = create_safe_provider_with_gate(
            ToggleGate::disabled(),
            |(): ()| async { Ok::<_, FetchError>(1) },
            ErrorFilter::any(),
        )
        .and_then(|_: i32| Err::<&str, _>(FetchError::Failed("then")))
        .and_catch(|_| Ok("x"));

        assert_eq!(run_test(provider.call(())), Ok(Outcome::Data("x")));
    }

    #[test]
    fn unsafe_provider_propagates_error() {
        init_test_logging();
        let provider = create_provider_with_gate(ToggleGate::disabled(), |(): ()| async {
            Err::<i32, _>(FetchError::Failed("boom"))
        });
        assert_eq!(run_test(provider.call(())), Err(FetchError::Failed("boom")));
    }

    #[test]
    fn catch_failure_becomes_outcome_error() {
        init_test_logging();
        let provider = create_safe_provider_with_gate(
            ToggleGate::disabled(),
            |(): ()| async { Err::<i32, _>(FetchError::Failed("first")) },
            ErrorFilter::any(),
        )
        .and_catch(|_| Err(FetchError::Failed("second")));

        let (error, data) = run_test(provider.call(())).unwrap().into_tuple();
        assert_eq!(error, Some(FetchError::Failed("second")));
        assert_eq!(data, None);
    }

    #[test]
    fn unmatched_error_escapes_safe_provider() {
        init_test_logging();
        let provider = create_safe_provider_with_gate(
            ToggleGate::disabled(),
            |(): ()| async { Err::<i32, _>(FetchError::Failed("boom")) },
            ErrorFilter::any().with(ErrorKind::when("cancelled", |e: &FetchError| {
                *e == FetchError::Cancelled
            })),
        );
        assert_eq!(run_test(provider.call(())), Err(FetchError::Failed("boom")));
    }

    #[test]
    fn boxed_errors_filter_by_type() {
        init_test_logging();
        let provider = create_safe_provider_with_gate(
            ToggleGate::disabled(),
            |fail: bool| async move {
                if fail {
                    Err::<i32, BoxError>(FetchError::Failed("typed").into())
                } else {
                    Err("untyped".into())
                }
            },
            ErrorFilter::any().of::<FetchError>(),
        );
        let absorbed = run_test(provider.call(true)).unwrap().error().unwrap();
        assert!(absorbed.is::<FetchError>());
        let escaped = run_test(provider.call(false)).unwrap_err();
        assert_eq!(escaped.to_string(), "untyped");
    }

    #[test]
    fn hooks_run_in_pipeline_order() {
        init_test_logging();
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let (op_log, then_log, catch_log, finally_log) =
            (log.clone(), log.clone(), log.clone(), log.clone());

        let provider = create_provider_with_gate(ToggleGate::disabled(), move |(): ()| {
            op_log.lock().push("operation");
            async { Ok::<_, FetchError>(1) }
        })
        .and_then(move |_: i32| {
            then_log.lock().push("then");
            Err::<i32, _>(FetchError::Failed("then"))
        })
        .and_catch(move |_| {
            catch_log.lock().push("catch");
            Ok(0)
        })
        .and_finally(move || finally_log.lock().push("finally"));

        assert_eq!(run_test(provider.call(())), Ok(0));
        assert_eq!(*log.lock(), vec!["operation", "then", "catch", "finally"]);
    }

    #[test]
    fn finally_runs_once_on_success_and_failure() {
        init_test_logging();
        let (finally_calls, seen) = counter();
        let provider = create_provider_with_gate(ToggleGate::disabled(), |fail: bool| async move {
            if fail { Err(FetchError::Failed("x")) } else { Ok(1) }
        })
        .and_finally(move || {
            finally_calls.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(run_test(provider.call(false)), Ok(1));
        assert!(run_test(provider.call(true)).is_err());
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn finally_error_overrides_result() {
        init_test_logging();
        let provider = create_safe_provider_with_gate(
            ToggleGate::disabled(),
            |(): ()| async { Ok::<_, FetchError>(5) },
            ErrorFilter::any(),
        )
        .and_try_finally(|| Err(FetchError::Failed("cleanup")));

        assert_eq!(
            run_test(provider.call(())),
            Ok(Outcome::Error(FetchError::Failed("cleanup")))
        );
    }

    #[test]
    fn mock_follows_gate_on_every_call() {
        init_test_logging();
        let gate = Arc::new(ToggleGate::disabled());
        let (real_calls, real_seen) = counter();
        let provider = create_provider_with_gate(Arc::clone(&gate), move |x: i32| {
            real_calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, FetchError>(x) }
        })
        .and_mock(|x: i32| async move { Ok(x * 100) });

        assert_eq!(run_test(provider.call(2)), Ok(2));
        gate.set(true);
        assert_eq!(run_test(provider.call(2)), Ok(200));
        gate.set(false);
        assert_eq!(run_test(provider.call(3)), Ok(3));
        assert_eq!(real_seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn enabled_gate_without_mock_runs_real_operation() {
        init_test_logging();
        let provider = create_provider_with_gate(ToggleGate::enabled(), |(): ()| async {
            Ok::<_, FetchError>("real")
        });
        assert_eq!(run_test(provider.call(())), Ok("real"));
    }

    #[test]
    fn mock_result_flows_through_hooks() {
        init_test_logging();
        let provider = create_safe_provider_with_gate(
            ToggleGate::enabled(),
            |(): ()| async { Ok::<_, FetchError>(1) },
            ErrorFilter::any(),
        )
        .and_mock(|(): ()| async { Ok(41) })
        .and_then(|v| Ok(v + 1));
        assert_eq!(run_test(provider.call(())), Ok(Outcome::Data(42)));
    }

    #[test]
    fn later_hook_replaces_earlier() {
        init_test_logging();
        let provider = create_provider_with_gate(ToggleGate::enabled(), |(): ()| async {
            Err::<i32, _>(FetchError::Failed("real"))
        });
        let provider = provider.and_mock(|(): ()| async { Ok(1) });
        let provider = provider.and_mock(|(): ()| async { Ok(2) });
        assert_eq!(run_test(provider.call(())), Ok(2));

        let caught = provider.and_catch(|_| Ok(10)).and_catch(|_| Ok(20));
        *caught.builder.hooks.mock.write() = None;
        assert_eq!(run_test(caught.call(())), Ok(20));
    }

    #[test]
    fn clones_share_hooks() {
        init_test_logging();
        let provider = create_provider_with_gate(ToggleGate::disabled(), |(): ()| async {
            Err::<i32, _>(FetchError::Failed("x"))
        });
        let alias = provider.clone();
        let _ = alias.and_catch(|_| Ok(7));
        assert_eq!(run_test(provider.call(())), Ok(7));
        assert!(provider.hooks().catch);
    }

    #[test]
    fn repeated_then_keeps_only_last() {
        init_test_logging();
        let (first_calls, seen) = counter();
        let provider = create_safe_provider_with_gate(
            ToggleGate::disabled(),
            |(): ()| async { Ok::<i32, FetchError>(1) },
            ErrorFilter::any(),
        )
        .and_then(move |v| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(v + 100)
        })
        .and_then(|v| Ok(v + 1));

        assert_eq!(run_test(provider.call(())), Ok(Outcome::Data(2)));
        assert_eq!(first_calls.load(Ordering::SeqCst), 0);
        assert!(provider.hooks().then);
    }

    #[test]
    fn repeated_finally_keeps_only_last() {
        init_test_logging();
        let (first_runs, first) = counter();
        let (last_runs, last) = counter();
        let provider = create_provider_with_gate(ToggleGate::disabled(), |(): ()| async {
            Ok::<i32, FetchError>(5)
        })
        .and_finally(move || {
            first.fetch_add(1, Ordering::SeqCst);
        })
        .and_finally(move || {
            last.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(run_test(provider.call(())), Ok(5));
        assert_eq!(run_test(provider.call(())), Ok(5));
        assert_eq!(first_runs.load(Ordering::SeqCst), 0);
        assert_eq!(last_runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn finally_and_mock_set_through_alias_reach_then_stage() {
        init_test_logging();
        let (finally_runs, runs) = counter();
        let provider = create_provider_with_gate(ToggleGate::enabled(), |(): ()| async {
            Ok::<i32, FetchError>(1)
        });
        let alias = provider.clone();
        let chained = provider.and_then(|v| Ok(v * 10));

        let _ = alias.and_finally(move || {
            runs.fetch_add(1, Ordering::SeqCst);
        });
        let _ = alias.and_mock(|(): ()| async { Ok(4) });

        let summary = chained.hooks();
        assert!(summary.finally && summary.mock);
        assert_eq!(run_test(chained.call(())), Ok(40));
        assert_eq!(finally_runs.load(Ordering::SeqCst), 1);

        let _ = chained.and_finally(|| {});
        assert_eq!(run_test(alias.call(())), Ok(4));
        assert_eq!(finally_runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancellation_skips_then_and_runs_finally() {
        init_test_logging();
        crate::test_phase!("cancellation_skips_then_and_runs_finally");
        let token = CancelToken::new();
        let signal = token.clone();
        let (then_calls, then_seen) = counter();
        let (finally_calls, finally_seen) = counter();

        let provider = create_safe_provider_with_gate(
            ToggleGate::disabled(),
            move |(): ()| {
                let signal = signal.clone();
                async move {
                    delay(|| 1, Duration::from_secs(5), Some(&signal))
                        .await
                        .map_err(FetchError::from)
                }
            },
            ErrorFilter::any(),
        )
        .and_then(move |v: i32| {
            then_calls.fetch_add(1, Ordering::SeqCst);
            Ok(v)
        })
        .and_finally(move || {
            finally_calls.fetch_add(1, Ordering::SeqCst);
        });

        let pending = provider.call(());
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            token.cancel(CancelReason::user("Aborted"));
        });
        let outcome = run_test(pending);
        canceller.join().unwrap();

        assert_eq!(outcome, Ok(Outcome::Error(FetchError::Cancelled)));
        assert_eq!(then_seen.load(Ordering::SeqCst), 0);
        assert_eq!(finally_seen.load(Ordering::SeqCst), 1);
        crate::test_complete!("cancellation_skips_then_and_runs_finally");
    }

    #[test]
    fn async_hooks_are_awaited() {
        init_test_logging();
        let provider = create_provider_with_gate(ToggleGate::disabled(), |x: u32| async move {
            if x == 0 { Err(FetchError::Failed("zero")) } else { Ok(x) }
        })
        .and_then_async(|x| async move { Ok(format!("#{x}")) })
        .and_catch_async(|e| async move { Ok(format!("recovered from {e}")) });

        assert_eq!(run_test(provider.call(3)), Ok("#3".to_string()));
        assert_eq!(
            run_test(provider.call(0)),
            Ok("recovered from fetch failed: zero".to_string())
        );
    }

    #[test]
    fn call_future_is_send() {
        fn assert_send<F: Future + Send + 'static>(_: &F) {}
        let provider = create_safe_provider_with_gate(
            ToggleGate::disabled(),
            |(): ()| async { Ok::<_, FetchError>(()) },
            ErrorFilter::any(),
        );
        let pending = provider.call(());
        assert_send(&pending);
        drop(provider);
        assert_eq!(futures_lite::future::block_on(pending), Ok(Outcome::Data(())));
    }
}
