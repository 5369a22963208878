//! Safe execution: absorb failures into an [`Outcome`].
//!
//! [`safe`] wraps a unary operation so that a call yields
//! `Ok(Outcome::Data(value))` on success and `Ok(Outcome::Error(error))` when
//! the failure matches the configured [`ErrorFilter`]. A failure that does not
//! match a non-empty filter is propagated unchanged as the outer `Err`, which
//! makes unexpected error kinds impossible to ignore silently.
//!
//! Whether the wrapper settles immediately or asynchronously is decided by the
//! operation's signature: use [`Safe::call`] for `Fn(A) -> Result<T, E>` and
//! [`Safe::call_async`] for operations returning a future.
//!
//! # Example
//!
//! ```
//! use safe_provider::safe::safe;
//! use safe_provider::Outcome;
//!
//! let half = safe(|x: i32| if x % 2 == 0 { Ok(x / 2) } else { Err("odd") });
//! assert_eq!(half.call(4), Ok(Outcome::Data(2)));
//! assert_eq!(half.call(3), Ok(Outcome::Error("odd")));
//! ```

mod filter;
mod transform;

pub use filter::{ErrorFilter, ErrorKind};
pub use transform::{
    AsyncErrorTransformer, ErrorTransformer, Identity, MapErr, MapErrAsync, TryMapErr,
};

use crate::tracing_compat::trace;
use crate::types::Outcome;
use std::future::Future;

/// An operation wrapped for safe execution.
///
/// Created by [`safe`]. `E` is the operation's error type and `X` the
/// transformer applied to absorbed errors.
#[derive(Debug, Clone)]
pub struct Safe<F, E, X = Identity> {
    operation: F,
    filter: ErrorFilter<E>,
    transformer: X,
}

/// Wraps `operation` so that its failures are absorbed into an [`Outcome`].
///
/// With no filter configured every error is absorbed.
pub fn safe<F, E>(operation: F) -> Safe<F, E> {
    Safe {
        operation,
        filter: ErrorFilter::any(),
        transformer: Identity,
    }
}

impl<F, E, X> Safe<F, E, X> {
    /// Replaces the error filter.
    #[must_use]
    pub fn filter(mut self, filter: ErrorFilter<E>) -> Self {
        self.filter = filter;
        self
    }

    /// Adds one kind to the error filter.
    #[must_use]
    pub fn catching(mut self, kind: ErrorKind<E>) -> Self {
        self.filter.push(kind);
        self
    }

    /// Returns the configured filter.
    #[must_use]
    pub fn error_filter(&self) -> &ErrorFilter<E> {
        &self.filter
    }

    /// Replaces the transformer applied to absorbed errors.
    pub fn transform<Y>(self, transformer: Y) -> Safe<F, E, Y> {
        Safe {
            operation: self.operation,
            filter: self.filter,
            transformer,
        }
    }

    /// Maps absorbed errors with `f`.
    pub fn map_err<G>(self, f: G) -> Safe<F, E, MapErr<G>> {
        self.transform(MapErr(f))
    }

    /// Maps absorbed errors with a fallible `f`; its `Err` value becomes the
    /// absorbed error verbatim.
    pub fn try_map_err<G>(self, f: G) -> Safe<F, E, TryMapErr<G>> {
        self.transform(TryMapErr(f))
    }

    /// Maps absorbed errors with an asynchronous, fallible `f`.
    pub fn map_err_async<G>(self, f: G) -> Safe<F, E, MapErrAsync<G>> {
        self.transform(MapErrAsync(f))
    }

    /// Runs a synchronous operation.
    ///
    /// Returns the outer `Err` only when the failure is filtered out.
    pub fn call<A, T>(&self, args: A) -> Result<Outcome<T, <X as ErrorTransformer<E>>::Output>, E>
    where
        F: Fn(A) -> Result<T, E>,
        X: ErrorTransformer<E>,
    {
        match (self.operation)(args) {
            Ok(value) => Ok(Outcome::Data(value)),
            Err(error) => {
                let error = self.absorb(error)?;
                let settled = self.transformer.transform(error);
                Ok(Outcome::Error(settled.unwrap_or_else(|failure| failure)))
            }
        }
    }

    /// Runs an asynchronous operation.
    ///
    /// Returns the outer `Err` only when the failure is filtered out.
    pub async fn call_async<A, Fut, T>(
        &self,
        args: A,
    ) -> Result<Outcome<T, <X as AsyncErrorTransformer<E>>::Output>, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        X: AsyncErrorTransformer<E>,
    {
        match (self.operation)(args).await {
            Ok(value) => Ok(Outcome::Data(value)),
            Err(error) => {
                let error = self.absorb(error)?;
                let settled = self.transformer.transform(error).await;
                Ok(Outcome::Error(settled.unwrap_or_else(|failure| failure)))
            }
        }
    }

    fn absorb(&self, error: E) -> Result<E, E> {
        if self.filter.absorbs(&error) {
            trace!(kinds = self.filter.kinds().len(), "safe call absorbed error");
            Ok(error)
        } else {
            trace!(kinds = self.filter.kinds().len(), "safe call propagated unmatched error");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::test_utils::run_test;

    #[derive(Debug, thiserror::Error)]
    #[error("custom: {0}")]
    struct CustomError(String);

    #[derive(Debug, thiserror::Error)]
    #[error("another: {0}")]
    struct AnotherError(String);

    fn fail_with(error: impl Into<BoxError>) -> Result<i32, BoxError> {
        Err(error.into())
    }

    #[test]
    fn sync_success_is_data() {
        let double = safe(|x: i32| Ok::<_, BoxError>(x * 2));
        let outcome = double.call(2).unwrap();
        assert_eq!(outcome.data(), Some(4));
    }

    #[test]
    fn sync_error_is_absorbed() {
        let failing = safe(|(): ()| fail_with("test error"));
        let (error, data) = failing.call(()).unwrap().into_tuple();
        assert_eq!(error.unwrap().to_string(), "test error");
        assert!(data.is_none());
    }

    #[test]
    fn sync_specific_kind_is_absorbed() {
        let failing = safe(|(): ()| fail_with(CustomError("x".into())))
            .filter(ErrorFilter::any().of::<CustomError>());
        let error = failing.call(()).unwrap().error().unwrap();
        assert!(error.is::<CustomError>());
    }

    #[test]
    fn sync_unmatched_kind_propagates() {
        let failing = safe(|(): ()| fail_with(AnotherError("another error".into())))
            .catching(ErrorKind::of::<CustomError>());
        let propagated = failing.call(()).unwrap_err();
        assert!(propagated.is::<AnotherError>());
        assert_eq!(propagated.to_string(), "another: another error");
    }

    #[test]
    fn async_success_and_error() {
        run_test(async {
            let double = safe(|x: i32| async move { Ok::<_, BoxError>(x * 2) });
            assert_eq!(double.call_async(2).await.unwrap().data(), Some(4));

            let failing = safe(|(): ()| async { fail_with("async error") });
            let outcome = failing.call_async(()).await.unwrap();
            assert_eq!(outcome.error().unwrap().to_string(), "async error");
        });
    }

    #[test]
    fn async_unmatched_kind_propagates() {
        run_test(async {
            let failing = safe(|(): ()| async { fail_with(AnotherError("another error".into())) })
                .filter(ErrorFilter::any().of::<CustomError>());
            let propagated = failing.call_async(()).await.unwrap_err();
            assert!(propagated.to_string().contains("another error"));
        });
    }

    #[test]
    fn transformer_remaps_absorbed_error() {
        run_test(async {
            let failing = safe(|(): ()| async { fail_with("underlying error") })
                .map_err(|e: BoxError| CustomError(e.to_string()));
            let error = failing.call_async(()).await.unwrap().error().unwrap();
            assert_eq!(error.0, "underlying error");
        });
    }

    #[test]
    fn failing_transformer_value_is_the_error() {
        let failing = safe(|(): ()| Err::<i32, _>(7))
            .try_map_err(|code: i32| if code > 5 { Err(-code) } else { Ok(code) });
        assert_eq!(failing.call(()), Ok(Outcome::Error(-7)));
    }

    #[test]
    fn async_transformer_is_awaited() {
        run_test(async {
            let failing = safe(|(): ()| async { Err::<i32, _>("boom") })
                .map_err_async(|e: &'static str| async move { Ok::<_, String>(e.to_uppercase()) });
            let outcome = failing.call_async(()).await;
            assert_eq!(outcome, Ok(Outcome::Error("BOOM".to_string())));
        });
    }

    #[test]
    fn transformer_skipped_for_unmatched_errors() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let failing = safe(|(): ()| Err::<(), _>(1))
            .catching(ErrorKind::when("two", |e: &i32| *e == 2))
            .map_err(|e: i32| {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                e
            });
        assert_eq!(failing.call(()), Err(1));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
