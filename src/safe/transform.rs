//! Error transformers applied to absorbed errors.
//!
//! A transformer returns `Ok(replacement)` or `Err(failure)`; either value
//! becomes the absorbed error, so a failing transformer never escapes the
//! outcome.

use std::future::Future;

/// Synchronous error transformer, usable by [`Safe::call`](super::Safe::call)
/// and [`Safe::call_async`](super::Safe::call_async).
pub trait ErrorTransformer<E> {
    /// The error type placed in the outcome.
    type Output;

    /// Maps an absorbed error.
    fn transform(&self, error: E) -> Result<Self::Output, Self::Output>;
}

/// Asynchronous error transformer, usable by
/// [`Safe::call_async`](super::Safe::call_async).
pub trait AsyncErrorTransformer<E> {
    /// The error type placed in the outcome.
    type Output;

    /// Maps an absorbed error.
    fn transform(&self, error: E) -> impl Future<Output = Result<Self::Output, Self::Output>> + Send;
}

/// Keeps the absorbed error unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<E> ErrorTransformer<E> for Identity {
    type Output = E;

    fn transform(&self, error: E) -> Result<E, E> {
        Ok(error)
    }
}

impl<E: Send> AsyncErrorTransformer<E> for Identity {
    type Output = E;

    fn transform(&self, error: E) -> impl Future<Output = Result<E, E>> + Send {
        std::future::ready(Ok(error))
    }
}

/// Infallible mapping, created by [`Safe::map_err`](super::Safe::map_err).
#[derive(Debug, Clone, Copy)]
pub struct MapErr<F>(pub(crate) F);

impl<E, F, E2> ErrorTransformer<E> for MapErr<F>
where
    F: Fn(E) -> E2,
{
    type Output = E2;

    fn transform(&self, error: E) -> Result<E2, E2> {
        Ok((self.0)(error))
    }
}

impl<E, F, E2> AsyncErrorTransformer<E> for MapErr<F>
where
    F: Fn(E) -> E2,
    E2: Send,
{
    type Output = E2;

    fn transform(&self, error: E) -> impl Future<Output = Result<E2, E2>> + Send {
        std::future::ready(Ok((self.0)(error)))
    }
}

/// Fallible mapping, created by [`Safe::try_map_err`](super::Safe::try_map_err).
#[derive(Debug, Clone, Copy)]
pub struct TryMapErr<F>(pub(crate) F);

impl<E, F, E2> ErrorTransformer<E> for TryMapErr<F>
where
    F: Fn(E) -> Result<E2, E2>,
{
    type Output = E2;

    fn transform(&self, error: E) -> Result<E2, E2> {
        (self.0)(error)
    }
}

impl<E, F, E2> AsyncErrorTransformer<E> for TryMapErr<F>
where
    F: Fn(E) -> Result<E2, E2>,
    E2: Send,
{
    type Output = E2;

    fn transform(&self, error: E) -> impl Future<Output = Result<E2, E2>> + Send {
        std::future::ready((self.0)(error))
    }
}

/// Asynchronous mapping, created by
/// [`Safe::map_err_async`](super::Safe::map_err_async).
#[derive(Debug, Clone, Copy)]
pub struct MapErrAsync<F>(pub(crate) F);

impl<E, F, Fut, E2> AsyncErrorTransformer<E> for MapErrAsync<F>
where
    F: Fn(E) -> Fut,
    Fut: Future<Output = Result<E2, E2>> + Send,
{
    type Output = E2;

    fn transform(&self, error: E) -> impl Future<Output = Result<E2, E2>> + Send {
        (self.0)(error)
    }
}
