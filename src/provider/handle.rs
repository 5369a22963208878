//! Chainable provider handles.

use super::builder::ProviderBuilder;
use super::hooks::{HookSummary, Step, step, step_async};
use crate::safe::{ErrorFilter, safe};
use crate::tracing_compat::trace;
use crate::types::Outcome;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Stage of a chain on which `and_then` is still available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Open;

/// Stage of a chain after `and_catch`; the value type is fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caught;

/// A callable provider.
///
/// Handles are cheap to clone and share their hooks: a hook installed through
/// any clone affects every clone and every later call. Installing a hook of a
/// kind that is already set replaces it. [`and_then`](Self::and_then) returns
/// a handle with a new value type; the finally and mock hooks stay shared
/// across that boundary while the catch hook belongs to one value type.
///
/// Errors propagate as `Err` from [`call`](Self::call); see [`SafeProvider`]
/// for the variant that settles into an [`Outcome`].
pub struct Provider<A, T, E, U = T, S = Open> {
    pub(crate) builder: Arc<ProviderBuilder<A, T, E, U>>,
    _stage: PhantomData<fn() -> S>,
}

impl<A, T, E, U> Provider<A, T, E, U> {
    pub(crate) fn from_builder(builder: Arc<ProviderBuilder<A, T, E, U>>) -> Self {
        Self {
            builder,
            _stage: PhantomData,
        }
    }
}

impl<A, T, E, U, S> Provider<A, T, E, U, S>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    U: Send + 'static,
{
    /// Calls the provider.
    ///
    /// The returned future owns a reference to the provider state and can be
    /// moved to another thread.
    pub fn call(&self, args: A) -> impl Future<Output = Result<U, E>> + Send + use<A, T, E, U, S> {
        let builder = Arc::clone(&self.builder);
        async move { builder.execute(args).await }
    }

    /// Installs the recovery hook, run on any failure of the operation or the
    /// `and_then` hook. Its `Ok` recovers the call; its `Err` becomes the
    /// call's error.
    #[must_use]
    pub fn and_catch<H>(&self, hook: H) -> Provider<A, T, E, U, Caught>
    where
        H: Fn(E) -> Result<U, E> + Send + Sync + 'static,
    {
        *self.builder.hooks.on_error.write() = Some(step(hook));
        trace!("provider catch hook installed");
        self.restage()
    }

    /// Asynchronous form of [`and_catch`](Self::and_catch).
    #[must_use]
    pub fn and_catch_async<H, Fut>(&self, hook: H) -> Provider<A, T, E, U, Caught>
    where
        H: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
    {
        *self.builder.hooks.on_error.write() = Some(step_async(hook));
        trace!("provider catch hook installed");
        self.restage()
    }

    /// Installs a side effect run after every settlement, success or failure.
    #[must_use]
    pub fn and_finally<H>(&self, hook: H) -> Self
    where
        H: Fn() + Send + Sync + 'static,
    {
        self.and_try_finally(move || {
            hook();
            Ok(())
        })
    }

    /// Installs a fallible finally hook. When it fails its error replaces the
    /// call's result, including a successful one.
    #[must_use]
    pub fn and_try_finally<H>(&self, hook: H) -> Self
    where
        H: Fn() -> Result<(), E> + Send + Sync + 'static,
    {
        *self.builder.hooks.on_finally.write() = Some(Arc::new(hook));
        trace!("provider finally hook installed");
        self.clone()
    }

    /// Installs the mock operation, used instead of the real one whenever the
    /// provider's gate is enabled at call time.
    #[must_use]
    pub fn and_mock<F, Fut>(&self, mock: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        *self.builder.hooks.mock.write() = Some(step_async(mock));
        trace!("provider mock installed");
        self.clone()
    }

    /// Wraps this provider so its calls settle into an [`Outcome`].
    #[must_use]
    pub fn into_safe(self, filter: ErrorFilter<E>) -> SafeProvider<A, T, E, U, S> {
        SafeProvider::new(self, filter)
    }

    /// Reports which hooks are currently set.
    #[must_use]
    pub fn hooks(&self) -> HookSummary {
        self.builder.hooks()
    }

    fn restage<S2>(&self) -> Provider<A, T, E, U, S2> {
        Provider {
            builder: Arc::clone(&self.builder),
            _stage: PhantomData,
        }
    }
}

impl<A, T, E, U> Provider<A, T, E, U, Open>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    U: Send + 'static,
{
    /// Installs the success transform, producing a provider with value type
    /// `V`.
    ///
    /// The hook receives the operation's value and replaces any earlier
    /// `and_then`; hooks are never composed. The returned provider shares the
    /// finally hook and mock with this one and with its clones, so either
    /// side may still set them. A catch hook is not carried over because its
    /// value type no longer fits.
    #[must_use]
    pub fn and_then<V, H>(self, hook: H) -> Provider<A, T, E, V>
    where
        H: Fn(T) -> Result<V, E> + Send + Sync + 'static,
        V: Send + 'static,
    {
        self.rebase(step(hook))
    }

    /// Asynchronous form of [`and_then`](Self::and_then).
    #[must_use]
    pub fn and_then_async<V, H, Fut>(self, hook: H) -> Provider<A, T, E, V>
    where
        H: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        V: Send + 'static,
    {
        self.rebase(step_async(hook))
    }

    fn rebase<V>(self, on_settled: Step<T, V, E>) -> Provider<A, T, E, V>
    where
        V: Send + 'static,
    {
        trace!("provider then hook installed");
        Provider::from_builder(Arc::new(self.builder.rebase(on_settled)))
    }
}

impl<A, T, E, U, S> Clone for Provider<A, T, E, U, S> {
    fn clone(&self) -> Self {
        Self {
            builder: Arc::clone(&self.builder),
            _stage: PhantomData,
        }
    }
}

impl<A, T, E, U, S> fmt::Debug for Provider<A, T, E, U, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("stage", &std::any::type_name::<S>())
            .field("builder", &self.builder)
            .finish()
    }
}

/// A provider whose calls settle into an [`Outcome`].
///
/// Failures matching the filter, after the catch and finally hooks have run,
/// become `Ok(Outcome::Error(..))`. Failures the filter does not recognize
/// propagate as the outer `Err`.
pub struct SafeProvider<A, T, E, U = T, S = Open> {
    provider: Provider<A, T, E, U, S>,
    filter: ErrorFilter<E>,
}

impl<A, T, E, U, S> SafeProvider<A, T, E, U, S>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    U: Send + 'static,
{
    pub(crate) fn new(provider: Provider<A, T, E, U, S>, filter: ErrorFilter<E>) -> Self {
        Self { provider, filter }
    }

    /// Calls the provider and settles the result.
    pub fn call(
        &self,
        args: A,
    ) -> impl Future<Output = Result<Outcome<U, E>, E>> + Send + use<A, T, E, U, S> {
        let builder = Arc::clone(&self.provider.builder);
        let wrapped = safe(move |args: A| {
            let builder = Arc::clone(&builder);
            async move { builder.execute(args).await }
        })
        .filter(self.filter.clone());
        async move { wrapped.call_async(args).await }
    }

    /// See [`Provider::and_catch`].
    #[must_use]
    pub fn and_catch<H>(&self, hook: H) -> SafeProvider<A, T, E, U, Caught>
    where
        H: Fn(E) -> Result<U, E> + Send + Sync + 'static,
    {
        SafeProvider::new(self.provider.and_catch(hook), self.filter.clone())
    }

    /// See [`Provider::and_catch_async`].
    #[must_use]
    pub fn and_catch_async<H, Fut>(&self, hook: H) -> SafeProvider<A, T, E, U, Caught>
    where
        H: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
    {
        SafeProvider::new(self.provider.and_catch_async(hook), self.filter.clone())
    }

    /// See [`Provider::and_finally`].
    #[must_use]
    pub fn and_finally<H>(&self, hook: H) -> Self
    where
        H: Fn() + Send + Sync + 'static,
    {
        Self::new(self.provider.and_finally(hook), self.filter.clone())
    }

    /// See [`Provider::and_try_finally`].
    #[must_use]
    pub fn and_try_finally<H>(&self, hook: H) -> Self
    where
        H: Fn() -> Result<(), E> + Send + Sync + 'static,
    {
        Self::new(self.provider.and_try_finally(hook), self.filter.clone())
    }

    /// See [`Provider::and_mock`].
    #[must_use]
    pub fn and_mock<F, Fut>(&self, mock: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::new(self.provider.and_mock(mock), self.filter.clone())
    }

    /// Returns the configured filter.
    #[must_use]
    pub fn error_filter(&self) -> &ErrorFilter<E> {
        &self.filter
    }

    /// Reports which hooks are currently set.
    #[must_use]
    pub fn hooks(&self) -> HookSummary {
        self.provider.hooks()
    }

    /// Returns the underlying provider, whose calls propagate errors.
    #[must_use]
    pub fn into_inner(self) -> Provider<A, T, E, U, S> {
        self.provider
    }
}

impl<A, T, E, U> SafeProvider<A, T, E, U, Open>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    U: Send + 'static,
{
    /// See [`Provider::and_then`].
    #[must_use]
    pub fn and_then<V, H>(self, hook: H) -> SafeProvider<A, T, E, V>
    where
        H: Fn(T) -> Result<V, E> + Send + Sync + 'static,
        V: Send + 'static,
    {
        SafeProvider::new(self.provider.and_then(hook), self.filter)
    }

    /// See [`Provider::and_then_async`].
    #[must_use]
    pub fn and_then_async<V, H, Fut>(self, hook: H) -> SafeProvider<A, T, E, V>
    where
        H: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        V: Send + 'static,
    {
        SafeProvider::new(self.provider.and_then_async(hook), self.filter)
    }
}

impl<A, T, E, U, S> Clone for SafeProvider<A, T, E, U, S> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<A, T, E, U, S> fmt::Debug for SafeProvider<A, T, E, U, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeProvider")
            .field("provider", &self.provider)
            .field("filter", &self.filter)
            .finish()
    }
}
