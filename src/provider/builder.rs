//! Provider construction and the execution pipeline.

use super::handle::{Provider, SafeProvider};
use super::hooks::{HookSet, HookSummary, Step, passthrough, step_async};
use crate::mock::{MockFlag, MockGate};
use crate::safe::ErrorFilter;
use crate::tracing_compat::{debug, trace};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Shared state behind a [`Provider`] handle.
///
/// Holds the real operation, the gate consulted on every call, and the
/// hooks. `A` is the argument type, `T` the operation's value type, `U` the
/// value type after `and_then`, and `E` the error type shared by every step.
pub struct ProviderBuilder<A, T, E, U = T> {
    operation: Step<A, T, E>,
    gate: Arc<dyn MockGate>,
    pub(crate) hooks: HookSet<A, T, U, E>,
}

impl<A, T, E> ProviderBuilder<A, T, E>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    /// Starts a provider around `operation`, gated by [`MockFlag::global`].
    pub fn new<F, Fut>(operation: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            operation: step_async(operation),
            gate: Arc::new(MockFlag::global()),
            hooks: HookSet::new(passthrough(), false),
        }
    }
}

impl<A, T, E, U> ProviderBuilder<A, T, E, U>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    U: Send + 'static,
{
    /// Replaces the mock gate.
    #[must_use]
    pub fn gate(mut self, gate: impl MockGate + 'static) -> Self {
        self.gate = Arc::new(gate);
        self
    }

    /// Finishes construction, returning a chainable handle.
    #[must_use]
    pub fn build(self) -> Provider<A, T, E, U> {
        Provider::from_builder(Arc::new(self))
    }

    /// Finishes construction, returning a handle whose calls settle into an
    /// [`Outcome`](crate::Outcome).
    #[must_use]
    pub fn build_safe(self, filter: ErrorFilter<E>) -> SafeProvider<A, T, E, U> {
        SafeProvider::new(self.build(), filter)
    }

    /// Reports which hooks are currently set.
    #[must_use]
    pub fn hooks(&self) -> HookSummary {
        self.hooks.summary()
    }

    /// Runs one call through the pipeline.
    ///
    /// 1. The mock replaces the operation when the gate is enabled and a mock
    ///    is set.
    /// 2. A successful value goes through the `and_then` hook.
    /// 3. Any failure so far goes through the `and_catch` hook, if set.
    /// 4. The `and_finally` hook runs last; if it fails, its error replaces
    ///    the result.
    ///
    /// Each hook is read when its step is reached, so hooks installed while a
    /// call is in flight apply to that call's later steps.
    pub async fn execute(&self, args: A) -> Result<U, E> {
        let operation = self.select_operation();
        let on_settled = Arc::clone(&self.hooks.on_settled);

        let settled = match operation(args).await {
            Ok(value) => on_settled(value).await,
            Err(error) => Err(error),
        };

        let settled = match settled {
            Err(error) => {
                let on_error = self.hooks.on_error.read().clone();
                match on_error {
                    Some(on_error) => {
                        trace!("provider catch hook handling error");
                        on_error(error).await
                    }
                    None => Err(error),
                }
            }
            ok => ok,
        };

        let on_finally = self.hooks.on_finally.read().clone();
        if let Some(on_finally) = on_finally {
            if let Err(error) = on_finally() {
                debug!("provider finally hook failed; replacing result");
                return Err(error);
            }
        }
        settled
    }

    fn select_operation(&self) -> Step<A, T, E> {
        if self.gate.is_enabled() {
            let mock = self.hooks.mock.read().clone();
            if let Some(mock) = mock {
                debug!("provider running mock operation");
                return mock;
            }
        }
        Arc::clone(&self.operation)
    }

    /// A builder sharing this one's operation and gate, with a new settled
    /// hook. The finally and mock slots stay shared with this builder; the
    /// catch hook starts empty, since its value type changes.
    pub(crate) fn rebase<V>(&self, on_settled: Step<T, V, E>) -> ProviderBuilder<A, T, E, V> {
        ProviderBuilder {
            operation: Arc::clone(&self.operation),
            gate: Arc::clone(&self.gate),
            hooks: self.hooks.rebase(on_settled),
        }
    }
}

impl<A, T, E, U> fmt::Debug for ProviderBuilder<A, T, E, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderBuilder")
            .field("mock_enabled", &self.gate.is_enabled())
            .field("hooks", &self.hooks.summary())
            .finish_non_exhaustive()
    }
}
