//! Type-erased operation steps and the per-provider hook set.

use futures_lite::future::Boxed;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;

/// One asynchronous, fallible step: the operation itself, the settled hook,
/// or the error hook.
pub(crate) type Step<I, O, E> = Arc<dyn Fn(I) -> Boxed<Result<O, E>> + Send + Sync>;

/// Side-effect hook run after every settlement.
pub(crate) type FinallyHook<E> = Arc<dyn Fn() -> Result<(), E> + Send + Sync>;

/// Erases an asynchronous step.
pub(crate) fn step_async<I, O, E, F, Fut>(f: F) -> Step<I, O, E>
where
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
{
    Arc::new(move |input| -> Boxed<Result<O, E>> { Box::pin(f(input)) })
}

/// Erases a synchronous step.
pub(crate) fn step<I, O, E, F>(f: F) -> Step<I, O, E>
where
    F: Fn(I) -> Result<O, E> + Send + Sync + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    Arc::new(move |input| -> Boxed<Result<O, E>> { Box::pin(std::future::ready(f(input))) })
}

/// The settled hook used until `and_then` replaces it.
pub(crate) fn passthrough<T, E>() -> Step<T, T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    step(Ok)
}

/// A replaceable hook shared by every hook set derived from the same provider.
pub(crate) type SharedSlot<H> = Arc<RwLock<Option<H>>>;

/// Hooks owned by one provider.
///
/// The settled hook is fixed per hook set because it determines the value
/// type `U`, and the error hook is typed on `U` as well. The finally hook and
/// the mock do not depend on `U`; their slots are shared with every hook set
/// produced by [`rebase`](Self::rebase). All hooks except the settled one may
/// be replaced at any time and are read at the pipeline step that uses them.
pub(crate) struct HookSet<A, T, U, E> {
    pub(crate) on_settled: Step<T, U, E>,
    pub(crate) on_error: RwLock<Option<Step<E, U, E>>>,
    pub(crate) on_finally: SharedSlot<FinallyHook<E>>,
    pub(crate) mock: SharedSlot<Step<A, T, E>>,
    has_settled_hook: bool,
}

impl<A, T, U, E> HookSet<A, T, U, E> {
    /// A hook set with only the settled hook configured.
    pub(crate) fn new(on_settled: Step<T, U, E>, has_settled_hook: bool) -> Self {
        Self {
            on_settled,
            on_error: RwLock::new(None),
            on_finally: Arc::new(RwLock::new(None)),
            mock: Arc::new(RwLock::new(None)),
            has_settled_hook,
        }
    }

    /// Builds a hook set around a new settled hook. The finally and mock slots
    /// stay shared with `self`; the error hook starts empty.
    pub(crate) fn rebase<V>(&self, on_settled: Step<T, V, E>) -> HookSet<A, T, V, E> {
        HookSet {
            on_settled,
            on_error: RwLock::new(None),
            on_finally: Arc::clone(&self.on_finally),
            mock: Arc::clone(&self.mock),
            has_settled_hook: true,
        }
    }

    /// Reports which hooks are set.
    pub(crate) fn summary(&self) -> HookSummary {
        HookSummary {
            then: self.has_settled_hook,
            catch: self.on_error.read().is_some(),
            finally: self.on_finally.read().is_some(),
            mock: self.mock.read().is_some(),
        }
    }
}

/// Which hooks a provider currently has configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookSummary {
    /// An `and_then` hook is set.
    pub then: bool,
    /// An `and_catch` hook is set.
    pub catch: bool,
    /// An `and_finally` hook is set.
    pub finally: bool,
    /// An `and_mock` operation is set.
    pub mock: bool,
}

impl HookSummary {
    /// Returns true if no hook is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.then || self.catch || self.finally || self.mock)
    }
}
