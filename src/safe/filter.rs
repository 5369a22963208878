//! Error-kind filters.

use crate::error::BoxError;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type Matcher<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// One recognizable kind of error.
pub struct ErrorKind<E> {
    name: Cow<'static, str>,
    matcher: Matcher<E>,
}

impl<E> ErrorKind<E> {
    /// A kind recognized by `predicate`.
    ///
    /// ```
    /// use safe_provider::safe::ErrorKind;
    ///
    /// #[derive(Debug)]
    /// enum FetchError { Timeout, NotFound }
    ///
    /// let timeouts = ErrorKind::when("timeout", |e: &FetchError| matches!(e, FetchError::Timeout));
    /// assert!(timeouts.matches(&FetchError::Timeout));
    /// assert!(!timeouts.matches(&FetchError::NotFound));
    /// ```
    pub fn when<P>(name: impl Into<Cow<'static, str>>, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            matcher: Arc::new(predicate),
        }
    }

    /// Returns the kind's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if `error` is of this kind.
    #[must_use]
    pub fn matches(&self, error: &E) -> bool {
        (self.matcher)(error)
    }
}

impl ErrorKind<BoxError> {
    /// Matches boxed errors whose concrete type is `K`.
    #[must_use]
    pub fn of<K>() -> Self
    where
        K: std::error::Error + 'static,
    {
        Self::when(std::any::type_name::<K>(), |error: &BoxError| error.is::<K>())
    }
}

impl<E> Clone for ErrorKind<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            matcher: Arc::clone(&self.matcher),
        }
    }
}

impl<E> fmt::Debug for ErrorKind<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorKind").field(&self.name).finish()
    }
}

/// An ordered set of error kinds to absorb.
///
/// An empty filter absorbs every error.
pub struct ErrorFilter<E> {
    kinds: Vec<ErrorKind<E>>,
}

impl<E> ErrorFilter<E> {
    /// A filter that absorbs every error.
    #[must_use]
    pub fn any() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Adds a kind to the filter.
    #[must_use]
    pub fn with(mut self, kind: ErrorKind<E>) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Returns true if the filter has no kinds (and so absorbs everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Returns the configured kinds in order.
    #[must_use]
    pub fn kinds(&self) -> &[ErrorKind<E>] {
        &self.kinds
    }

    /// Returns true if `error` should be absorbed.
    #[must_use]
    pub fn absorbs(&self, error: &E) -> bool {
        self.kinds.is_empty() || self.kinds.iter().any(|kind| kind.matches(error))
    }

    pub(crate) fn push(&mut self, kind: ErrorKind<E>) {
        self.kinds.push(kind);
    }
}

impl ErrorFilter<BoxError> {
    /// Adds the concrete error type `K` to the filter.
    #[must_use]
    pub fn of<K>(self) -> Self
    where
        K: std::error::Error + 'static,
    {
        self.with(ErrorKind::of::<K>())
    }
}

impl<E> Default for ErrorFilter<E> {
    fn default() -> Self {
        Self::any()
    }
}

impl<E> Clone for ErrorFilter<E> {
    fn clone(&self) -> Self {
        Self {
            kinds: self.kinds.clone(),
        }
    }
}

impl<E> fmt::Debug for ErrorFilter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.kinds).finish()
    }
}

impl<E> FromIterator<ErrorKind<E>> for ErrorFilter<E> {
    fn from_iter<I: IntoIterator<Item = ErrorKind<E>>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}
