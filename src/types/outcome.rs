//! Two-state outcome type.
//!
//! An [`Outcome`] holds exactly one of a data value or an absorbed error.
//! Unlike a nullable `(error, data)` pair, a successful value that happens to
//! be "empty" (`()`, `None`) is still [`Outcome::Data`], so "no data" and
//! "data is empty" never collide. The pair shape is produced only at the
//! boundary by [`Outcome::into_tuple`].

use core::fmt;

/// The settled state of a safe call: data XOR error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "an Outcome may hold an absorbed error"]
pub enum Outcome<T, E> {
    /// The operation (and its hooks) produced a value.
    Data(T),
    /// The operation failed with an error that was absorbed.
    Error(E),
}

impl<T, E> Outcome<T, E> {
    /// Returns true if this outcome carries data.
    #[must_use]
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// Returns true if this outcome carries an absorbed error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the data, discarding any error.
    #[must_use]
    pub fn data(self) -> Option<T> {
        match self {
            Self::Data(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// Returns the error, discarding any data.
    #[must_use]
    pub fn error(self) -> Option<E> {
        match self {
            Self::Data(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    /// Borrows the contents.
    pub const fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Self::Data(value) => Outcome::Data(value),
            Self::Error(error) => Outcome::Error(error),
        }
    }

    /// Maps the data value.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U, E> {
        match self {
            Self::Data(value) => Outcome::Data(f(value)),
            Self::Error(error) => Outcome::Error(error),
        }
    }

    /// Maps the absorbed error.
    pub fn map_err<E2, F: FnOnce(E) -> E2>(self, f: F) -> Outcome<T, E2> {
        match self {
            Self::Data(value) => Outcome::Data(value),
            Self::Error(error) => Outcome::Error(f(error)),
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Data(value) => Ok(value),
            Self::Error(error) => Err(error),
        }
    }

    /// Converts into the `(error, data)` pair used at compatibility boundaries.
    ///
    /// Exactly one slot is `Some`.
    #[must_use]
    pub fn into_tuple(self) -> (Option<E>, Option<T>) {
        match self {
            Self::Data(value) => (None, Some(value)),
            Self::Error(error) => (Some(error), None),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Data(value),
            Err(error) => Self::Error(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}

impl<T: fmt::Display, E: fmt::Display> fmt::Display for Outcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(value) => write!(f, "data: {value}"),
            Self::Error(error) => write!(f, "error: {error}"),
        }
    }
}
