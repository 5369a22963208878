//! Cancellation reason, kind, and signal types.
//!
//! Providers never create or manage cancellation themselves. An operation that
//! wants to be cancellable takes a [`CancelToken`] among its arguments and
//! fails with [`Cancelled`] when the token fires; that failure then flows
//! through the provider's ordinary error path.

use core::fmt;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

/// The kind of cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CancelKind {
    /// Explicit cancellation requested by user code.
    User,
    /// Cancellation due to timeout/deadline.
    Timeout,
    /// Cancellation due to process or component shutdown.
    Shutdown,
}

impl CancelKind {
    /// Returns the severity of this cancellation kind.
    ///
    /// Higher severity cancellations take precedence when strengthening.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::User => 0,
            Self::Timeout => 1,
            Self::Shutdown => 2,
        }
    }
}

impl fmt::Display for CancelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Timeout => write!(f, "timeout"),
            Self::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// The reason for a cancellation, including kind and optional context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelReason {
    /// The kind of cancellation.
    pub kind: CancelKind,
    /// Optional human-readable message.
    pub message: Option<&'static str>,
}

impl CancelReason {
    /// Creates a new cancellation reason with the given kind.
    #[must_use]
    pub const fn new(kind: CancelKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Creates a user cancellation reason with a message.
    #[must_use]
    pub const fn user(message: &'static str) -> Self {
        Self {
            kind: CancelKind::User,
            message: Some(message),
        }
    }

    /// Creates a timeout cancellation reason.
    #[must_use]
    pub const fn timeout() -> Self {
        Self::new(CancelKind::Timeout)
    }

    /// Creates a shutdown cancellation reason.
    #[must_use]
    pub const fn shutdown() -> Self {
        Self::new(CancelKind::Shutdown)
    }

    /// Strengthens this reason with another, keeping the more severe one.
    ///
    /// Returns `true` if the reason was changed.
    pub fn strengthen(&mut self, other: &Self) -> bool {
        if other.kind > self.kind {
            self.kind = other.kind;
            self.message = other.message;
            return true;
        }

        if other.kind < self.kind {
            return false;
        }

        match (self.message, other.message) {
            (None, Some(msg)) => {
                self.message = Some(msg);
                true
            }
            (Some(current), Some(candidate)) if candidate < current => {
                self.message = Some(candidate);
                true
            }
            _ => false,
        }
    }

    /// Returns the kind of this cancellation reason.
    #[must_use]
    pub const fn kind(&self) -> CancelKind {
        self.kind
    }
}

impl Default for CancelReason {
    fn default() -> Self {
        Self::new(CancelKind::User)
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(msg) = self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

/// Error produced by an operation that observed its [`CancelToken`] firing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("operation cancelled ({reason})")]
pub struct Cancelled {
    reason: CancelReason,
}

impl Cancelled {
    /// Creates a cancellation error carrying `reason`.
    #[must_use]
    pub const fn new(reason: CancelReason) -> Self {
        Self { reason }
    }

    /// Returns the reason the operation was cancelled.
    #[must_use]
    pub const fn reason(&self) -> &CancelReason {
        &self.reason
    }
}

#[derive(Debug, Default)]
struct SignalState {
    reason: Option<CancelReason>,
    /// Wakers of pending [`Cancellation`] futures, keyed by registration.
    waiters: Vec<(u64, Waker)>,
    next_key: u64,
}

/// A caller-owned cancellation signal.
///
/// Clones share the same state: cancelling any clone cancels all of them.
/// The first cancellation wins; later calls only strengthen the recorded
/// reason.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<Mutex<SignalState>>,
}

impl CancelToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    ///
    /// Returns `true` if this call transitioned the token to cancelled.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        let waiters = {
            let mut state = self.state.lock();
            if let Some(current) = state.reason.as_mut() {
                current.strengthen(&reason);
                return false;
            }
            state.reason = Some(reason);
            std::mem::take(&mut state.waiters)
        };
        for (_, waker) in waiters {
            waker.wake();
        }
        true
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.lock().reason.is_some()
    }

    /// Returns the recorded cancellation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        self.state.lock().reason.clone()
    }

    /// Returns `Err(Cancelled)` if cancellation has been requested.
    pub fn check(&self) -> Result<(), Cancelled> {
        self.reason().map_or(Ok(()), |reason| Err(Cancelled::new(reason)))
    }

    /// Returns a future that resolves with the reason once the token fires.
    #[must_use]
    pub fn cancelled(&self) -> Cancellation {
        Cancellation {
            token: self.clone(),
            key: None,
        }
    }

    #[cfg(test)]
    fn waiter_count(&self) -> usize {
        self.state.lock().waiters.len()
    }
}

/// Future returned by [`CancelToken::cancelled`].
///
/// While pending it keeps one waker registered with the token. The
/// registration is removed when the future is dropped.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Cancellation {
    token: CancelToken,
    key: Option<u64>,
}

impl Future for Cancellation {
    type Output = CancelReason;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut state = this.token.state.lock();
        if let Some(reason) = state.reason.clone() {
            return Poll::Ready(reason);
        }
        let registered = this
            .key
            .and_then(|key| state.waiters.iter_mut().find(|(k, _)| *k == key));
        match registered {
            Some((_, waker)) => {
                if !waker.will_wake(cx.waker()) {
                    waker.clone_from(cx.waker());
                }
            }
            None => {
                let key = state.next_key;
                state.next_key += 1;
                state.waiters.push((key, cx.waker().clone()));
                this.key = Some(key);
            }
        }
        Poll::Pending
    }
}

impl Drop for Cancellation {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.token.state.lock().waiters.retain(|(k, _)| *k != key);
        }
    }
}
