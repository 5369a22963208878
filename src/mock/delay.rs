//! Latency simulation for mock operations.

use crate::time::sleep;
use crate::types::{CancelToken, Cancelled};
use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::task::Poll;
use std::time::Duration;

/// Resolves to `produce()` after `duration`, unless `signal` fires first.
///
/// Fails with [`Cancelled`] immediately if the signal is already cancelled, or
/// as soon as it fires while waiting. `produce` runs only on the success
/// path, and cancelling after resolution has no effect.
///
/// # Example
///
/// ```
/// use safe_provider::mock::delay;
/// use std::time::Duration;
///
/// let value = futures_lite::future::block_on(delay(|| 12, Duration::from_millis(5), None));
/// assert_eq!(value.unwrap(), 12);
/// ```
pub async fn delay<T, F>(
    produce: F,
    duration: Duration,
    signal: Option<&CancelToken>,
) -> Result<T, Cancelled>
where
    F: FnOnce() -> T,
{
    if let Some(token) = signal {
        token.check()?;
    }

    let mut timer = sleep(duration);
    let mut cancellation = signal.map(CancelToken::cancelled);

    poll_fn(|cx| {
        if let Some(waiter) = cancellation.as_mut() {
            if let Poll::Ready(reason) = Pin::new(waiter).poll(cx) {
                return Poll::Ready(Err(Cancelled::new(reason)));
            }
        }
        Pin::new(&mut timer).poll(cx).map(Ok)
    })
    .await?;

    Ok(produce())
}
