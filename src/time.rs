//! Runtime-agnostic sleep.
//!
//! [`Sleep`] does not depend on any executor's timer. The first poll before the
//! deadline hands the waker to a timer thread that wakes the task once the
//! deadline has passed; later polls only refresh the stored waker. Dropping
//! the future signals its timer thread, which then exits without waiting for
//! the deadline.

use parking_lot::{Condvar, Mutex};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct TimerState {
    waker: Option<Waker>,
    dropped: bool,
}

/// State shared between a [`Sleep`] and its timer thread.
#[derive(Debug)]
struct Timer {
    state: Mutex<TimerState>,
    wakeup: Condvar,
}

impl Timer {
    /// Blocks until `deadline` or until the owning `Sleep` is dropped.
    fn run(&self, deadline: Instant) {
        let waker = {
            let mut state = self.state.lock();
            loop {
                if state.dropped {
                    return;
                }
                if Instant::now() >= deadline {
                    break state.waker.take();
                }
                self.wakeup.wait_until(&mut state, deadline);
            }
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Future that completes once its deadline has passed.
///
/// A sleep whose deadline cannot be represented never completes on its own;
/// it is meant to be raced against another future, such as a cancellation.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Sleep {
    deadline: Option<Instant>,
    timer: Option<Arc<Timer>>,
}

/// Returns a future that completes after `duration`.
///
/// Durations too large to add to the current instant yield a sleep that never
/// elapses.
pub fn sleep(duration: Duration) -> Sleep {
    Sleep {
        deadline: Instant::now().checked_add(duration),
        timer: None,
    }
}

impl Sleep {
    /// Returns a future that completes at `deadline`.
    pub fn until(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            timer: None,
        }
    }

    /// Returns the deadline, or `None` if it never elapses.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true if the deadline has passed.
    #[must_use]
    pub fn is_elapsed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn arm(deadline: Instant, waker: Waker) -> Option<Arc<Timer>> {
        let timer = Arc::new(Timer {
            state: Mutex::new(TimerState {
                waker: Some(waker),
                dropped: false,
            }),
            wakeup: Condvar::new(),
        });
        let shared = Arc::clone(&timer);
        thread::Builder::new()
            .name("safe-provider-sleep".into())
            .spawn(move || shared.run(deadline))
            .ok()
            .map(|_| timer)
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(deadline) = self.deadline else {
            return Poll::Pending;
        };
        if Instant::now() >= deadline {
            return Poll::Ready(());
        }
        if let Some(timer) = &self.timer {
            timer.state.lock().waker = Some(cx.waker().clone());
            return Poll::Pending;
        }
        self.timer = Self::arm(deadline, cx.waker().clone());
        if self.timer.is_none() {
            // No timer thread available: fall back to re-polling.
            cx.waker().wake_by_ref();
        }
        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            let mut state = timer.state.lock();
            state.dropped = true;
            state.waker = None;
            drop(state);
            timer.wakeup.notify_one();
        }
    }
}
