//! Gates an action behind several simultaneous rate constraints.
//!
//! The basic flow of `perform` is:
//! 1. Take the admission lock and read every window's current count.
//! 2. If every window has spare capacity, record one event in all of them
//!    (one atomic step as far as other callers are concerned) and run the
//!    action outside the lock.
//! 3. Otherwise compute the longest wait among the saturated windows, drop
//!    the lock, sleep, and re-check from scratch. Other callers and expiries
//!    can change the picture during the sleep, so a previously computed wait
//!    is never trusted.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time;
use tracing::trace;

use crate::window::{SlidingWindowCounter, Window};

/// Invokes an action while keeping every configured window within capacity.
///
/// All windows are checked and committed together under a single lock, so a
/// concurrent caller can never observe a state where only some windows have
/// been incremented. The lock is held only for that check-and-commit step,
/// never across a sleep or across the action itself.
pub struct RateLimiter<F> {
    action: F,
    counters: Vec<SlidingWindowCounter>,
    admission: Mutex<()>,
}

impl<F> RateLimiter<F> {
    pub fn new(action: F, windows: Vec<Window>) -> Self {
        Self {
            action,
            counters: windows.into_iter().map(SlidingWindowCounter::new).collect(),
            admission: Mutex::new(()),
        }
    }

    /// Block until every window has room, record the admission, then run the
    /// action and return its output.
    ///
    /// The action runs outside all locks, so a slow action never stalls other
    /// callers' admission checks. Admission order among concurrent waiters is
    /// unspecified. Dropping the returned future while it waits leaves the
    /// windows untouched; once admitted, the event stays recorded even if the
    /// action fails.
    pub async fn perform<T, Fut>(&self, arg: T) -> Fut::Output
    where
        F: Fn(T) -> Fut,
        Fut: Future,
    {
        loop {
            let delay = {
                let _guard = self.admission.lock().await;
                let mut delay = Duration::ZERO;
                let mut can_proceed = true;
                for counter in &self.counters {
                    if counter.current_count() >= counter.capacity() {
                        can_proceed = false;
                        // The binding constraint is the window that frees up last.
                        delay = delay.max(counter.time_until_next_expiry());
                    }
                }
                if can_proceed {
                    for counter in &self.counters {
                        counter.record_event();
                    }
                    None
                } else {
                    Some(delay)
                }
            };
            match delay {
                None => break,
                Some(delay) => {
                    trace!(delay_ms = delay.as_millis() as u64, "windows saturated");
                    time::sleep(delay).await;
                }
            }
        }
        trace!("admitted");
        (self.action)(arg).await
    }
}
