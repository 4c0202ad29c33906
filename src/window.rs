use std::sync::{Arc, Mutex};
use std::time::Duration;

use queues::{IsQueue, Queue};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::trace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("window capacity must be positive")]
    ZeroCapacity,
    #[error("window duration must be positive")]
    ZeroDuration,
}

/// A single rate constraint: at most `capacity` events per rolling `duration`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    capacity: usize,
    duration: Duration,
}

impl Window {
    pub fn new(capacity: usize, duration: Duration) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(Self { capacity, duration })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// The expiration instants of admitted events, plus the expiry timer state.
/// Entries are pushed at the tail with a constant lifespan, so the queue is
/// always sorted ascending by expiration.
struct Inner {
    expirations: Queue<Instant>,
    timer: Option<JoinHandle<()>>,
}

impl Inner {
    /// Drop every entry whose expiration is at or before `now`.
    fn purge(&mut self, now: Instant) {
        while let Ok(expires_at) = self.expirations.peek() {
            if expires_at <= now {
                self.expirations.remove().expect("Queue is empty");
            } else {
                break; // The rest of the queue expires in the future
            }
        }
    }
}

/// Counts how many events happened within the trailing window duration.
///
/// Each recorded event stores its expiration instant. A single timer task
/// sleeps until the earliest expiration, purges everything that has expired
/// by then, and re-arms for the next entry (or goes idle on an empty queue).
/// Reads also purge, so a read racing ahead of the timer never overcounts.
///
/// Must be used from within a tokio runtime.
pub struct SlidingWindowCounter {
    window: Window,
    inner: Arc<Mutex<Inner>>,
}

impl SlidingWindowCounter {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            inner: Arc::new(Mutex::new(Inner {
                expirations: Queue::new(),
                timer: None,
            })),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity
    }

    /// Record one admitted event, expiring `duration` from now.
    pub fn record_event(&self) {
        let expires_at = Instant::now() + self.window.duration;
        let mut inner = self.inner.lock().unwrap();
        inner.expirations.add(expires_at).expect("Queue is full");
        if inner.timer.is_none() {
            inner.timer = Some(Self::arm(Arc::clone(&self.inner), expires_at));
        }
    }

    /// The number of events still inside the window. Purges first, so the
    /// result is exact even if the timer has not fired yet.
    pub fn current_count(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        inner.purge(Instant::now());
        inner.expirations.size()
    }

    /// Time until the earliest entry leaves the window. Zero if the counter
    /// is empty or the earliest entry has already expired.
    pub fn time_until_next_expiry(&self) -> Duration {
        let inner = self.inner.lock().unwrap();
        match inner.expirations.peek() {
            Ok(expires_at) => expires_at.duration_since(Instant::now()),
            Err(_) => Duration::ZERO,
        }
    }

    /// Spawn the expiry timer targeting `deadline`. On each wake-up it purges
    /// every expired entry (several may expire close together), then either
    /// re-targets the new earliest entry or clears the armed state and exits.
    /// A lazy purge by a read can empty the queue first; the timer then just
    /// finds nothing to do and goes idle.
    fn arm(inner: Arc<Mutex<Inner>>, deadline: Instant) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut deadline = deadline;
            loop {
                time::sleep_until(deadline).await;
                let next = {
                    let mut guard = inner.lock().unwrap();
                    guard.purge(Instant::now());
                    trace!(remaining = guard.expirations.size(), "expiry timer fired");
                    match guard.expirations.peek() {
                        Ok(expires_at) => Some(expires_at),
                        Err(_) => {
                            guard.timer = None;
                            None
                        }
                    }
                };
                match next {
                    Some(expires_at) => deadline = expires_at,
                    None => break,
                }
            }
        })
    }
}

impl Drop for SlidingWindowCounter {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            if let Some(timer) = inner.timer.take() {
                timer.abort();
            }
        }
    }
}
