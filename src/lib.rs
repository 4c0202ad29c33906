//! # Windowed Rate Limiter
//! Many API's enforce several rate limits at once - for example 10 requests per second AND 100 per minute AND 1000 per day. This crate lets you wrap an async action in a limiter configured with any number of such windows: a call is admitted only when every window has spare capacity, and otherwise waits exactly as long as the most constrained window requires. Windows slide continuously - each admitted event stops counting precisely one window-duration after it happened, driven by a single timer per window rather than periodic polling.
//!
//! # Example
//! Here, we create a limiter that allows 2 calls per second, then issue three calls concurrently. The first two run immediately; the third runs one second later, once the first call's slot has expired.
//! ```
//! # use std::time::Duration;
//! # use tokio::time::Instant;
//! # use windowed_rate_limiter::{RateLimiter, Window};
//! # use futures::join;
//! # #[tokio::main]
//! # async fn main() {
//!     let windows = vec![Window::new(2, Duration::from_secs(1)).unwrap()];
//!     let start = Instant::now();
//!     let limiter = RateLimiter::new(
//!         move |name: &'static str| async move {
//!             println!("Running {} at {:?}", name, Instant::now() - start);
//!         },
//!         windows,
//!     );
//!     join!(
//!         limiter.perform("first"),
//!         limiter.perform("second"),
//!         limiter.perform("third"),
//!     );
//!
//!     // Running first at 12.1µs
//!     // Running second at 57.3µs
//!     // Running third at 1.000672348s
//! # }
//! ```
//!
//! # Guarantees
//! No window ever exceeds its capacity, under any number of concurrent callers. No ordering is guaranteed among callers waiting on the same exhausted window, only eventual admission.

mod rate_limiter;
mod window;

pub use rate_limiter::RateLimiter;
pub use window::{ConfigError, SlidingWindowCounter, Window};
