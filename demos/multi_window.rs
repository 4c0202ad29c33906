//! Gate 250 concurrent calls behind three simultaneous quotas: 10 per
//! second, 100 per minute and 1000 per day. The first hundred calls drain at
//! ten per second, then the minute quota holds everything until t=60s.
//!
//! Run with RUST_LOG=windowed_rate_limiter=trace to watch admission decisions.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;
use windowed_rate_limiter::{RateLimiter, Window};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let windows = vec![
        Window::new(10, Duration::from_secs(1)).unwrap(),
        Window::new(100, Duration::from_secs(60)).unwrap(),
        Window::new(1000, Duration::from_secs(60 * 60 * 24)).unwrap(),
    ];

    let start = Instant::now();
    let limiter = Arc::new(RateLimiter::new(
        move |task: String| async move {
            println!("Running {} at {:?}", task, Instant::now() - start);
            tokio::time::sleep(Duration::from_millis(100)).await;
        },
        windows,
    ));

    let calls = (0..250).map(|i| {
        let limiter = Arc::clone(&limiter);
        tokio::spawn(async move { limiter.perform(format!("task {}", i)).await })
    });

    join_all(calls).await;
}
