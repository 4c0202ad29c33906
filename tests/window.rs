use std::time::Duration;

use windowed_rate_limiter::{ConfigError, SlidingWindowCounter, Window};

use pretty_assertions::assert_eq;
use tokio::time::advance;

#[test]
fn test_rejects_bad_config() {
    assert_eq!(
        Window::new(0, Duration::from_secs(1)).unwrap_err(),
        ConfigError::ZeroCapacity
    );
    assert_eq!(
        Window::new(10, Duration::ZERO).unwrap_err(),
        ConfigError::ZeroDuration
    );

    let window = Window::new(10, Duration::from_secs(1)).unwrap();
    assert_eq!(window.capacity(), 10);
    assert_eq!(window.duration(), Duration::from_secs(1));
}

/// The count at any instant is the number of events recorded within the
/// trailing window duration, nothing more.
#[tokio::test(start_paused = true)]
async fn test_count_follows_the_sliding_window() {
    let one_second = Duration::from_secs(1);
    let counter = SlidingWindowCounter::new(Window::new(10, one_second).unwrap());

    assert_eq!(counter.current_count(), 0);

    counter.record_event();
    advance(Duration::from_millis(500)).await;
    counter.record_event();
    assert_eq!(counter.current_count(), 2);

    // The first event expires exactly one second after it was recorded.
    advance(Duration::from_millis(500)).await;
    assert_eq!(counter.current_count(), 1);

    advance(Duration::from_millis(499)).await;
    assert_eq!(counter.current_count(), 1);

    advance(Duration::from_millis(1)).await;
    assert_eq!(counter.current_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_time_until_next_expiry() {
    let counter = SlidingWindowCounter::new(Window::new(10, Duration::from_secs(1)).unwrap());

    // Idle counter reports zero.
    assert_eq!(counter.time_until_next_expiry(), Duration::ZERO);

    counter.record_event();
    assert_eq!(counter.time_until_next_expiry(), Duration::from_secs(1));

    advance(Duration::from_millis(300)).await;
    assert_eq!(counter.time_until_next_expiry(), Duration::from_millis(700));

    // Floored at zero once the earliest entry has expired.
    advance(Duration::from_millis(700)).await;
    assert_eq!(counter.time_until_next_expiry(), Duration::ZERO);
    assert_eq!(counter.current_count(), 0);
}
