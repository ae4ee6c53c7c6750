//! Bounded polling used by blocking waits.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Call `poll` every `interval` until `settled` accepts its value or
/// `timeout` elapses, returning the last value either way.
///
/// Errors from `poll` end the wait immediately.
pub(crate) async fn poll_until<T, E, F, Fut>(
    timeout: Duration,
    interval: Duration,
    settled: impl Fn(&T) -> bool,
    mut poll: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let started = Instant::now();
    loop {
        let value = poll().await?;
        if settled(&value) {
            return Ok(value);
        }
        let elapsed = started.elapsed();
        if elapsed >= timeout {
            return Ok(value);
        }
        sleep(interval.min(timeout - elapsed)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn returns_as_soon_as_settled() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let value: Result<usize, ()> = poll_until(
            Duration::from_secs(5),
            Duration::from_millis(1),
            |n| *n >= 3,
            move || async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) },
        )
        .await;
        assert_eq!(value, Ok(3));
    }

    #[tokio::test]
    async fn timeout_returns_last_unsettled_value() {
        let started = Instant::now();
        let value: Result<&str, ()> = poll_until(
            Duration::from_millis(40),
            Duration::from_millis(10),
            |_| false,
            || async { Ok("pending") },
        )
        .await;
        assert_eq!(value, Ok("pending"));
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn poll_errors_end_the_wait() {
        let value: Result<(), &str> = poll_until(
            Duration::from_secs(5),
            Duration::from_millis(1),
            |_| false,
            || async { Err("gone") },
        )
        .await;
        assert_eq!(value, Err("gone"));
    }
}
