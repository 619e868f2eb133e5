use std::time::Duration;

/// Fixed-delay retry bounds. No backoff, no jitter: the worst case for a
/// request is `(max_attempts - 1) * delay` of waiting plus the calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(2000),
        }
    }
}

/// Returned once every attempt has failed, carrying the final error
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `operation` up to `policy.max_attempts` times with a fixed delay
/// between attempts. Success at any attempt returns immediately;
/// per-attempt failures are logged but only the last one is surfaced,
/// inside `Exhausted`.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, Exhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                tracing::warn!("Attempt {} of {} failed: {}", attempt, max_attempts, error);

                if attempt == max_attempts {
                    return Err(Exhausted {
                        attempts: max_attempts,
                        last_error: error,
                    });
                }

                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn always_failing_operation_is_tried_exactly_three_times() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();

        let counter = calls.clone();
        let result: Result<(), Exhausted<&str>> = retry(&RetryPolicy::default(), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err("model unavailable")
            }
        })
        .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last_error, "model unavailable");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // two inter-attempt waits of 2000 ms each
        assert!(started.elapsed() >= Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_second_attempt_stops_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();

        let counter = calls.clone();
        let result = retry(&RetryPolicy::default(), move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("transient")
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert!(started.elapsed() < Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_never_sleeps() {
        let started = tokio::time::Instant::now();

        let result: Result<&str, Exhausted<&str>> =
            retry(&RetryPolicy::default(), || async { Ok("done") }).await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
