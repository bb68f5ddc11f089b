//! Tests for the retry executor and the timeout helper.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use vision_relay::error::VisionError;
use vision_relay::util::retry::{with_retry, RetryPolicy};
use vision_relay::util::timeout::with_timeout;

fn failing_until(
    attempts: Arc<AtomicUsize>,
    failures: usize,
) -> impl Fn() -> std::future::Ready<Result<&'static str, VisionError>> {
    move || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < failures {
            std::future::ready(Err(VisionError::network(format!("attempt {attempt} failed"))))
        } else {
            std::future::ready(Ok("ok"))
        }
    }
}

#[tokio::test(start_paused = true)]
async fn succeeds_within_budget_after_failures() {
    for failures in 0..=2 {
        let attempts = Arc::new(AtomicUsize::new(0));
        let policy = RetryPolicy::new(2, Duration::from_millis(100));

        let result = policy.execute(failing_until(attempts.clone(), failures)).await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), failures + 1);
    }
}

#[tokio::test(start_paused = true)]
async fn backoff_sleeps_base_then_double() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(2, Duration::from_millis(1000));
    let started = tokio::time::Instant::now();

    let result = policy.execute(failing_until(attempts.clone(), 2)).await;

    assert_eq!(result.unwrap(), "ok");
    assert_eq!(started.elapsed(), Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_return_last_error() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(2, Duration::from_millis(50));

    let result = policy.execute(failing_until(attempts.clone(), usize::MAX)).await;

    match result {
        Err(VisionError::Network { message, .. }) => assert_eq!(message, "attempt 2 failed"),
        other => panic!("expected network error, got {other:?}"),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn validation_errors_are_retried_too() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let policy = RetryPolicy::new(2, Duration::from_millis(10));

    let result = policy
        .execute(|| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(VisionError::validation("always bad")) }
        })
        .await;

    assert!(matches!(result, Err(VisionError::Validation { .. })));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn zero_retries_means_single_attempt() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(0, Duration::from_secs(1));
    let started = tokio::time::Instant::now();

    let result = policy.execute(failing_until(attempts.clone(), usize::MAX)).await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn with_retry_wraps_a_reusable_operation() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let retrying = with_retry(failing_until(attempts.clone(), 1), 2, Duration::from_millis(100));

    let task = tokio::spawn(async move { retrying().await });
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(100)).await;
    let result = task.await.unwrap();

    assert_eq!(result.unwrap(), "ok");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn timeout_fires_after_deadline() {
    let result: Result<(), VisionError> = with_timeout(Duration::from_secs(2), async {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(())
    })
    .await;

    match result {
        Err(VisionError::Timeout(ms)) => assert_eq!(ms, 2000),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn timeout_passes_through_fast_results() {
    let result = with_timeout(Duration::from_secs(2), async { Ok::<_, VisionError>(5) }).await;
    assert_eq!(result.unwrap(), 5);
}
