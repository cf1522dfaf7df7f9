//! Integration tests for load retries

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::retry::{retry, LoadError, RetryPolicy};
use support::FakeError;

#[tokio::test(start_paused = true)]
async fn test_automatic_policy_recovers_from_transient_failure() {
    let calls = &AtomicUsize::new(0);
    let policy = RetryPolicy::automatic(3, Duration::from_secs(5));

    let value = retry(policy, "package index", || async move {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(FakeError("timeout".to_string()))
        } else {
            Ok(7)
        }
    })
    .await
    .unwrap();

    assert_eq!(value, 7);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_wrap_last_cause() {
    let calls = &AtomicUsize::new(0);
    let policy = RetryPolicy::automatic(2, Duration::from_secs(5));

    let err = retry(policy, "package index", || async move {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        Err::<(), _>(FakeError(format!("attempt {}", n)))
    })
    .await
    .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(err.to_string(), "cannot load package index: fake failure: attempt 1");
    let LoadError::CannotLoad { what, .. } = &err;
    assert_eq!(*what, "package index");
}

#[tokio::test(start_paused = true)]
async fn test_manual_policy_tries_once() {
    let calls = &AtomicUsize::new(0);

    let result = retry(RetryPolicy::manual(), "login ticket", || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Err::<(), _>(FakeError("down".to_string()))
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(err.cause().0, "down");
}
