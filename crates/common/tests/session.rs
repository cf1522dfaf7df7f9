//! Integration tests for the login gate

mod support;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use common::session::{
    BearerToken, FileSessionStore, LoginGate, MemorySessionStore, PollPolicy, SessionError,
    SessionState, SessionStore,
};
use support::{ticket, FakeLoginEndpoint};
use tokio::sync::watch;

fn fixed_policy() -> PollPolicy {
    PollPolicy::fixed(Duration::from_secs(1), Duration::from_secs(60))
}

#[tokio::test(start_paused = true)]
async fn test_persisted_token_skips_ticket_request() {
    let store = MemorySessionStore::with_token(BearerToken::new("np_cached"));
    let gate = LoginGate::new(FakeLoginEndpoint::completing_after(1), store, fixed_policy());
    let (_tx, rx) = watch::channel(());

    let shown = AtomicBool::new(false);
    let token = gate
        .authenticate(|_| shown.store(true, Ordering::SeqCst), rx)
        .await
        .unwrap();

    assert_eq!(token.secret(), "np_cached");
    assert!(!shown.load(Ordering::SeqCst));
    assert_eq!(gate.endpoint().tickets_requested(), 0);
    assert_eq!(gate.endpoint().checks(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_handshake_completes_only_after_done_returns_token() {
    let gate = LoginGate::new(
        FakeLoginEndpoint::completing_after(3),
        MemorySessionStore::new(),
        fixed_policy(),
    );
    let (_tx, rx) = watch::channel(());

    let mut shown = None;
    let token = gate
        .authenticate(|t| shown = Some(t.login_url.clone()), rx)
        .await
        .unwrap();

    assert_eq!(shown.as_deref(), Some(ticket().login_url.as_str()));
    assert_eq!(gate.endpoint().tickets_requested(), 1);
    assert_eq!(gate.endpoint().checks(), 3);
    assert_eq!(token.secret(), "np_token");

    assert_eq!(gate.state().unwrap(), SessionState::Authenticated(token));
    assert!(gate.store().load_ticket().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_ticket_is_persisted_while_awaiting() {
    let gate = LoginGate::new(
        FakeLoginEndpoint::never_completing(),
        MemorySessionStore::new(),
        PollPolicy::fixed(Duration::from_secs(1), Duration::from_secs(5)),
    );
    let (_tx, rx) = watch::channel(());

    let err = gate.authenticate(|_| {}, rx).await.unwrap_err();

    assert!(matches!(err, SessionError::TimedOut(_)));
    assert!(err.to_string().contains("registry-admin logout"));
    assert_eq!(gate.endpoint().checks(), 5);
    assert_eq!(gate.state().unwrap(), SessionState::AwaitingHandshake(ticket()));
}

#[tokio::test(start_paused = true)]
async fn test_pending_ticket_is_resumed() {
    let gate = LoginGate::new(
        FakeLoginEndpoint::completing_after(1),
        MemorySessionStore::with_ticket(ticket()),
        fixed_policy(),
    );
    let (_tx, rx) = watch::channel(());

    gate.authenticate(|_| {}, rx).await.unwrap();

    assert_eq!(gate.endpoint().tickets_requested(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transport_errors_keep_polling() {
    let gate = LoginGate::new(
        FakeLoginEndpoint::completing_after(1).with_failing_checks(2),
        MemorySessionStore::new(),
        fixed_policy(),
    );
    let (_tx, rx) = watch::channel(());

    let token = gate.authenticate(|_| {}, rx).await.unwrap();

    assert_eq!(token.secret(), "np_token");
    assert_eq!(gate.endpoint().checks(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_reduces_polls_within_deadline() {
    let gate = LoginGate::new(
        FakeLoginEndpoint::never_completing(),
        MemorySessionStore::new(),
        PollPolicy {
            initial: Duration::from_secs(1),
            max_interval: Duration::from_secs(8),
            multiplier: 2.0,
            timeout: Duration::from_secs(30),
        },
    );
    let (_tx, rx) = watch::channel(());

    let err = gate.authenticate(|_| {}, rx).await.unwrap_err();

    // 1 + 2 + 4 + 8 + 8 = 23s, then a final check clipped to the 30s deadline
    assert!(matches!(err, SessionError::TimedOut(_)));
    assert_eq!(gate.endpoint().checks(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_polling() {
    let gate = LoginGate::new(
        FakeLoginEndpoint::never_completing(),
        MemorySessionStore::new(),
        fixed_policy(),
    );
    let (tx, rx) = watch::channel(());

    let cancel = async {
        tokio::time::sleep(Duration::from_millis(2500)).await;
        tx.send(()).unwrap();
    };
    let (result, _) = tokio::join!(gate.authenticate(|_| {}, rx), cancel);

    assert!(matches!(result, Err(SessionError::Cancelled)));
    assert_eq!(gate.endpoint().checks(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_shutdown_sender_does_not_cancel() {
    let gate = LoginGate::new(
        FakeLoginEndpoint::completing_after(2),
        MemorySessionStore::new(),
        fixed_policy(),
    );
    let (tx, rx) = watch::channel(());
    drop(tx);

    assert!(gate.authenticate(|_| {}, rx).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_ticket_failure_is_cannot_load_and_persists_nothing() {
    let gate = LoginGate::new(
        FakeLoginEndpoint::completing_after(1).failing_ticket(),
        MemorySessionStore::new(),
        fixed_policy(),
    );
    let (_tx, rx) = watch::channel(());

    let err = gate.authenticate(|_| {}, rx).await.unwrap_err();

    assert!(matches!(err, SessionError::CannotLoadTicket(_)));
    assert!(err.to_string().starts_with("cannot load login ticket: fake failure"));
    // Login failures wait for the operator instead of retrying.
    assert_eq!(gate.endpoint().tickets_requested(), 1);
    assert_eq!(gate.state().unwrap(), SessionState::NoToken);
}

#[tokio::test(start_paused = true)]
async fn test_zero_poll_interval_is_floored() {
    let gate = LoginGate::new(
        FakeLoginEndpoint::never_completing(),
        MemorySessionStore::new(),
        PollPolicy {
            initial: Duration::ZERO,
            max_interval: Duration::ZERO,
            multiplier: 2.0,
            timeout: Duration::from_secs(1),
        },
    );
    let (_tx, rx) = watch::channel(());

    let err = gate.authenticate(|_| {}, rx).await.unwrap_err();

    assert!(matches!(err, SessionError::TimedOut(_)));
    assert_eq!(gate.endpoint().checks(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_logout_clears_file_backed_session() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = FileSessionStore::new(temp.path().join("session"));
    store.save_ticket(&ticket()).unwrap();
    store.save_token(&BearerToken::new("np_old")).unwrap();

    let gate = LoginGate::new(FakeLoginEndpoint::completing_after(1), store, fixed_policy());
    assert!(matches!(gate.state().unwrap(), SessionState::Authenticated(_)));

    gate.logout().unwrap();

    assert_eq!(gate.state().unwrap(), SessionState::NoToken);
}
