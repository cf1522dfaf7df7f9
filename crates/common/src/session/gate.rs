use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::retry::{retry, LoadError, RetryPolicy};

use super::{
    BearerToken, HandshakeStatus, LoginEndpoint, LoginTicket, PollPolicy, SessionState,
    SessionStore, StoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum SessionError<E: std::error::Error + 'static> {
    #[error("{0}")]
    CannotLoadTicket(#[source] LoadError<E>),
    #[error("session storage error: {0}")]
    Store(#[from] StoreError),
    #[error(
        "login was not completed within {0:?}; run the command again to keep waiting, \
         or run 'registry-admin logout' to start a new login"
    )]
    TimedOut(Duration),
    #[error("login cancelled")]
    Cancelled,
}

/// Access gate in front of every authenticated command.
///
/// `NoToken -> AwaitingHandshake -> Authenticated`. A persisted token skips
/// straight to the end; otherwise a ticket is obtained, shown to the
/// operator, and the completion endpoint is polled until it issues a token.
pub struct LoginGate<E, S> {
    endpoint: E,
    store: S,
    policy: PollPolicy,
}

impl<E: LoginEndpoint, S: SessionStore> LoginGate<E, S> {
    pub fn new(endpoint: E, store: S, policy: PollPolicy) -> Self {
        Self {
            endpoint,
            store,
            policy,
        }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Where the persisted state says we are, without touching the network.
    pub fn state(&self) -> Result<SessionState, StoreError> {
        if let Some(token) = self.store.load_token()? {
            return Ok(SessionState::Authenticated(token));
        }
        if let Some(ticket) = self.store.load_ticket()? {
            return Ok(SessionState::AwaitingHandshake(ticket));
        }
        Ok(SessionState::NoToken)
    }

    /// Forget both the token and any pending ticket.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.clear_token()?;
        self.store.clear_ticket()?;
        tracing::info!("session cleared");
        Ok(())
    }

    /// Resolve a credential, running the handshake if none is cached.
    ///
    /// `on_ticket` is called once when the operator has to act. Polling stops
    /// on success, after the policy timeout, or when `shutdown` fires.
    pub async fn authenticate<F>(
        &self,
        on_ticket: F,
        mut shutdown: watch::Receiver<()>,
    ) -> Result<BearerToken, SessionError<E::Error>>
    where
        F: FnOnce(&LoginTicket) + Send,
    {
        if let Some(token) = self.store.load_token()? {
            tracing::debug!("using cached session token");
            return Ok(token);
        }

        let ticket = match self.store.load_ticket()? {
            Some(ticket) => {
                tracing::debug!("resuming pending login handshake");
                ticket
            }
            None => {
                // The operator retries by hand; a failed ticket is not retried.
                let ticket = retry(RetryPolicy::manual(), "login ticket", || {
                    self.endpoint.request_ticket()
                })
                .await
                .map_err(SessionError::CannotLoadTicket)?;
                self.store.save_ticket(&ticket)?;
                ticket
            }
        };

        tracing::info!("awaiting login handshake");
        on_ticket(&ticket);

        let deadline = Instant::now() + self.policy.timeout;
        let mut watching = true;
        let mut attempt = 0u32;

        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(SessionError::TimedOut(self.policy.timeout));
            }
            let delay = self.policy.delay_for(attempt).min(deadline - now);

            if sleep_or_shutdown(delay, &mut shutdown, &mut watching).await {
                tracing::info!("login handshake cancelled");
                return Err(SessionError::Cancelled);
            }

            match self.endpoint.check_done(&ticket).await {
                Ok(HandshakeStatus::Complete(token)) => {
                    self.store.save_token(&token)?;
                    self.store.clear_ticket()?;
                    tracing::info!(attempts = attempt + 1, "login handshake complete");
                    return Ok(token);
                }
                Ok(HandshakeStatus::Pending) => {
                    tracing::debug!(attempt, "login handshake still pending");
                }
                Err(e) => {
                    tracing::warn!(attempt, "login completion check failed: {}", e);
                }
            }

            attempt = attempt.saturating_add(1);
        }
    }
}

/// Sleep for `delay` unless shutdown is signalled first. A dropped sender
/// means nobody can cancel any more, so the sleep just finishes.
async fn sleep_or_shutdown(
    delay: Duration,
    shutdown: &mut watch::Receiver<()>,
    watching: &mut bool,
) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = shutdown.changed(), if *watching => match changed {
                Ok(()) => return true,
                Err(_) => *watching = false,
            },
        }
    }
}
