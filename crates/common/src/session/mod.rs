mod gate;
mod poll;
mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use gate::{LoginGate, SessionError};
pub use poll::PollPolicy;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};

/// The URL pair handed out when a login handshake starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginTicket {
    /// Page the operator opens to sign in with the identity provider.
    pub login_url: String,
    /// Endpoint answering 200 with a token once sign-in finished.
    pub done_url: String,
}

/// An opaque credential proving an authenticated session.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Answer of the completion endpoint for one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeStatus {
    Pending,
    Complete(BearerToken),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoToken,
    AwaitingHandshake(LoginTicket),
    Authenticated(BearerToken),
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::NoToken => write!(f, "not logged in"),
            SessionState::AwaitingHandshake(ticket) => {
                write!(f, "login pending, finish it at {}", ticket.login_url)
            }
            SessionState::Authenticated(_) => write!(f, "logged in"),
        }
    }
}

/// The identity side of the handshake, as exposed by the registry.
#[async_trait::async_trait]
pub trait LoginEndpoint: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Start a new handshake.
    async fn request_ticket(&self) -> Result<LoginTicket, Self::Error>;

    /// Ask whether the handshake behind `ticket` has finished.
    async fn check_done(&self, ticket: &LoginTicket) -> Result<HandshakeStatus, Self::Error>;
}
