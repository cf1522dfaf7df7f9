use std::future::Future;
use std::time::Duration;

/// A load that failed, with what we were trying to load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError<E: std::error::Error + 'static> {
    #[error("cannot load {what}: {source}")]
    CannotLoad {
        what: &'static str,
        #[source]
        source: E,
    },
}

impl<E: std::error::Error + 'static> LoadError<E> {
    pub fn cause(&self) -> &E {
        match self {
            LoadError::CannotLoad { source, .. } => source,
        }
    }
}

/// How often a failed load is retried on its own before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::automatic(3, Duration::from_secs(5))
    }
}

impl RetryPolicy {
    /// Retry transient failures after a fixed delay.
    pub fn automatic(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// A single attempt; the operator decides whether to try again.
    pub fn manual() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Run `op` under `policy`, wrapping the final failure as a load error.
pub async fn retry<T, E, F, Fut>(
    policy: RetryPolicy,
    what: &'static str,
    mut op: F,
) -> Result<T, LoadError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(source) if attempt >= attempts => {
                return Err(LoadError::CannotLoad { what, source });
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    attempts,
                    "cannot load {}: {}; retrying in {:?}",
                    what,
                    e,
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
