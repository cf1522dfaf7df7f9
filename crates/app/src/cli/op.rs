use std::error::Error;
use std::path::PathBuf;

use common::prelude::{
    retry, BearerToken, FileSessionStore, LoadError, LoginGate, LoginTicket, PackageName,
    Registry, RetryPolicy, SessionError, SessionStore,
};
use tokio::sync::watch;
use url::Url;

use registry_admin::api::{ApiClient, ApiError, Endpoints};
use registry_admin::state::{AppConfig, AppState};

/// Resolve the API endpoints.
///
/// Priority: explicit flags > config file > built-in default. The registry
/// base falls back to the API base.
pub fn resolve_endpoints(
    remote: Option<Url>,
    registry: Option<Url>,
    config: &AppConfig,
) -> Endpoints {
    let api = remote.unwrap_or_else(|| config.api_url.clone());
    let registry = registry.or_else(|| config.registry_url.clone());
    Endpoints::new(api, registry)
}

/// A receiver that fires once on Ctrl-C.
pub fn shutdown_on_ctrl_c() -> watch::Receiver<()> {
    let (tx, rx) = watch::channel(());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("received Ctrl-C");
            let _ = tx.send(());
        }
    });
    rx
}

#[derive(Clone)]
pub struct OpContext {
    /// API client without credentials
    pub client: ApiClient,
    /// Loaded (or default) state and configuration
    pub state: AppState,
    /// Optional custom config path (defaults to ~/.registry-admin)
    pub config_path: Option<PathBuf>,
    /// Fires when the operator interrupts the command
    pub shutdown: watch::Receiver<()>,
}

impl OpContext {
    pub fn new(
        endpoints: Endpoints,
        state: AppState,
        config_path: Option<PathBuf>,
        shutdown: watch::Receiver<()>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::new(endpoints, state.config.request_timeout())?,
            state,
            config_path,
            shutdown,
        })
    }

    pub fn login_gate(&self) -> LoginGate<ApiClient, FileSessionStore> {
        LoginGate::new(
            self.client.clone(),
            self.state.session_store(),
            self.state.config.login.poll_policy(),
        )
    }

    /// Run the login gate and return a client carrying the credential.
    ///
    /// When a handshake is needed the login link goes to stderr, and to the
    /// browser as well if `open_browser` is set.
    pub async fn authenticate(
        &self,
        open_browser: bool,
    ) -> Result<(ApiClient, BearerToken), SessionError<ApiError>> {
        let token = self
            .login_gate()
            .authenticate(
                |ticket: &LoginTicket| show_login_link(ticket, open_browser),
                self.shutdown.clone(),
            )
            .await?;
        Ok((self.client.with_credential(token.clone()), token))
    }

    pub async fn authenticated_client(&self) -> Result<ApiClient, SessionError<ApiError>> {
        Ok(self.authenticate(false).await?.0)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.state.config.retry.policy()
    }

    /// Fetch the package index, retrying transient failures.
    pub async fn load_index(
        &self,
        client: &ApiClient,
    ) -> Result<Vec<PackageName>, LoadError<ApiError>> {
        let result = retry(self.retry_policy(), "package index", || client.all_packages()).await;
        if let Err(e) = &result {
            self.forget_rejected_token(e.cause());
        }

        let names = result?;
        tracing::debug!(count = names.len(), "loaded package index");
        Ok(names)
    }

    /// Clear the stored token when the registry refused it, so the next
    /// command starts a new login. Returns whether the token was cleared.
    pub fn forget_rejected_token(&self, err: &ApiError) -> bool {
        if !err.is_unauthorized() {
            return false;
        }

        match self.state.session_store().clear_token() {
            Ok(()) => {
                tracing::warn!("the registry rejected the stored session; log in again");
                true
            }
            Err(e) => {
                tracing::warn!("cannot clear rejected session: {}", e);
                false
            }
        }
    }
}

fn show_login_link(ticket: &LoginTicket, open_browser: bool) {
    eprintln!("Log in to continue: {}", ticket.login_url);
    if open_browser {
        if let Err(e) = open::that(&ticket.login_url) {
            tracing::warn!("cannot open browser: {}", e);
        }
    }
    eprintln!("Waiting for the login to complete (Ctrl-C to stop)...");
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
