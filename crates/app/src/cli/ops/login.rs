use clap::Args;
use common::session::{SessionError, SessionState, StoreError};

use registry_admin::api::ApiError;

#[derive(Args, Debug, Clone)]
pub struct Login {
    /// Open the login page in the default browser
    #[arg(long)]
    pub open: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Session(#[from] SessionError<ApiError>),
    #[error("session storage error: {0}")]
    Store(#[from] StoreError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Login {
    type Error = LoginError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let was_authenticated = matches!(ctx.login_gate().state()?, SessionState::Authenticated(_));
        ctx.authenticate(self.open).await?;

        let api = ctx.client.endpoints().api();
        if was_authenticated {
            Ok(format!("Already logged in to {}", api))
        } else {
            Ok(format!("Logged in to {}", api))
        }
    }
}
