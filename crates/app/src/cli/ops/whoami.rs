use clap::Args;
use common::session::StoreError;

#[derive(Args, Debug, Clone)]
pub struct Whoami;

#[derive(Debug, thiserror::Error)]
pub enum WhoamiError {
    #[error("cannot read session: {0}")]
    Store(#[from] StoreError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Whoami {
    type Error = WhoamiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.login_gate().state()?;
        let endpoints = ctx.client.endpoints();

        Ok(format!(
            "Session:  {}\nAPI:      {}\nRegistry: {}\nState:    {}",
            state,
            endpoints.api(),
            endpoints.registry(),
            ctx.state.state_dir.display()
        ))
    }
}
