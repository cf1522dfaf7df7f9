use clap::Args;
use url::Url;

use registry_admin::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Admin API base URL to store in the config (default: http://localhost:5000/)
    #[arg(long)]
    pub api_url: Option<Url>,

    /// Registry base URL for package documents, if it differs from the API
    #[arg(long)]
    pub registry_url: Option<Url>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_url: self
                .api_url
                .clone()
                .unwrap_or_else(|| ctx.state.config.api_url.clone()),
            registry_url: self
                .registry_url
                .clone()
                .or_else(|| ctx.state.config.registry_url.clone()),
            ..ctx.state.config.clone()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let registry = state
            .config
            .registry_url
            .as_ref()
            .map(Url::to_string)
            .unwrap_or_else(|| "(same as API)".to_string());

        Ok(format!(
            "Initialized registry-admin directory at: {}\n\
             - Config: {}\n\
             - Session: {}\n\
             - API URL: {}\n\
             - Registry URL: {}",
            state.state_dir.display(),
            state.config_path.display(),
            state.session_dir.display(),
            state.config.api_url,
            registry
        ))
    }
}
