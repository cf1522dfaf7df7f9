use clap::Args;
use common::name::PackageName;
use common::registry::Registry;
use common::session::SessionError;

use registry_admin::api::ApiError;

use crate::cli::prompt::{confirm, PromptError};

#[derive(Args, Debug, Clone)]
pub struct Delete {
    /// Packages to delete, e.g. `lodash @scope/pkg`
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error(transparent)]
    Session(#[from] SessionError<ApiError>),
    #[error("confirmation failed: {0}")]
    Prompt(#[from] PromptError),
    #[error("cannot delete {name}: {source}")]
    Api {
        name: PackageName,
        #[source]
        source: ApiError,
    },
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Delete {
    type Error = DeleteError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client().await?;
        let names: Vec<PackageName> = self
            .names
            .iter()
            .map(|n| PackageName::from_display(n.as_str()))
            .collect();

        let listed = names.iter().map(PackageName::display).collect::<Vec<_>>().join(", ");
        if !self.yes && !confirm(format!("Delete {}?", listed)).await? {
            return Ok("Nothing deleted".to_string());
        }

        let mut lines = Vec::with_capacity(names.len());
        for name in names {
            if let Err(source) = client.delete_package(&name).await {
                ctx.forget_rejected_token(&source);
                return Err(DeleteError::Api { name, source });
            }
            tracing::info!(package = %name, "deleted package");
            lines.push(format!("Deleted {}", name));
        }

        Ok(lines.join("\n"))
    }
}
