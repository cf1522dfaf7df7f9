use clap::Args;
use common::closure::{execute_plan, resolve_closure, CascadeError};
use common::name::PackageName;
use common::retry::LoadError;
use common::session::SessionError;

use registry_admin::api::ApiError;
use registry_admin::render::render_plan;

use crate::cli::prompt::{confirm, PromptError};

#[derive(Args, Debug, Clone)]
pub struct Cascade {
    /// Package whose dependency closure is deleted
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,

    /// Print the deletion plan without deleting anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CascadeOpError {
    #[error(transparent)]
    Session(#[from] SessionError<ApiError>),
    #[error(transparent)]
    Load(#[from] LoadError<ApiError>),
    #[error(transparent)]
    Cascade(#[from] CascadeError<ApiError>),
    #[error("confirmation failed: {0}")]
    Prompt(#[from] PromptError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Cascade {
    type Error = CascadeOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client().await?;
        let index = ctx.load_index(&client).await?;
        let root = PackageName::from_display(self.name.as_str());

        let plan = resolve_closure(&client, &root, &index).await?;
        if plan.is_empty() {
            return Ok(format!("{} is not in the package index", root));
        }

        let preview = render_plan(&root, &plan);
        if self.dry_run {
            return Ok(preview);
        }

        if !self.yes {
            eprintln!("{}", preview);
            if !confirm("Proceed?".to_string()).await? {
                return Ok("Nothing deleted".to_string());
            }
        }

        let report = execute_plan(&client, &plan).await?;
        let lines: Vec<String> = report
            .deleted
            .iter()
            .map(|name| format!("Deleted {}", name))
            .collect();
        Ok(lines.join("\n"))
    }
}
