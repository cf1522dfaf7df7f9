use clap::Args;
use common::filter::fuzzy_filter;
use common::grouping::group_by_prefix;
use common::retry::LoadError;
use common::session::SessionError;

use registry_admin::api::ApiError;
use registry_admin::render::{render_flat, render_tree};

#[derive(Args, Debug, Clone)]
pub struct List {
    /// Fuzzy filter over package names
    pub query: Option<String>,

    /// One name per line instead of the grouped tree (keeps match ranking)
    #[arg(long)]
    pub flat: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error(transparent)]
    Session(#[from] SessionError<ApiError>),
    #[error(transparent)]
    Load(#[from] LoadError<ApiError>),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for List {
    type Error = ListError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client().await?;
        let index = ctx.load_index(&client).await?;

        let query = self.query.as_deref().unwrap_or_default();
        let matches = fuzzy_filter(query, &index);

        if matches.is_empty() {
            return Ok("No packages found".to_string());
        }

        if self.flat {
            Ok(render_flat(&matches))
        } else {
            Ok(render_tree(&group_by_prefix(&matches)))
        }
    }
}
