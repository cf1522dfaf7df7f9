use std::fmt::Write;

use clap::Args;
use common::name::PackageName;
use common::registry::Registry;
use common::retry::{retry, LoadError};
use common::session::SessionError;

use registry_admin::api::ApiError;

#[derive(Args, Debug, Clone)]
pub struct Show {
    /// Package name, e.g. `@scope/pkg`
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ShowError {
    #[error(transparent)]
    Session(#[from] SessionError<ApiError>),
    #[error(transparent)]
    Load(#[from] LoadError<ApiError>),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Show {
    type Error = ShowError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client().await?;
        let name = PackageName::from_display(self.name.as_str());

        let metadata = retry(ctx.retry_policy(), "package metadata", || {
            client.package_metadata(&name)
        })
        .await?;

        // Some registries omit tags from the full document.
        let tags = if metadata.dist_tags.is_empty() {
            retry(ctx.retry_policy(), "dist-tags", || client.dist_tags(&name)).await?
        } else {
            metadata.dist_tags.clone()
        };

        let mut out = format!("{}", name);
        let _ = write!(out, "\nversions: {}", metadata.versions.len());
        for (tag, version) in &tags {
            let _ = write!(out, "\n  {}: {}", tag, version);
        }

        if let Some((version, manifest)) = metadata.latest() {
            let deps: Vec<&str> = manifest.dependency_names().collect();
            let _ = write!(out, "\ndependencies of {}:", version);
            if deps.is_empty() {
                out.push_str(" none");
            }
            for dep in deps {
                let _ = write!(out, "\n  {}", dep);
            }
        }

        Ok(out)
    }
}
