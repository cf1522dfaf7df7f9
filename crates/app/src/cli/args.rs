pub use clap::Parser;

use std::path::PathBuf;

use tracing::Level;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "registry-admin")]
#[command(about = "List, inspect and delete packages of a private registry proxy")]
pub struct Args {
    /// Admin API base URL (overrides `api_url` from the config)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Base URL package documents are fetched from (defaults to the admin API)
    #[arg(long, global = true)]
    pub registry: Option<Url>,

    /// Path to the registry-admin directory (defaults to ~/.registry-admin)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level for stderr output; RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<Level>,

    #[command(subcommand)]
    pub command: crate::Command,
}
