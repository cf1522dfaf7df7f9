// CLI modules
mod cli;

use std::time::Duration;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Cascade, Delete, Init, List, Login, Logout, Show, Version, Whoami};

use registry_admin::logging::{init_logging, parse_level};
use registry_admin::state::AppState;

/// How long a command may take to wind down after Ctrl-C.
const INTERRUPT_GRACE_PERIOD: Duration = Duration::from_secs(2);

command_enum! {
    (Cascade, Cascade),
    (Delete, Delete),
    (Init, Init),
    (List, List),
    (Login, Login),
    (Logout, Logout),
    (Show, Show),
    (Version, Version),
    (Whoami, Whoami),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Missing state is fine (defaults apply); unreadable state is not
    let state = match AppState::load_or_default(args.config_path.clone()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let level = args
        .log_level
        .unwrap_or_else(|| parse_level(&state.config.log_level));
    let log_guard = init_logging(level);

    // Resolve endpoints: explicit flags > config file > defaults
    let endpoints = cli::op::resolve_endpoints(args.remote, args.registry, &state.config);
    let shutdown = cli::op::shutdown_on_ctrl_c();

    let ctx = match cli::op::OpContext::new(endpoints, state, args.config_path, shutdown) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };

    // The login poll stops on its own when interrupted; anything else gets
    // a grace period before we bail out.
    let mut interrupted = ctx.shutdown.clone();
    let interrupt = async move {
        if interrupted.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(INTERRUPT_GRACE_PERIOD).await;
    };

    let result = tokio::select! {
        result = args.command.execute(&ctx) => result,
        _ = interrupt => {
            eprintln!("Interrupted");
            drop(log_guard);
            std::process::exit(130);
        }
    };

    let code = match result {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            1
        }
    };

    drop(log_guard);
    std::process::exit(code);
}
