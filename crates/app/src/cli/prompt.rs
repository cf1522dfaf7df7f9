use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use tokio::task::JoinError;

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error(transparent)]
    Dialog(#[from] dialoguer::Error),
    #[error("prompt task failed: {0}")]
    Join(#[from] JoinError),
}

/// Ask a yes/no question on the terminal, defaulting to no.
pub async fn confirm(prompt: String) -> Result<bool, PromptError> {
    confirm_with(move || {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
    })
    .await
}

/// Run a terminal interaction on the blocking pool so the runtime keeps
/// serving the shutdown signal while the operator types.
pub async fn confirm_with<F>(ask: F) -> Result<bool, PromptError>
where
    F: FnOnce() -> Result<bool, dialoguer::Error> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(ask).await??)
}
