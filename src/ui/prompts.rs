//! Confirmation prompt with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::{SsiError, SsiResult};

/// Ask a yes/no question.
///
/// Returns `true` under `--yes` and `default` when not attached to a terminal.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> SsiResult<bool> {
    if ctx.auto_yes() {
        println!("  {} (auto-approved)", message);
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack blocks on stdin
    let message = message.to_string();
    let result = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(|e| SsiError::Internal(format!("prompt task failed: {}", e)))?;

    result.map_err(|e| SsiError::User(format!("Prompt failed: {}", e)))
}
