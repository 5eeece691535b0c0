//! Confirmation prompts for destructive or risky actions.

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};

/// Ask the user to confirm; `assume_yes` skips the prompt.
///
/// Fails when confirmation is needed but no terminal is attached.
pub fn confirm(message: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    match Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact_opt()
    {
        Ok(answer) => Ok(answer.unwrap_or(false)),
        Err(e) => bail!("Confirmation required ({}); pass --yes to proceed non-interactively", e),
    }
}
