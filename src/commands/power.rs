use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::platform::PowerAction;
use crate::ui::prompts;

/// Execute a power or session action, confirming first unless `--yes`
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("action")
        .context("Action argument is required")?;
    let action = PowerAction::from_name(name)
        .with_context(|| format!("Unknown power action '{}'", name))?;

    if !matches.get_flag("yes") {
        prompts::warn(&format!("About to {} right now", action));
        let confirmed = prompts::read_confirmation("Continue? (y/N): ", 3)?;
        if !confirmed {
            prompts::info("Cancelled");
            return Ok(());
        }
    }

    println!("{}", format!("Requesting {}...", action).cyan());
    action
        .execute()
        .with_context(|| format!("Failed to {}", action))?;
    Ok(())
}
