use anyhow::{Context, Result};
use clap::ArgMatches;

use super::Paths;
use crate::platform::TouchscreenState;
use crate::ui::prompts;

/// Enable or disable the configured touchscreen device
pub fn execute(matches: &ArgMatches, paths: &Paths) -> Result<()> {
    let state = match matches.subcommand_name() {
        Some("enable") => TouchscreenState::Enabled,
        Some("disable") => TouchscreenState::Disabled,
        _ => {
            println!("Use 'sentinel touchscreen --help' for more information.");
            return Ok(());
        }
    };

    let device = paths.load_config().touchscreen_device;
    state
        .apply(&device)
        .with_context(|| format!("Failed to change touchscreen state (device {})", device))?;

    prompts::success(&format!("Touchscreen {}", state));
    Ok(())
}
