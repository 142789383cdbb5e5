use crate::core::Config;
use crate::ui::prompts;
use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use super::Paths;

pub fn handle_config(matches: &ArgMatches, paths: &Paths) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(paths),
        Some(("path", _)) => {
            println!("{}", paths.config.display());
            Ok(())
        }
        Some(("reset", sub_matches)) => reset(sub_matches, paths),
        Some(("set", sub_matches)) => set(sub_matches, paths),
        _ => {
            println!("Use 'sentinel config --help' for more information.");
            Ok(())
        }
    }
}

fn show(paths: &Paths) -> Result<()> {
    let config = paths.load_config();
    println!("{}", "Current configuration:".white());
    println!("{}", paths.config.display().to_string().dimmed());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?.cyan());
    Ok(())
}

fn reset(matches: &ArgMatches, paths: &Paths) -> Result<()> {
    if !matches.get_flag("yes") {
        let confirmed =
            prompts::read_confirmation("Reset all settings to their defaults? (y/N): ", 3)?;
        if !confirmed {
            prompts::info("Reset cancelled");
            return Ok(());
        }
    }

    Config::default()
        .save_to(&paths.config)
        .with_context(|| format!("Failed to write {:?}", paths.config))?;
    prompts::success("Configuration reset to defaults");
    Ok(())
}

fn set(matches: &ArgMatches, paths: &Paths) -> Result<()> {
    let key = matches
        .get_one::<String>("key")
        .context("Key argument is required")?;
    let value = matches
        .get_one::<String>("value")
        .context("Value argument is required")?;

    let config = set_and_save(paths, key, value)?;
    let shown = serde_json::to_value(&config)?
        .get(key.as_str())
        .map(|v| v.to_string())
        .unwrap_or_else(|| value.clone());

    prompts::success(&format!("{} set to {}", key, shown));
    Ok(())
}

/// Update one key in the config file, leaving the file untouched on error
pub fn set_and_save(paths: &Paths, key: &str, value: &str) -> Result<Config> {
    let mut config = paths.load_config();
    config.set_field(key, value)?;
    config
        .save_to(&paths.config)
        .with_context(|| format!("Failed to write {:?}", paths.config))?;
    Ok(config)
}
