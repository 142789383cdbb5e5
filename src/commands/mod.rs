// Command handlers module
pub mod completions;
pub mod config;
pub mod now;
pub mod power;
pub mod run;
pub mod stats;
pub mod touchscreen;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;

use crate::core::Config;

// Re-exports for cleaner imports
pub use version::execute as version;

/// Config and history locations for this invocation.
///
/// A `--config`/`--history` flag wins over the environment, which wins over
/// the per-user default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config: PathBuf,
    pub history: PathBuf,
}

impl Paths {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let config = match matches.get_one::<PathBuf>("config") {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        let history = match matches.get_one::<PathBuf>("history") {
            Some(path) => path.clone(),
            None => Config::default_history_path()?,
        };
        Ok(Self { config, history })
    }

    pub fn load_config(&self) -> Config {
        Config::load_from(&self.config)
    }
}
