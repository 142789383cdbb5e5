//! Monitoring daemon command handler.
//!
//! Samples the host on a fixed interval until Ctrl+C, notifying on threshold
//! crossings and appending every sample to the history log.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use super::Paths;
use crate::core::system_monitor::{
    HistoryStore, MonitorLoop, MonitorRuntime, NotificationSink, RuntimeHandle, SysinfoSampler,
};
use crate::core::Config;
use crate::platform::{DesktopNotifier, LogNotifier};

const CONFIG_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Execute the run command
pub fn execute(matches: &ArgMatches, paths: &Paths) -> Result<()> {
    let no_notify = matches.get_flag("no-notify");
    let config = paths.load_config();

    println!("{}", "Sentinel is watching this machine".cyan().bold());
    println!("  Config:  {}", paths.config.display().to_string().dimmed());
    println!("  History: {}", paths.history.display().to_string().dimmed());
    println!("  Every {}s, alerts at most every {}s", config.check_interval, config.notification_interval);
    println!("{}", "Press Ctrl+C to stop".dimmed());
    println!();

    let notifier: Box<dyn NotificationSink> = if no_notify {
        Box::new(LogNotifier)
    } else {
        Box::new(DesktopNotifier)
    };

    let sampler = SysinfoSampler::new();
    let history = HistoryStore::open(paths.history.clone());
    let monitor = MonitorLoop::new(config, Box::new(sampler), history, notifier);
    let runtime = MonitorRuntime::new(monitor);
    let handle = runtime.handle();

    let ctrlc_handle = handle.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("{}", "Stopping monitor...".yellow().bold());
        ctrlc_handle.shutdown();
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let tokio_rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("sentinel-worker")
        .build()
        .context("Failed to start async runtime")?;

    tokio_rt.block_on(async move {
        let watcher = tokio::spawn(watch_config(paths.config.clone(), handle));
        runtime.run().await;
        watcher.abort();
    });

    println!("{}", "Monitor stopped".green());
    Ok(())
}

/// Reload the config whenever the file's modification time changes
async fn watch_config(path: PathBuf, handle: RuntimeHandle) {
    let mut shutdown = handle.subscribe_shutdown();
    let mut ticker = tokio::time::interval(CONFIG_POLL_INTERVAL);
    let mut last_seen = modified_at(&path);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let current = modified_at(&path);
                if current == last_seen {
                    continue;
                }
                last_seen = current;

                let config = Config::load_from(&path);
                log::info!("Configuration changed on disk, reloading {:?}", path);
                handle.update_config(config);
            }
            _ = shutdown.recv() => break,
        }
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
