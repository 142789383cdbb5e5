//! History command handler: interactive chart or a plain summary.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::ArgMatches;
use colored::Colorize;

use super::Paths;
use crate::core::system_monitor::{HistoryStore, Metric, SampleRecord, TemperatureUnit};
use crate::ui::formatters::{format_metric, format_time};
use crate::ui::stats_tui::{
    run_stats_app, series::summarize, window_start, StatsAppConfig, MAX_WINDOW_MINUTES,
};

/// Execute the stats command
pub fn execute(matches: &ArgMatches, paths: &Paths) -> Result<()> {
    let minutes = matches.get_one::<i64>("minutes").copied().unwrap_or(60);
    if !(1..=MAX_WINDOW_MINUTES).contains(&minutes) {
        bail!("--minutes must be between 1 and {}", MAX_WINDOW_MINUTES);
    }

    let metric = match matches.get_one::<String>("metric") {
        Some(key) => Metric::from_key(key)
            .with_context(|| format!("Unknown metric '{}' (expected cpu, ram, temp or disk)", key))?,
        None => Metric::Cpu,
    };

    let unit = paths.load_config().temperature_unit;

    if matches.get_flag("summary") {
        return print_summary(paths, minutes, unit);
    }

    let config = StatsAppConfig {
        history_path: paths.history.clone(),
        metric,
        window_minutes: minutes,
        unit,
    };

    run_stats_app(config).context("Failed to run history chart")
}

fn print_summary(paths: &Paths, minutes: i64, unit: TemperatureUnit) -> Result<()> {
    let records = HistoryStore::open(paths.history.clone())
        .load_all()
        .with_context(|| format!("Failed to read history {:?}", paths.history))?;

    let lines = summary_lines(&records, Utc::now(), minutes, unit);
    println!(
        "{}",
        format!("History for the last {} minute(s)", minutes).cyan().bold()
    );

    if lines.is_empty() {
        println!("{}", "No samples recorded in this window".yellow());
        return Ok(());
    }

    for line in lines {
        println!("  {}", line);
    }
    Ok(())
}

/// One line per metric with samples in the window, plus the time span
fn summary_lines(
    records: &[SampleRecord],
    now: DateTime<Utc>,
    minutes: i64,
    unit: TemperatureUnit,
) -> Vec<String> {
    let Some(start) = window_start(now, minutes) else {
        return Vec::new();
    };
    let window: Vec<&SampleRecord> = records
        .iter()
        .filter(|r| r.timestamp >= start && r.timestamp <= now)
        .collect();

    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return Vec::new();
    };

    let mut lines = vec![format!(
        "{} sample(s) from {} to {}",
        window.len(),
        format_time(first.timestamp),
        format_time(last.timestamp)
    )];

    for metric in Metric::ALL {
        if let Some(summary) = summarize(window.iter().copied(), metric) {
            lines.push(format!(
                "{:<12} min {:>10}  avg {:>10}  max {:>10}",
                format!("{}:", metric.label()),
                format_metric(metric, summary.min, unit),
                format_metric(metric, summary.avg, unit),
                format_metric(metric, summary.max, unit),
            ));
        }
    }

    lines
}
