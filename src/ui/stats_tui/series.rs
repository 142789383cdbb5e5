//! Shaping stored history into chart series and summaries.

use chrono::{DateTime, Duration, Utc};

use crate::core::system_monitor::{Metric, SampleRecord, TemperatureUnit};

/// Longest accepted history window, one year
pub const MAX_WINDOW_MINUTES: i64 = 525_600;

/// Start of a window of `minutes` ending at `now`; `None` when `minutes` is
/// outside `1..=MAX_WINDOW_MINUTES`
pub fn window_start(now: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
    if !(1..=MAX_WINDOW_MINUTES).contains(&minutes) {
        return None;
    }
    now.checked_sub_signed(Duration::try_minutes(minutes)?)
}

/// Chart points for `metric` over the `window` ending at `now`.
///
/// `x` is minutes since the window start, so the newest sample sits at the
/// right edge (`x == window` in minutes). Records without the metric or
/// outside the window are skipped; temperatures are converted to `unit`.
pub fn window_series(
    records: &[SampleRecord],
    metric: Metric,
    now: DateTime<Utc>,
    window: Duration,
    unit: TemperatureUnit,
) -> Vec<(f64, f64)> {
    let Some(start) = now.checked_sub_signed(window) else {
        return Vec::new();
    };

    records
        .iter()
        .filter(|r| r.timestamp >= start && r.timestamp <= now)
        .filter_map(|r| {
            let value = r.get(metric)?;
            let x = (r.timestamp - start).num_milliseconds() as f64 / 60_000.0;
            let y = match metric {
                Metric::Temp => unit.from_celsius(value),
                _ => value,
            };
            Some((x, y))
        })
        .collect()
}

/// Y axis bounds: fixed 0-100 for percentages, otherwise the data range
/// padded by 10%
pub fn y_bounds(metric: Metric, points: &[(f64, f64)]) -> [f64; 2] {
    if matches!(metric, Metric::Cpu | Metric::Ram) {
        return [0.0, 100.0];
    }

    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }

    let pad = ((max - min) * 0.1).max(1.0);
    [(min - pad).max(0.0), max + pad]
}

/// Count, min, average and max of a metric's present values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub count: usize,
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

pub fn summarize<'a, I>(records: I, metric: Metric) -> Option<MetricSummary>
where
    I: IntoIterator<Item = &'a SampleRecord>,
{
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for value in records.into_iter().filter_map(|r| r.get(metric)) {
        count += 1;
        sum += value;
        min = min.min(value);
        max = max.max(value);
    }

    (count > 0).then(|| MetricSummary {
        count,
        min,
        avg: sum / count as f64,
        max,
    })
}
