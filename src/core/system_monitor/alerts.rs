//! Alert system for monitoring critical conditions.
//!
//! [`AlertGate`] decides whether a threshold violation should be surfaced now,
//! suppressing repeats of the same metric until the renotification interval
//! has elapsed. Suppression is driven by time since the last firing, never by
//! the value itself.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::{Comparator, Metric, TemperatureUnit};

/// Per-metric renotification state
#[derive(Debug, Default, Clone)]
pub struct AlertGate {
    last_fired: HashMap<Metric, DateTime<Utc>>,
}

impl AlertGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `metric` should alert at `now`, and record the firing
    /// if so.
    ///
    /// Returns true only when `comparator` holds strictly for `value` against
    /// `threshold` and either the metric never fired or at least
    /// `min_interval` has passed since it last did. A true return updates the
    /// last-fired time, so this must only be called once per evaluation.
    pub fn should_alert(
        &mut self,
        metric: Metric,
        value: f64,
        threshold: f64,
        comparator: Comparator,
        now: DateTime<Utc>,
        min_interval: Duration,
    ) -> bool {
        if !comparator.violates(value, threshold) {
            return false;
        }

        let armed = match self.last_fired.get(&metric) {
            None => true,
            // A clock that moved backwards leaves a negative gap, which is
            // below any interval
            Some(last) => match now.signed_duration_since(*last).to_std() {
                Ok(elapsed) => elapsed >= min_interval,
                Err(_) => false,
            },
        };

        if armed {
            self.last_fired.insert(metric, now);
        }
        armed
    }

    pub fn last_fired(&self, metric: Metric) -> Option<DateTime<Utc>> {
        self.last_fired.get(&metric).copied()
    }
}

/// An alert ready to hand to a notification sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub metric: Metric,
    pub title: String,
    pub message: String,
    /// Sampled value in the metric's native unit (Celsius for temperature)
    pub value: f64,
    pub threshold: f64,
}

impl Alert {
    pub fn new(metric: Metric, value: f64, threshold: f64, unit: TemperatureUnit) -> Self {
        let title = match metric {
            Metric::Cpu => "CPU Alert",
            Metric::Ram => "RAM Alert",
            Metric::Temp => "Temperature Alert",
            Metric::Disk => "Disk Alert",
        };

        let message = match metric {
            Metric::Cpu => format!("High CPU usage: {:.1}%", value),
            Metric::Ram => format!("High RAM usage: {:.1}%", value),
            Metric::Temp => format!(
                "High temperature: {:.1}{}",
                unit.from_celsius(value),
                unit.symbol()
            ),
            Metric::Disk => format!("Low free space: {:.2} GiB", value),
        };

        Self {
            metric,
            title: title.to_string(),
            message,
            value,
            threshold,
        }
    }
}

/// Destination for alerts (desktop notifications, logs, test recorders)
pub trait NotificationSink: Send {
    /// Deliver an alert. Implementations must not block the caller for long
    /// and must swallow their own failures.
    fn notify(&self, alert: &Alert);
}
