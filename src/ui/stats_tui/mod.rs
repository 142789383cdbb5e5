//! Terminal chart of recorded history.
//!
//! Shows one metric at a time over a trailing window, reloading the history
//! log every second.

mod app;
mod event_handler;
mod render;
pub mod series;

pub use app::{run_stats_app, StatsApp, StatsAppConfig};
pub use event_handler::StatsEvent;
pub use series::{summarize, window_series, window_start, y_bounds, MetricSummary, MAX_WINDOW_MINUTES};
