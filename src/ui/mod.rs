// UI and formatting module

pub mod formatters;
pub mod prompts;
pub mod stats_tui;

// Re-export commonly used items for cleaner imports
pub use formatters::{axis_title, format_gib, format_metric, format_percent, format_temperature, format_time};
pub use prompts::{info, read_confirmation, success, warn};
