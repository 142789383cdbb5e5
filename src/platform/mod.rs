// Platform-specific code module

pub mod notify;
pub mod power;

// Re-exports for cleaner imports
pub use notify::{notification_command, DesktopNotifier, LogNotifier};
pub use power::{PowerAction, TouchscreenState};
