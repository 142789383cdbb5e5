use crossterm::event::KeyCode;

use crate::core::system_monitor::Metric;

/// Events that can occur in the history chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsEvent {
    /// Quit the application
    Quit,
    /// Show a specific metric
    Select(Metric),
    /// Cycle to the next metric
    NextMetric,
    /// No action
    None,
}

impl StatsEvent {
    pub fn from_key(code: KeyCode) -> Self {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => StatsEvent::Quit,
            KeyCode::Char('1') | KeyCode::Char('c') => StatsEvent::Select(Metric::Cpu),
            KeyCode::Char('2') | KeyCode::Char('r') => StatsEvent::Select(Metric::Ram),
            KeyCode::Char('3') | KeyCode::Char('t') => StatsEvent::Select(Metric::Temp),
            KeyCode::Char('4') | KeyCode::Char('d') => StatsEvent::Select(Metric::Disk),
            KeyCode::Tab => StatsEvent::NextMetric,
            _ => StatsEvent::None,
        }
    }
}
