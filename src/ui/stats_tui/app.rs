use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::system_monitor::{HistoryStore, Metric, SampleRecord, TemperatureUnit};

use super::event_handler::StatsEvent;
use super::render::render_ui;
use super::series::{window_series, window_start, MAX_WINDOW_MINUTES};

const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for the history chart
#[derive(Debug, Clone)]
pub struct StatsAppConfig {
    pub history_path: PathBuf,
    pub metric: Metric,
    pub window_minutes: i64,
    pub unit: TemperatureUnit,
}

/// History chart state
pub struct StatsApp {
    pub metric: Metric,
    pub window_minutes: i64,
    pub unit: TemperatureUnit,
    pub records: Vec<SampleRecord>,
    /// Set when the last reload failed
    pub load_error: Option<String>,
    pub should_quit: bool,
    history: HistoryStore,
}

impl StatsApp {
    pub fn new(config: StatsAppConfig) -> Self {
        Self {
            metric: config.metric,
            window_minutes: config.window_minutes.clamp(1, MAX_WINDOW_MINUTES),
            unit: config.unit,
            records: Vec::new(),
            load_error: None,
            should_quit: false,
            history: HistoryStore::open(config.history_path),
        }
    }

    /// Re-read the history log
    pub fn reload(&mut self) {
        match self.history.load_all() {
            Ok(records) => {
                self.records = records;
                self.load_error = None;
            }
            Err(e) => self.load_error = Some(e.to_string()),
        }
    }

    pub fn handle_event(&mut self, event: StatsEvent) {
        match event {
            StatsEvent::Quit => self.should_quit = true,
            StatsEvent::Select(metric) => self.metric = metric,
            StatsEvent::NextMetric => {
                let idx = Metric::ALL
                    .iter()
                    .position(|m| *m == self.metric)
                    .unwrap_or(0);
                self.metric = Metric::ALL[(idx + 1) % Metric::ALL.len()];
            }
            StatsEvent::None => {}
        }
    }

    /// Records inside the window ending now
    pub fn window_records(&self) -> impl Iterator<Item = &SampleRecord> + '_ {
        let start = window_start(Utc::now(), self.window_minutes);
        self.records
            .iter()
            .filter(move |r| start.is_some_and(|start| r.timestamp >= start))
    }

    /// Points of the selected metric inside the window ending now
    pub fn points(&self) -> Vec<(f64, f64)> {
        window_series(
            &self.records,
            self.metric,
            Utc::now(),
            chrono::Duration::minutes(self.window_minutes),
            self.unit,
        )
    }
}

/// Run the history chart until the user quits
pub fn run_stats_app(config: StatsAppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = StatsApp::new(config);
    app.reload();

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut StatsApp,
) -> Result<()> {
    let mut last_reload = Instant::now();

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        let timeout = REFRESH_INTERVAL
            .checked_sub(last_reload.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    app.handle_event(StatsEvent::from_key(key.code));
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if last_reload.elapsed() >= REFRESH_INTERVAL {
            app.reload();
            last_reload = Instant::now();
        }
    }
}
