use ratatui::{
    prelude::*,
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use super::app::StatsApp;
use super::series::{summarize, y_bounds};
use crate::core::system_monitor::Metric;
use crate::ui::formatters::{axis_title, format_metric};

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &StatsApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Metric tabs
            Constraint::Min(8),    // Chart
            Constraint::Length(1), // Summary
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_tabs(frame, chunks[0], app);
    render_chart(frame, chunks[1], app);
    render_summary(frame, chunks[2], app);
    render_footer(frame, chunks[3]);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &StatsApp) {
    let spans: Vec<Span> = Metric::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, metric)| {
            let style = if *metric == app.metric {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [
                Span::styled(format!(" {} {} ", i + 1, metric.label()), style),
                Span::raw(" "),
            ]
        })
        .collect();

    let tabs = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Sentinel history "),
    );
    frame.render_widget(tabs, area);
}

fn render_chart(frame: &mut Frame, area: Rect, app: &StatsApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} - last {} min ", app.metric.label(), app.window_minutes));

    if let Some(ref err) = app.load_error {
        let message = Paragraph::new(format!("History unavailable: {}", err))
            .style(Style::default().fg(Color::Red))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let points = app.points();
    if points.is_empty() {
        let message = Paragraph::new("No samples recorded in this window yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let [y_min, y_max] = y_bounds(app.metric, &points);
    let window = app.window_minutes as f64;

    let dataset = Dataset::default()
        .name(app.metric.key())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let x_axis = Axis::default()
        .title("Minutes")
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, window])
        .labels([
            format!("-{}", app.window_minutes),
            format!("-{}", app.window_minutes / 2),
            "now".to_string(),
        ]);

    let y_axis = Axis::default()
        .title(axis_title(app.metric, app.unit))
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels([
            format!("{:.1}", y_min),
            format!("{:.1}", (y_min + y_max) / 2.0),
            format!("{:.1}", y_max),
        ]);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

fn render_summary(frame: &mut Frame, area: Rect, app: &StatsApp) {
    let text = match summarize(app.window_records(), app.metric) {
        Some(summary) => {
            // Temperatures are stored in Celsius; format_metric converts
            format!(
                " {} samples  min {}  avg {}  max {}",
                summary.count,
                format_metric(app.metric, summary.min, app.unit),
                format_metric(app.metric, summary.avg, app.unit),
                format_metric(app.metric, summary.max, app.unit),
            )
        }
        None => " No samples for this metric".to_string(),
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::White)),
        area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(" 1-4/c r t d: select metric  Tab: next  q: quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}
