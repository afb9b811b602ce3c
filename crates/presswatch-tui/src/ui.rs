//! Rendering
//!
//! Layout, top to bottom: status header, pressure chart, operator
//! controls, key help line.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use presswatch_core::monitor::MonitorState;

use crate::app::{App, Field};

/// Render one frame
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_chart(frame, app, chunks[1]);
    draw_controls(frame, app, chunks[2]);
    draw_help(frame, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = match app.state() {
        MonitorState::Sampling => Span::styled("SAMPLING", Style::default().fg(Color::Green)),
        MonitorState::Idle => Span::styled("IDLE", Style::default().fg(Color::DarkGray)),
    };

    let pressure = match app.history.latest() {
        Some(reading) => format!("Current Pressure: {:.3}", reading.pressure),
        None => "Current Pressure: ---".to_string(),
    };

    let mut spans = vec![
        state,
        Span::raw("  "),
        Span::styled(pressure, Style::default().add_modifier(Modifier::BOLD)),
    ];

    if let Some(reading) = &app.alert {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("Pressure too high: {:.2}", reading.pressure),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD | Modifier::RAPID_BLINK),
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("PressWatch"));
    frame.render_widget(header, area);
}

fn draw_chart(frame: &mut Frame, app: &App, area: Rect) {
    let pressures = app.history.pressures();
    let points: Vec<(f64, f64)> = pressures
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, *p))
        .collect();

    let limit = app.threshold();
    let x_max = (app.history.capacity().saturating_sub(1)).max(1) as f64;

    // y bounds cover the data and the limit line, with a little headroom
    let mut y_min = limit;
    let mut y_max = limit;
    for p in &pressures {
        y_min = y_min.min(*p);
        y_max = y_max.max(*p);
    }
    if y_min == y_max {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = (y_max - y_min) * 0.05;
    let y_bounds = [y_min - pad, y_max + pad];

    let limit_points = [(0.0, limit), (x_max, limit)];

    let datasets = vec![
        Dataset::default()
            .name("limit")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&limit_points),
        Dataset::default()
            .name("pressure")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Pressure over Time"),
        )
        .x_axis(
            Axis::default()
                .title("Sample")
                .bounds([0.0, x_max])
                .labels([Line::from("0"), Line::from(format!("{}", x_max as usize))]),
        )
        .y_axis(
            Axis::default()
                .title("Pressure")
                .bounds(y_bounds)
                .labels([
                    Line::from(format!("{:.1}", y_bounds[0])),
                    Line::from(format!("{:.1}", y_bounds[1])),
                ]),
        );
    frame.render_widget(chart, area);
}

fn draw_controls(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for field in [Field::Threshold, Field::Gain, Field::Offset] {
        let focused = app.focus == field;
        let marker = if focused { "> " } else { "  " };
        let value_style = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::raw(format!("{}: ", field.label())),
            Span::styled(app.field_value(field).to_string(), value_style),
        ]));
    }

    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    let controls = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Calibration (Pressure = a*Voltage + b)"),
    );
    frame.render_widget(controls, area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(
        "space: start/stop  tab: next field  enter: apply  q: quit",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
