//! Application state and input handling
//!
//! The monitor loop runs on its worker thread; this side only drains the
//! event channel into the chart history and forwards operator edits
//! through the monitor handle.

use std::sync::mpsc::Receiver;

use crossterm::event::{KeyCode, KeyEvent};

use presswatch_core::calibration::Calibration;
use presswatch_core::history::SampleHistory;
use presswatch_core::monitor::{
    Monitor, MonitorConfig, MonitorEvent, MonitorHandle, MonitorState,
};
use presswatch_core::sampler::PressureReading;

/// Operator-editable input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Threshold,
    Gain,
    Offset,
}

impl Field {
    /// Tab order
    pub fn next(self) -> Self {
        match self {
            Field::Threshold => Field::Gain,
            Field::Gain => Field::Offset,
            Field::Offset => Field::Threshold,
        }
    }

    /// Label shown next to the field
    pub fn label(self) -> &'static str {
        match self {
            Field::Threshold => "Threshold",
            Field::Gain => "Calibration a (gain)",
            Field::Offset => "Calibration b (offset)",
        }
    }
}

/// Top-level application state
pub struct App {
    monitor: Monitor,
    handle: MonitorHandle,
    events: Receiver<MonitorEvent>,
    /// Rolling window of readings for the chart
    pub history: SampleHistory,
    /// Field currently receiving keystrokes
    pub focus: Field,
    /// Edit buffers, applied on Enter
    pub threshold_input: String,
    pub gain_input: String,
    pub offset_input: String,
    /// One-line operator notice (apply results, rejected input)
    pub notice: Option<String>,
    /// Reading that most recently breached the limit, if the latest
    /// cycle still breaches
    pub alert: Option<PressureReading>,
    /// Set by the quit key
    pub should_quit: bool,
}

impl App {
    /// Build the application around a monitor for the given config
    pub fn new(config: MonitorConfig) -> Self {
        let history = SampleHistory::new(config.history_capacity);
        let monitor = Monitor::new(config);
        let handle = monitor.handle();
        let events = handle.subscribe();
        let calibration = handle.calibration();

        Self {
            threshold_input: format_num(handle.threshold()),
            gain_input: format_num(calibration.gain),
            offset_input: format_num(calibration.offset),
            monitor,
            handle,
            events,
            history,
            focus: Field::Threshold,
            notice: None,
            alert: None,
            should_quit: false,
        }
    }

    /// Current sampling state
    pub fn state(&self) -> MonitorState {
        self.handle.state()
    }

    /// The limit currently in force
    pub fn threshold(&self) -> f64 {
        self.handle.threshold()
    }

    /// Drain pending monitor events into the presentation state
    pub fn tick(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                MonitorEvent::Reading(reading) => {
                    // a quiet reading clears the banner; an Alert event
                    // for the same cycle re-raises it right after
                    self.alert = None;
                    self.history.push(reading);
                }
                MonitorEvent::Alert { reading, .. } => {
                    self.alert = Some(reading);
                }
            }
        }
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.monitor.stop();
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.toggle_sampling(),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::Enter => self.apply_focused(),
            KeyCode::Backspace => {
                self.focused_input_mut().pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                self.focused_input_mut().push(c);
            }
            _ => {}
        }
    }

    fn toggle_sampling(&mut self) {
        match self.handle.state() {
            MonitorState::Idle => {
                self.monitor.start();
                self.notice = Some("Sampling started".to_string());
            }
            MonitorState::Sampling => {
                self.monitor.stop();
                self.notice = Some("Sampling stopped".to_string());
            }
        }
    }

    fn apply_focused(&mut self) {
        match self.focus {
            Field::Threshold => self.apply_threshold(),
            Field::Gain | Field::Offset => self.apply_calibration(),
        }
    }

    fn apply_threshold(&mut self) {
        match self.threshold_input.trim().parse::<f64>() {
            Ok(limit) => match self.handle.set_threshold(limit) {
                Ok(()) => self.notice = Some(format!("Threshold set to {}", limit)),
                Err(e) => {
                    self.notice = Some(e.to_string());
                    self.threshold_input = format_num(self.handle.threshold());
                }
            },
            Err(_) => {
                self.notice = Some("Invalid threshold value".to_string());
                self.threshold_input = format_num(self.handle.threshold());
            }
        }
    }

    /// Both calibration fields apply together, as one edit
    fn apply_calibration(&mut self) {
        let parsed = (
            self.gain_input.trim().parse::<f64>(),
            self.offset_input.trim().parse::<f64>(),
        );
        match parsed {
            (Ok(gain), Ok(offset)) => {
                self.handle.set_calibration(Calibration::new(gain, offset));
                self.notice = Some("Calibration values updated".to_string());
            }
            _ => {
                let current = self.handle.calibration();
                self.gain_input = format_num(current.gain);
                self.offset_input = format_num(current.offset);
                self.notice = Some("Invalid calibration values".to_string());
            }
        }
    }

    /// Current text of a field's edit buffer
    pub fn field_value(&self, field: Field) -> &str {
        match field {
            Field::Threshold => &self.threshold_input,
            Field::Gain => &self.gain_input,
            Field::Offset => &self.offset_input,
        }
    }

    fn focused_input_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Threshold => &mut self.threshold_input,
            Field::Gain => &mut self.gain_input,
            Field::Offset => &mut self.offset_input,
        }
    }
}

fn format_num(value: f64) -> String {
    format!("{}", value)
}
