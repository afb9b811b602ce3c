//! PressWatch TUI
//!
//! Interactive deployment shape: the sampling loop runs on a background
//! worker so the terminal stays responsive, and the operator can edit
//! the threshold and calibration while watching a live chart of the
//! last 200 readings.
//!
//! Configuration comes from the same compiled-in JSON path as the
//! daemon; with `"demo": true` the app runs without an IIO device.

mod app;
mod ui;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use app::App;
use presswatch_core::monitor::MonitorConfig;

/// Compiled-in config file location, shared with the daemon
const CONFIG_PATH: &str = "/etc/presswatch.json";

/// Render/input poll cadence
const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let config = MonitorConfig::load_or_default(Path::new(CONFIG_PATH));
    let mut app = App::new(config);

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.tick();
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}
