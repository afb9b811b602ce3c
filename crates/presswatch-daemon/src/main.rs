//! PressWatch daemon
//!
//! Headless deployment shape: the sampling loop runs on the process's
//! only thread, blocking on each read and each wait. Every successful
//! cycle logs the calibrated pressure; threshold breaches log at WARN.
//!
//! Configuration is file-based (no command-line flags): an optional JSON
//! config at a compiled-in path, with the same fail-open policy as the
//! calibration file.

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use presswatch_core::iio;
use presswatch_core::monitor::{Monitor, MonitorConfig};

/// Compiled-in config file location
const CONFIG_PATH: &str = "/etc/presswatch.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = MonitorConfig::load_or_default(Path::new(CONFIG_PATH));

    let devices = iio::list_devices();
    if devices.is_empty() && !config.demo {
        tracing::warn!("no IIO devices found; reads will be skipped until one appears");
    }
    for device in &devices {
        tracing::info!(
            "found IIO device {} ({})",
            device.id,
            device.name.as_deref().unwrap_or("unnamed")
        );
    }

    let mut monitor = Monitor::new(config);
    let calibration = monitor.handle().calibration();
    tracing::info!(
        "Starting pressure daemon, using calibration: a={} b={}",
        calibration.gain,
        calibration.offset
    );

    // runs indefinitely; every failure is skip-and-continue
    monitor.run();
    Ok(())
}
