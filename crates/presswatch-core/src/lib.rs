//! # PressWatch Core Library
//!
//! Core functionality for the PressWatch pressure monitoring tools.
//!
//! This library provides:
//! - IIO sysfs channel reading and device discovery
//! - Linear calibration (voltage → pressure) with file-based loading
//! - Threshold evaluation and alerting
//! - The periodic sampling loop with start/stop lifecycle
//! - Rolling sample history for chart rendering
//! - A demo simulator for running without hardware
//!
//! ## Deployment shapes
//!
//! The same pipeline backs two binaries: `presswatch-daemon` runs the
//! loop on its only thread and logs each reading; `presswatch-tui` runs
//! it on a background worker and renders a live chart with editable
//! calibration.
//!
//! ## Example
//!
//! ```rust,ignore
//! use presswatch_core::monitor::{Monitor, MonitorConfig};
//!
//! let mut monitor = Monitor::new(MonitorConfig::default());
//! let handle = monitor.handle();
//! let events = handle.subscribe();
//!
//! monitor.start();
//! while let Ok(event) = events.recv() {
//!     println!("{:?}", event);
//! }
//! ```

#![warn(missing_docs)]

pub mod calibration;
pub mod demo;
pub mod history;
pub mod iio;
pub mod monitor;
pub mod sampler;
pub mod threshold;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::calibration::Calibration;
    pub use crate::demo::DemoSimulator;
    pub use crate::history::SampleHistory;
    pub use crate::iio::{list_devices, DeviceInfo, ReadError};
    pub use crate::monitor::{
        Monitor, MonitorConfig, MonitorEvent, MonitorHandle, MonitorState,
    };
    pub use crate::sampler::{PressureReading, RawSample, Sampler};
    pub use crate::threshold::{check, ThresholdVerdict};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
