//! Monitor lifecycle and sampling loop
//!
//! Owns the shared calibration/threshold state and drives the periodic
//! read → convert → evaluate → publish cycle. The loop runs either on the
//! calling thread ([`Monitor::run`], daemon form) or on a background
//! worker ([`Monitor::start`]/[`Monitor::stop`], interactive form).
//!
//! Failure policy is skip-and-continue: a failed channel read skips the
//! rest of that cycle and the loop proceeds to the wait step. No error
//! aborts the loop.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calibration::Calibration;
use crate::demo::DemoSimulator;
use crate::history;
use crate::iio::{self, ReadError};
use crate::sampler::{PressureReading, RawSample, Sampler};
use crate::threshold;

/// Default sampling interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Default alert threshold in pressure units
pub const DEFAULT_THRESHOLD: f64 = 1000.0;

/// Default calibration file location
pub const DEFAULT_CALIBRATION_PATH: &str = "/etc/presswatch_calib.json";

/// Monitor configuration
///
/// File-based: binaries load this from a compiled-in JSON path with full
/// default fallback. There is no command-line surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Path of the raw-count channel attribute
    pub raw_path: PathBuf,

    /// Path of the scale-factor channel attribute
    pub scale_path: PathBuf,

    /// Path of the calibration file
    pub calibration_path: PathBuf,

    /// Wait between cycles, measured from the end of the previous cycle
    pub interval_ms: u64,

    /// Initial alert threshold
    pub threshold: f64,

    /// Readings retained for the chart
    pub history_capacity: usize,

    /// Use the demo simulator instead of sysfs channels
    pub demo: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let (raw_path, scale_path) = iio::channel_paths(iio::DEFAULT_DEVICE, iio::DEFAULT_CHANNEL);
        Self {
            raw_path,
            scale_path,
            calibration_path: PathBuf::from(DEFAULT_CALIBRATION_PATH),
            interval_ms: DEFAULT_INTERVAL_MS,
            threshold: DEFAULT_THRESHOLD,
            history_capacity: history::DEFAULT_CAPACITY,
            demo: false,
        }
    }
}

impl MonitorConfig {
    /// The sampling interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Load configuration from a JSON file, falling back to defaults
    ///
    /// Same fail-open policy as the calibration file: a bad config file
    /// must never prevent startup.
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config file at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(
                    "config file {} unreadable ({}), using defaults",
                    path.display(),
                    e
                );
                return Self::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "config file {} malformed ({}), using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

/// Sampling state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorState {
    /// Not sampling
    Idle,
    /// Periodic cycle active
    Sampling,
}

/// Event published to subscribers on each successful cycle
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A pressure reading was computed
    Reading(PressureReading),
    /// The reading exceeded the alert limit
    Alert {
        /// The breaching reading
        reading: PressureReading,
        /// The limit in force when it was evaluated
        limit: f64,
    },
}

/// Errors from the operator-facing setters
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("threshold must be a finite number, got {0}")]
    InvalidThreshold(f64),
}

/// State shared between the worker thread and the operator interface.
/// Single writer (operator), single reader (worker); last-write-wins.
struct Shared {
    calibration: Mutex<Calibration>,
    threshold: Mutex<f64>,
    running: AtomicBool,
    subscribers: Mutex<Vec<Sender<MonitorEvent>>>,
}

impl Shared {
    fn calibration(&self) -> Calibration {
        self.calibration.lock().map(|c| *c).unwrap_or_default()
    }

    fn threshold(&self) -> f64 {
        self.threshold.lock().map(|t| *t).unwrap_or(DEFAULT_THRESHOLD)
    }

    fn publish(&self, event: MonitorEvent) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

/// Where cycles get their raw samples from
enum SampleSource {
    Sysfs(Sampler),
    Demo {
        simulator: DemoSimulator,
        started: Instant,
    },
}

impl SampleSource {
    fn acquire(&mut self) -> Result<RawSample, ReadError> {
        match self {
            SampleSource::Sysfs(sampler) => sampler.acquire(),
            SampleSource::Demo { simulator, started } => {
                Ok(simulator.sample(started.elapsed().as_millis() as u64))
            }
        }
    }
}

/// Everything one cycle needs; owned by whichever thread runs the loop
struct CycleContext {
    source: SampleSource,
    shared: Arc<Shared>,
}

impl CycleContext {
    /// Execute one read → convert → evaluate → publish cycle
    fn run_once(&mut self) -> Option<PressureReading> {
        let sample = match self.source.acquire() {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!("sample read failed, skipping cycle: {e}");
                return None;
            }
        };

        let calibration = self.shared.calibration();
        let reading = PressureReading::compute(sample, calibration);

        tracing::info!(
            "Pressure: {:.3} (voltage={:.6} raw={})",
            reading.pressure,
            reading.voltage,
            reading.raw
        );
        self.shared.publish(MonitorEvent::Reading(reading));

        let limit = self.shared.threshold();
        if threshold::check(reading.pressure, limit).is_alert() {
            tracing::warn!("Pressure threshold exceeded: {:.3}", reading.pressure);
            self.shared.publish(MonitorEvent::Alert { reading, limit });
        }

        Some(reading)
    }
}

/// Fixed wait from the end of a cycle, interruptible by the stop flag
/// so stop() never stalls a full interval
fn wait(shared: &Shared, interval: Duration) {
    let deadline = Instant::now() + interval;
    while shared.running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(Duration::from_millis(50)));
    }
}

/// Drives the sampling pipeline and owns its worker thread
pub struct Monitor {
    interval: Duration,
    shared: Arc<Shared>,
    /// Present while Idle; moved into the worker while Sampling
    cycle: Option<CycleContext>,
    worker: Option<JoinHandle<CycleContext>>,
}

impl Monitor {
    /// Create a monitor, loading calibration from the configured path
    pub fn new(config: MonitorConfig) -> Self {
        let calibration = Calibration::load(&config.calibration_path);
        Self::with_calibration(config, calibration)
    }

    /// Create a monitor with an explicit calibration
    pub fn with_calibration(config: MonitorConfig, calibration: Calibration) -> Self {
        let shared = Arc::new(Shared {
            calibration: Mutex::new(calibration),
            threshold: Mutex::new(config.threshold),
            running: AtomicBool::new(false),
            subscribers: Mutex::new(Vec::new()),
        });

        let interval = config.interval();
        let source = if config.demo {
            SampleSource::Demo {
                simulator: DemoSimulator::new(),
                started: Instant::now(),
            }
        } else {
            SampleSource::Sysfs(Sampler::new(config.raw_path, config.scale_path))
        };

        Self {
            interval,
            cycle: Some(CycleContext {
                source,
                shared: Arc::clone(&shared),
            }),
            shared,
            worker: None,
        }
    }

    /// A cloneable handle to the operator interface
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Current sampling state
    pub fn state(&self) -> MonitorState {
        if self.shared.running.load(Ordering::SeqCst) {
            MonitorState::Sampling
        } else {
            MonitorState::Idle
        }
    }

    /// Transition Idle → Sampling: spawn the worker thread
    ///
    /// A no-op when already sampling.
    pub fn start(&mut self) {
        let Some(mut cycle) = self.cycle.take() else {
            return;
        };

        self.shared.running.store(true, Ordering::SeqCst);
        let interval = self.interval;
        self.worker = Some(thread::spawn(move || {
            while cycle.shared.running.load(Ordering::SeqCst) {
                cycle.run_once();
                wait(&cycle.shared, interval);
            }
            cycle
        }));
        tracing::debug!("sampling started");
    }

    /// Transition Sampling → Idle: stop the worker and reclaim the loop
    ///
    /// The in-flight cycle completes; stopping only prevents the next
    /// cycle from starting.
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if let Ok(cycle) = worker.join() {
                self.cycle = Some(cycle);
            }
        }
        tracing::debug!("sampling stopped");
    }

    /// Run the sampling loop on the calling thread (daemon form)
    ///
    /// Blocks until another thread calls stop via a handle-owner; with no
    /// stop the loop runs indefinitely.
    pub fn run(&mut self) {
        let Some(mut cycle) = self.cycle.take() else {
            return;
        };

        self.shared.running.store(true, Ordering::SeqCst);
        while self.shared.running.load(Ordering::SeqCst) {
            cycle.run_once();
            wait(&self.shared, self.interval);
        }
        self.cycle = Some(cycle);
    }

    /// Execute one cycle immediately, without waiting
    ///
    /// Only meaningful while Idle (diagnostics and tests); returns `None`
    /// when sampling is active or the cycle was skipped.
    pub fn run_cycle(&mut self) -> Option<PressureReading> {
        self.cycle.as_mut().and_then(|cycle| cycle.run_once())
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Narrow operator interface shared with the presentation layer
///
/// The presentation layer sees exactly this surface: get/set calibration,
/// get/set threshold, observe state, subscribe to readings. It has no
/// access to the loop internals.
#[derive(Clone)]
pub struct MonitorHandle {
    shared: Arc<Shared>,
}

impl MonitorHandle {
    /// The calibration currently applied to new readings
    pub fn calibration(&self) -> Calibration {
        self.shared.calibration()
    }

    /// Replace the calibration; takes effect from the next cycle
    pub fn set_calibration(&self, calibration: Calibration) {
        if let Ok(mut current) = self.shared.calibration.lock() {
            *current = calibration;
        }
    }

    /// The alert limit currently in force
    pub fn threshold(&self) -> f64 {
        self.shared.threshold()
    }

    /// Replace the alert limit
    ///
    /// Non-finite limits are rejected and the previous value kept.
    pub fn set_threshold(&self, limit: f64) -> Result<(), MonitorError> {
        if !limit.is_finite() {
            return Err(MonitorError::InvalidThreshold(limit));
        }
        if let Ok(mut current) = self.shared.threshold.lock() {
            *current = limit;
        }
        Ok(())
    }

    /// Current sampling state
    pub fn state(&self) -> MonitorState {
        if self.shared.running.load(Ordering::SeqCst) {
            MonitorState::Sampling
        } else {
            MonitorState::Idle
        }
    }

    /// Subscribe to per-cycle events
    ///
    /// The receiver gets a [`MonitorEvent::Reading`] for every successful
    /// cycle, followed by a [`MonitorEvent::Alert`] when the reading
    /// breached the limit. Dropped receivers are pruned on publish.
    pub fn subscribe(&self) -> Receiver<MonitorEvent> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subscribers) = self.shared.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }
}
