//! End-to-end pipeline behavior against real files on disk.

use pretty_assertions::assert_eq;
use presswatch_core::calibration::Calibration;
use presswatch_core::monitor::{Monitor, MonitorConfig, MonitorEvent, MonitorState};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// A temp directory posing as one IIO channel pair
struct FakeChannel {
    dir: TempDir,
}

impl FakeChannel {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn raw_path(&self) -> PathBuf {
        self.dir.path().join("in_voltage0_raw")
    }

    fn scale_path(&self) -> PathBuf {
        self.dir.path().join("in_voltage0_scale")
    }

    fn write(&self, raw: &str, scale: &str) {
        fs::write(self.raw_path(), raw).unwrap();
        fs::write(self.scale_path(), scale).unwrap();
    }

    fn config(&self) -> MonitorConfig {
        MonitorConfig {
            raw_path: self.raw_path(),
            scale_path: self.scale_path(),
            calibration_path: self.dir.path().join("pressure_calib.json"),
            interval_ms: 0,
            ..MonitorConfig::default()
        }
    }
}

#[test]
fn twelve_bit_full_scale_reads_exactly_3v3() {
    let channel = FakeChannel::new();
    channel.write("4096\n", "0.0008056640625\n");

    let mut monitor = Monitor::with_calibration(channel.config(), Calibration::default());
    let reading = monitor.run_cycle().expect("cycle should produce a reading");

    assert_eq!(reading.raw, 4096);
    assert_eq!(reading.voltage, 3.3);
    assert_eq!(reading.pressure, 3.3);
}

#[test]
fn calibration_is_applied_to_the_reading() {
    let channel = FakeChannel::new();
    channel.write("2048\n", "0.001\n");

    let mut monitor = Monitor::with_calibration(channel.config(), Calibration::new(10.0, 5.0));
    let reading = monitor.run_cycle().unwrap();

    assert_eq!(reading.voltage, 2.048);
    assert_eq!(reading.pressure, 10.0 * 2.048 + 5.0);
}

#[test]
fn failed_raw_read_skips_cycle_without_alert() {
    let channel = FakeChannel::new();
    // scale present, raw missing
    fs::write(channel.scale_path(), "0.001\n").unwrap();

    let mut monitor = Monitor::with_calibration(channel.config(), Calibration::default());
    let handle = monitor.handle();
    let events = handle.subscribe();
    handle.set_threshold(-1.0).unwrap();

    // no pressure computed, no alert evaluated, no panic
    assert!(monitor.run_cycle().is_none());
    assert!(events.try_recv().is_err());

    // the loop recovers as soon as the channel is readable again
    channel.write("100\n", "0.001\n");
    assert!(monitor.run_cycle().is_some());
}

#[test]
fn malformed_channel_content_skips_cycle() {
    let channel = FakeChannel::new();
    channel.write("garbage\n", "0.001\n");

    let mut monitor = Monitor::with_calibration(channel.config(), Calibration::default());
    assert!(monitor.run_cycle().is_none());
}

#[test]
fn breaching_cycle_publishes_reading_then_alert() {
    let channel = FakeChannel::new();
    channel.write("1500\n", "1.0\n");

    let mut monitor = Monitor::with_calibration(channel.config(), Calibration::default());
    let handle = monitor.handle();
    let events = handle.subscribe();
    handle.set_threshold(1000.0).unwrap();

    monitor.run_cycle().unwrap();

    match events.try_recv().unwrap() {
        MonitorEvent::Reading(reading) => assert_eq!(reading.pressure, 1500.0),
        other => panic!("expected Reading, got {:?}", other),
    }
    match events.try_recv().unwrap() {
        MonitorEvent::Alert { reading, limit } => {
            assert_eq!(reading.pressure, 1500.0);
            assert_eq!(limit, 1000.0);
        }
        other => panic!("expected Alert, got {:?}", other),
    }
    // nothing further for this cycle
    assert!(events.try_recv().is_err());
}

#[test]
fn reading_at_the_limit_does_not_alert() {
    let channel = FakeChannel::new();
    channel.write("1000\n", "1.0\n");

    let mut monitor = Monitor::with_calibration(channel.config(), Calibration::default());
    let handle = monitor.handle();
    let events = handle.subscribe();
    handle.set_threshold(1000.0).unwrap();

    monitor.run_cycle().unwrap();

    assert!(matches!(
        events.try_recv().unwrap(),
        MonitorEvent::Reading(_)
    ));
    assert!(events.try_recv().is_err());
}

#[test]
fn every_breaching_cycle_realerts() {
    let channel = FakeChannel::new();
    channel.write("2000\n", "1.0\n");

    let mut monitor = Monitor::with_calibration(channel.config(), Calibration::default());
    let handle = monitor.handle();
    let events = handle.subscribe();
    handle.set_threshold(1000.0).unwrap();

    for _ in 0..3 {
        monitor.run_cycle().unwrap();
    }

    let alerts = events
        .try_iter()
        .filter(|e| matches!(e, MonitorEvent::Alert { .. }))
        .count();
    assert_eq!(alerts, 3);
}

#[test]
fn background_loop_samples_until_stopped() {
    let channel = FakeChannel::new();
    channel.write("500\n", "0.001\n");

    let mut config = channel.config();
    config.interval_ms = 1;
    let mut monitor = Monitor::with_calibration(config, Calibration::default());
    let handle = monitor.handle();
    let events = handle.subscribe();

    monitor.start();
    assert_eq!(handle.state(), MonitorState::Sampling);

    // wait for a few cycles to land
    let mut seen = 0;
    for _ in 0..50 {
        seen += events.try_iter().count();
        if seen >= 3 {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(seen >= 3, "only {} events before timeout", seen);

    monitor.stop();
    assert_eq!(handle.state(), MonitorState::Idle);
}
