//! Sample acquisition
//!
//! One sample is two reads: the raw ADC count and the per-channel scale
//! factor that converts counts to volts. Either read failing aborts the
//! acquisition; nothing is retained between samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::calibration::Calibration;
use crate::iio::{self, ReadError};

/// One cycle's worth of raw channel values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Unconverted ADC count
    pub raw: i64,
    /// Count-to-volts multiplier reported by the channel
    pub scale: f64,
}

impl RawSample {
    /// Voltage seen on the channel
    #[inline]
    pub fn voltage(&self) -> f64 {
        self.raw as f64 * self.scale
    }
}

/// A calibrated pressure value derived from one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureReading {
    /// When the sample was taken
    pub timestamp: DateTime<Utc>,
    /// Raw ADC count the reading was derived from
    pub raw: i64,
    /// Channel voltage (raw × scale)
    pub voltage: f64,
    /// Calibrated pressure (gain × voltage + offset)
    pub pressure: f64,
}

impl PressureReading {
    /// Derive a reading from a raw sample and the current calibration
    pub fn compute(sample: RawSample, calibration: Calibration) -> Self {
        let voltage = sample.voltage();
        Self {
            timestamp: Utc::now(),
            raw: sample.raw,
            voltage,
            pressure: calibration.apply(voltage),
        }
    }
}

/// Reads the raw/scale channel pair for one sensor
#[derive(Debug, Clone)]
pub struct Sampler {
    raw_path: PathBuf,
    scale_path: PathBuf,
}

impl Sampler {
    /// Create a sampler reading the given attribute paths
    pub fn new(raw_path: PathBuf, scale_path: PathBuf) -> Self {
        Self {
            raw_path,
            scale_path,
        }
    }

    /// Create a sampler for a device's standard voltage channel attributes
    pub fn for_device(device: &str, channel: u32) -> Self {
        let (raw_path, scale_path) = iio::channel_paths(device, channel);
        Self::new(raw_path, scale_path)
    }

    /// Acquire one sample, reading both channels
    pub fn acquire(&self) -> Result<RawSample, ReadError> {
        let raw = iio::read_integer(&self.raw_path)?;
        let scale = iio::read_real(&self.scale_path)?;
        Ok(RawSample { raw, scale })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_voltage_is_raw_times_scale() {
        let sample = RawSample {
            raw: 4096,
            scale: 0.0008056640625,
        };
        assert_eq!(sample.voltage(), 3.3);
    }

    #[test]
    fn test_compute_applies_calibration() {
        let sample = RawSample {
            raw: 1000,
            scale: 0.001,
        };
        let reading = PressureReading::compute(sample, Calibration::new(2.0, 1.0));
        assert_eq!(reading.raw, 1000);
        assert_eq!(reading.voltage, 1.0);
        assert_eq!(reading.pressure, 3.0);
    }

    #[test]
    fn test_acquire_reads_both_channels() {
        let dir = TempDir::new().unwrap();
        let raw_path = dir.path().join("in_voltage0_raw");
        let scale_path = dir.path().join("in_voltage0_scale");
        fs::write(&raw_path, "512\n").unwrap();
        fs::write(&scale_path, "0.5\n").unwrap();

        let sampler = Sampler::new(raw_path, scale_path);
        let sample = sampler.acquire().unwrap();
        assert_eq!(sample, RawSample {
            raw: 512,
            scale: 0.5
        });
    }

    #[test]
    fn test_acquire_fails_if_either_channel_missing() {
        let dir = TempDir::new().unwrap();
        let raw_path = dir.path().join("in_voltage0_raw");
        let scale_path = dir.path().join("in_voltage0_scale");
        fs::write(&raw_path, "512\n").unwrap();

        let sampler = Sampler::new(raw_path, scale_path);
        assert!(sampler.acquire().is_err());
    }
}
