//! Linear pressure calibration
//!
//! Maps the voltage seen on the ADC channel to a pressure value via
//! `pressure = gain * voltage + offset`. The coefficients are loaded from
//! a JSON file at startup and may be replaced at runtime by an operator.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Linear calibration coefficients
///
/// The on-disk JSON record uses the field names `a` (gain) and `b`
/// (offset), the convention of the deployment's calibration tooling.
/// Missing fields fall back to the identity transform field-by-field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Multiplier applied to the channel voltage
    #[serde(rename = "a", default = "default_gain")]
    pub gain: f64,

    /// Constant added after the gain
    #[serde(rename = "b", default = "default_offset")]
    pub offset: f64,
}

fn default_gain() -> f64 {
    1.0
}

fn default_offset() -> f64 {
    0.0
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            gain: default_gain(),
            offset: default_offset(),
        }
    }
}

impl Calibration {
    /// Create a calibration with explicit coefficients
    pub const fn new(gain: f64, offset: f64) -> Self {
        Self { gain, offset }
    }

    /// Apply the linear transform to a channel voltage
    #[inline]
    pub fn apply(&self, voltage: f64) -> f64 {
        self.gain * voltage + self.offset
    }

    /// Convert a raw ADC count and channel scale directly to pressure
    #[inline]
    pub fn pressure_from_raw(&self, raw: i64, scale: f64) -> f64 {
        self.apply(raw as f64 * scale)
    }

    /// Load calibration from a JSON file
    ///
    /// Fail-open: a missing, unreadable, or malformed file yields the
    /// default identity calibration. A bad calibration file must never
    /// prevent the daemon from starting, so no error is surfaced; the
    /// suppressed cause is logged instead.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no calibration file at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(
                    "calibration file {} unreadable ({}), using defaults",
                    path.display(),
                    e
                );
                return Self::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(calibration) => calibration,
            Err(e) => {
                tracing::warn!(
                    "calibration file {} malformed ({}), using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let calibration = Calibration::default();
        assert_eq!(calibration.gain, 1.0);
        assert_eq!(calibration.offset, 0.0);
        assert_eq!(calibration.apply(3.3), 3.3);
    }

    #[test]
    fn test_apply_is_linear() {
        let calibration = Calibration::new(2.0, 5.0);
        assert_eq!(calibration.apply(1.5), 2.0 * 1.5 + 5.0);
        assert_eq!(calibration.apply(0.0), 5.0);
        assert_eq!(calibration.apply(-1.0), 3.0);
    }

    #[test]
    fn test_pressure_from_raw_matches_explicit_formula() {
        let calibration = Calibration::new(1.7, -0.25);
        let raw = 1234_i64;
        let scale = 0.0008056640625;
        assert_eq!(
            calibration.pressure_from_raw(raw, scale),
            1.7 * (raw as f64 * scale) + -0.25
        );
    }

    #[test]
    fn test_json_field_names() {
        let calibration: Calibration = serde_json::from_str(r#"{"a": 2.5, "b": 0.5}"#).unwrap();
        assert_eq!(calibration, Calibration::new(2.5, 0.5));
    }

    #[test]
    fn test_partial_record_falls_back_per_field() {
        let gain_only: Calibration = serde_json::from_str(r#"{"a": 2.5}"#).unwrap();
        assert_eq!(gain_only, Calibration::new(2.5, 0.0));

        let offset_only: Calibration = serde_json::from_str(r#"{"b": -3.0}"#).unwrap();
        assert_eq!(offset_only, Calibration::new(1.0, -3.0));
    }
}
