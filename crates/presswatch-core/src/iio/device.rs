//! IIO device discovery
//!
//! Scans the IIO sysfs tree for ADC devices so the binaries can report
//! what hardware is present before sampling starts.

use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the IIO device tree
pub const SYSFS_ROOT: &str = "/sys/bus/iio/devices";

/// Information about a discovered IIO device
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Device identifier (e.g., "iio:device0")
    pub id: String,

    /// Full path to the device directory
    pub path: PathBuf,

    /// Contents of the device's `name` attribute, if readable
    pub name: Option<String>,
}

/// Helper used to sort device identifiers numerically by their suffix,
/// so "iio:device10" sorts after "iio:device2"
fn device_sort_key(id: &str) -> (usize, String) {
    let num = id
        .strip_prefix("iio:device")
        .and_then(|rest| rest.parse::<usize>().ok())
        .unwrap_or(usize::MAX);
    (num, id.to_string())
}

/// List the IIO devices present in the default sysfs tree
///
/// A missing tree yields an empty list, not an error; on a board without
/// IIO hardware there is simply nothing to report.
pub fn list_devices() -> Vec<DeviceInfo> {
    list_devices_at(Path::new(SYSFS_ROOT))
}

/// List the IIO devices under a specific sysfs root, in deterministic order
pub fn list_devices_at(root: &Path) -> Vec<DeviceInfo> {
    let mut devices = Vec::new();

    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            if let Some(id) = entry.file_name().to_str() {
                if id.starts_with("iio:device") {
                    let path = entry.path();
                    let name = fs::read_to_string(path.join("name"))
                        .ok()
                        .map(|s| s.trim().to_string());
                    devices.push(DeviceInfo {
                        id: id.to_string(),
                        path,
                        name,
                    });
                }
            }
        }
    }

    devices.sort_by_key(|d| device_sort_key(&d.id));
    devices
}

/// Build the standard raw/scale attribute paths for a voltage channel
/// (`in_voltage<N>_raw` and `in_voltage<N>_scale`)
pub fn channel_paths(device: &str, channel: u32) -> (PathBuf, PathBuf) {
    let base = Path::new(SYSFS_ROOT).join(device);
    (
        base.join(format!("in_voltage{}_raw", channel)),
        base.join(format!("in_voltage{}_scale", channel)),
    )
}
