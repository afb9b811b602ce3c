//! IIO sysfs access
//!
//! Reads numeric channel attributes exposed by the Linux Industrial I/O
//! subsystem and discovers the devices that provide them.

mod device;
mod error;
mod source;

pub use device::{channel_paths, list_devices, list_devices_at, DeviceInfo, SYSFS_ROOT};
pub use error::ReadError;
pub use source::{read_integer, read_real};

/// Default device sampled when no configuration overrides it
pub const DEFAULT_DEVICE: &str = "iio:device0";

/// Default voltage channel index
pub const DEFAULT_CHANNEL: u32 = 0;
