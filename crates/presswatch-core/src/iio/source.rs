//! Numeric sysfs attribute reading
//!
//! IIO exposes each channel attribute as a small file whose entire content
//! is one number followed by a newline. Reads are one-shot: no retry, no
//! caching.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::ReadError;

/// Read a channel attribute and parse it as an integer raw count
pub fn read_integer(path: &Path) -> Result<i64, ReadError> {
    read_parsed(path)
}

/// Read a channel attribute and parse it as a real scale factor
pub fn read_real(path: &Path) -> Result<f64, ReadError> {
    read_parsed(path)
}

fn read_parsed<T: FromStr>(path: &Path) -> Result<T, ReadError> {
    let text = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let trimmed = text.trim();
    trimmed.parse().map_err(|_| ReadError::Malformed {
        path: path.to_path_buf(),
        value: trimmed.to_string(),
    })
}
