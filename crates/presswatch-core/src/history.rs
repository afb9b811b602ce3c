//! Rolling sample history
//!
//! Keeps the most recent readings for the chart. The buffer is bounded:
//! pushing past capacity evicts the oldest entry. Presentation-only;
//! nothing in the sampling loop depends on it.

use std::collections::VecDeque;

use crate::sampler::PressureReading;

/// Default number of readings retained for the chart
pub const DEFAULT_CAPACITY: usize = 200;

/// Bounded FIFO of recent pressure readings
#[derive(Debug, Clone)]
pub struct SampleHistory {
    buffer: VecDeque<PressureReading>,
    capacity: usize,
}

impl SampleHistory {
    /// Create a history retaining up to `capacity` readings
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest if at capacity
    pub fn push(&mut self, reading: PressureReading) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(reading);
    }

    /// Number of retained readings
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if no readings have been retained
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recent reading, if any
    pub fn latest(&self) -> Option<&PressureReading> {
        self.buffer.back()
    }

    /// Iterate over retained readings, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &PressureReading> {
        self.buffer.iter()
    }

    /// Pressure values in arrival order, for chart rendering
    pub fn pressures(&self) -> Vec<f64> {
        self.buffer.iter().map(|r| r.pressure).collect()
    }

    /// Discard all retained readings
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::sampler::RawSample;

    fn reading(raw: i64) -> PressureReading {
        PressureReading::compute(
            RawSample { raw, scale: 1.0 },
            Calibration::default(),
        )
    }

    #[test]
    fn test_history_basic() {
        let mut history = SampleHistory::new(10);
        assert!(history.is_empty());

        history.push(reading(1));
        history.push(reading(2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().raw, 2);
    }

    #[test]
    fn test_eviction_keeps_most_recent_in_order() {
        let mut history = SampleHistory::new(200);
        for i in 0..205 {
            history.push(reading(i));
        }

        assert_eq!(history.len(), 200);
        let raws: Vec<i64> = history.iter().map(|r| r.raw).collect();
        assert_eq!(raws.first(), Some(&5));
        assert_eq!(raws.last(), Some(&204));
        // arrival order throughout
        assert!(raws.windows(2).all(|w| w[0] + 1 == w[1]));
    }

    #[test]
    fn test_pressures_extraction() {
        let mut history = SampleHistory::new(5);
        for i in [10, 20, 30] {
            history.push(reading(i));
        }
        assert_eq!(history.pressures(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_clear() {
        let mut history = SampleHistory::default();
        assert_eq!(history.capacity(), DEFAULT_CAPACITY);
        history.push(reading(1));
        history.clear();
        assert!(history.is_empty());
    }
}
