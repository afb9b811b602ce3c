//! Demo mode - simulated ADC data for testing without hardware
//!
//! Generates plausible 12-bit raw counts for a pressure channel: a steady
//! baseline with wobble, plus occasional pressure spikes. Lets the daemon
//! and the TUI run on machines with no IIO device.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::sampler::RawSample;

/// LSB of a 12-bit ADC referenced to 3.3 V, the scale a real channel reports
pub const DEMO_SCALE: f64 = 0.0008056640625;

const FULL_SCALE: f64 = 4095.0;
const BASELINE_COUNT: f64 = 1400.0;

const RAMP_UP_MS: u64 = 1500;
const HOLD_MS: u64 = 2000;
const RAMP_DOWN_MS: u64 = 3000;

/// Simulated pressure channel with occasional spike episodes
pub struct DemoSimulator {
    /// Time of next spike (ms from start)
    next_spike_at_ms: u64,
    /// Current spike state
    spike_state: SpikeState,
    /// Peak count for the current spike
    spike_target: f64,
    /// Random number generator
    rng: StdRng,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SpikeState {
    /// Holding at baseline
    Idle,
    /// Pressure rising toward the spike peak
    RampUp { start_ms: u64 },
    /// At peak, holding
    Hold { start_ms: u64 },
    /// Pressure falling back to baseline
    RampDown { start_ms: u64 },
}

impl Default for DemoSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoSimulator {
    /// Create a new simulator
    pub fn new() -> Self {
        let mut rng = StdRng::from_entropy();
        let first_spike = rng.gen_range(10_000..20_000); // 10-20 seconds

        Self {
            next_spike_at_ms: first_spike,
            spike_state: SpikeState::Idle,
            spike_target: 0.0,
            rng,
        }
    }

    /// Generate the sample for `elapsed_ms` milliseconds into the run
    pub fn sample(&mut self, elapsed_ms: u64) -> RawSample {
        self.update_spike_state(elapsed_ms);

        let target = self.target_count(elapsed_ms);

        // baseline wobble plus sensor noise
        let t = elapsed_ms as f64 / 1000.0;
        let wobble = 30.0 * (t * 0.8).sin() + 12.0 * (t * 2.7).sin();
        let noise = self.rng.gen_range(-8.0..8.0);

        let count = (target + wobble + noise).clamp(0.0, FULL_SCALE);

        RawSample {
            raw: count.round() as i64,
            scale: DEMO_SCALE,
        }
    }

    /// Update the spike state machine
    fn update_spike_state(&mut self, elapsed_ms: u64) {
        match self.spike_state {
            SpikeState::Idle => {
                if elapsed_ms >= self.next_spike_at_ms {
                    self.spike_target = self.rng.gen_range(3000.0..4000.0);
                    self.spike_state = SpikeState::RampUp {
                        start_ms: elapsed_ms,
                    };
                }
            }
            SpikeState::RampUp { start_ms } => {
                if elapsed_ms >= start_ms + RAMP_UP_MS {
                    self.spike_state = SpikeState::Hold {
                        start_ms: elapsed_ms,
                    };
                }
            }
            SpikeState::Hold { start_ms } => {
                if elapsed_ms >= start_ms + HOLD_MS {
                    self.spike_state = SpikeState::RampDown {
                        start_ms: elapsed_ms,
                    };
                }
            }
            SpikeState::RampDown { start_ms } => {
                if elapsed_ms >= start_ms + RAMP_DOWN_MS {
                    self.spike_state = SpikeState::Idle;
                    let next_interval = self.rng.gen_range(10_000..20_000);
                    self.next_spike_at_ms = elapsed_ms + next_interval;
                }
            }
        }
    }

    /// Target count for the current spike state
    fn target_count(&self, elapsed_ms: u64) -> f64 {
        match self.spike_state {
            SpikeState::Idle => BASELINE_COUNT,
            SpikeState::RampUp { start_ms } => {
                let progress = ((elapsed_ms - start_ms) as f64 / RAMP_UP_MS as f64).min(1.0);
                BASELINE_COUNT + (self.spike_target - BASELINE_COUNT) * progress
            }
            SpikeState::Hold { .. } => self.spike_target,
            SpikeState::RampDown { start_ms } => {
                let progress = ((elapsed_ms - start_ms) as f64 / RAMP_DOWN_MS as f64).min(1.0);
                self.spike_target + (BASELINE_COUNT - self.spike_target) * progress
            }
        }
    }
}
