//! Wall-clock animation phase.

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

/// Phase in `[0, 1)` for `elapsed` seconds into a repeating cycle of `cycle` seconds.
pub fn phase_at(elapsed: f64, cycle: f64) -> f32 {
    let phase = (elapsed.rem_euclid(cycle) / cycle) as f32;
    // rounding to f32 can land exactly on 1.0 just before the cycle wraps
    if phase >= 1.0 { 0.0 } else { phase }
}

/// Rotation angle for a phase: one full turn per cycle.
pub fn rotation_angle(phase: f32) -> f32 {
    TAU * phase
}

/// Drives the sphere's rotation from elapsed real time.
#[derive(Clone, Copy, Debug)]
pub struct AnimationClock {
    epoch: Instant,
    cycle: f64,
}

impl AnimationClock {
    /// Starts a clock at zero with the given cycle length in seconds.
    pub fn new(cycle: f64) -> Self {
        Self {
            epoch: Instant::now(),
            cycle,
        }
    }

    pub fn cycle(&self) -> f64 {
        self.cycle
    }

    pub fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Current phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        phase_at(self.elapsed().as_secs_f64(), self.cycle)
    }
}
