// Laser sweep timing. The phase is a plain value handed to the renderer each frame;
// `LaserTicker` is the scheduler that moves it forward.

use std::time::Duration;

/// Position of the laser within one sweep, always in [0, 1).
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Phase(f32);

impl Phase {
    pub const ZERO: Phase = Phase(0.0);

    /// Wrap any value into [0, 1). Non-finite input maps to 0.
    pub fn new(v: f32) -> Self {
        if !v.is_finite() {
            return Self::ZERO;
        }
        let w = v.rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negatives
        if w >= 1.0 { Self::ZERO } else { Phase(w) }
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

/// Advances a `Phase` linearly, restarting at 0 after each `period`.
#[derive(Clone, Debug)]
pub struct LaserTicker {
    period: Duration,
    phase: Phase,
}

impl LaserTicker {
    pub fn new(period: Duration) -> Self {
        Self { period, phase: Phase::ZERO }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Move forward by `dt` of wall time and return the new phase.
    /// A zero period holds the laser at the top.
    pub fn advance(&mut self, dt: Duration) -> Phase {
        if self.period.is_zero() {
            return self.phase;
        }
        let step = dt.as_secs_f64() / self.period.as_secs_f64();
        self.phase = Phase::new((self.phase.0 as f64 + step).fract() as f32);
        self.phase
    }
}
