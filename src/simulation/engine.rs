//! Fixed-step tick driver
//!
//! The frame loop feeds elapsed wall time into a `TickClock`; whenever the
//! accumulated time reaches `step` the caller runs one `World::tick(step)`.
//! Time beyond one step is dropped, so a stalled frame never triggers a
//! burst of catch-up ticks.

use crate::simulation::error::SimError;

/// Default simulation step (s)
pub const DEFAULT_TICK: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct TickClock {
    step: f64,        // fixed simulation step
    accumulator: f64, // wall time since the last tick
}

impl Default for TickClock {
    fn default() -> Self {
        Self {
            step: DEFAULT_TICK,
            accumulator: 0.0,
        }
    }
}

impl TickClock {
    /// Fails with [`SimError::InvalidParameter`] unless `step` is positive and finite
    pub fn new(step: f64) -> Result<Self, SimError> {
        if !(step > 0.0) || !step.is_finite() {
            return Err(SimError::InvalidParameter(format!(
                "engine tick must be positive, got {step}"
            )));
        }
        Ok(Self {
            step,
            accumulator: 0.0,
        })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulator
    }

    /// Add `elapsed` seconds; true when a tick is due
    pub fn advance(&mut self, elapsed: f64) -> bool {
        self.accumulator += elapsed;
        if self.accumulator >= self.step {
            self.accumulator = 0.0;
            true
        } else {
            false
        }
    }
}
