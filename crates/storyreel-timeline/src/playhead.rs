//! The playhead: current global time.

use serde::{Deserialize, Serialize};

/// Current time on the timeline, kept in `[0, duration]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Playhead {
    time: f64,
}

impl Playhead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Move to `time`, clamped to `[0, duration]`. Out-of-range and NaN
    /// values are clamped silently. Returns the time actually applied.
    pub fn set(&mut self, time: f64, duration: f64) -> f64 {
        let duration = duration.max(0.0);
        self.time = if time.is_nan() {
            0.0
        } else {
            time.clamp(0.0, duration)
        };
        self.time
    }

    /// Pull the playhead back inside a (possibly shrunk) duration.
    pub fn clamp_to(&mut self, duration: f64) -> f64 {
        self.set(self.time, duration)
    }
}
