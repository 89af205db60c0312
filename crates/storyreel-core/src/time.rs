//! Time representation for timeline editing
//!
//! Timeline times are seconds as `f64`. Comparisons that decide adjacency or
//! containment go through [`TIME_EPSILON`] so that spans built from pixel
//! arithmetic still butt up against each other exactly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when comparing timeline times.
pub const TIME_EPSILON: f64 = 1e-9;

/// A half-open time span `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Start time (inclusive)
    pub start: f64,
    /// End time (exclusive)
    pub end: f64,
}

impl TimeSpan {
    /// Create a span from start and end times. No validation is done here;
    /// see [`TimeSpan::is_valid`].
    #[inline]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Create a span from a start time and a duration.
    #[inline]
    pub fn from_start_duration(start: f64, duration: f64) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Length of the span.
    #[inline]
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Finite, non-negative start and `end > start`.
    pub fn is_valid(self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.end > self.start
    }

    /// Check if a time is within this span.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Check if two spans overlap. Spans that only touch do not overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end - TIME_EPSILON && other.start < self.end - TIME_EPSILON
    }

    /// The same span shifted to a new start.
    pub fn with_start(self, start: f64) -> Self {
        Self::from_start_duration(start, self.duration())
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}s, {:.3}s)", self.start, self.end)
    }
}

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of a single frame in seconds.
    #[inline]
    pub fn frame_duration(self) -> f64 {
        self.denominator as f64 / self.numerator as f64
    }

    /// Frame index containing `seconds` (floored).
    pub fn to_frames(self, seconds: f64) -> i64 {
        (seconds * self.to_fps_f64() + TIME_EPSILON).floor() as i64
    }

    /// Start time of the given frame.
    pub fn from_frames(self, frames: i64) -> f64 {
        frames as f64 * self.denominator as f64 / self.numerator as f64
    }

    /// Round a time to the nearest frame boundary.
    pub fn snap(self, seconds: f64) -> f64 {
        self.from_frames((seconds * self.to_fps_f64()).round() as i64)
    }

    /// Common frame rates
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// Format a time as `mm:ss` (ruler labels).
pub fn format_timecode(seconds: f64) -> String {
    let total = (seconds.max(0.0) + TIME_EPSILON).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Format a time as `mm:ss.mmm` (scrub readout).
pub fn format_timecode_precise(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    format!(
        "{:02}:{:02}.{:03}",
        total_ms / 60_000,
        (total_ms / 1000) % 60,
        total_ms % 1000
    )
}
