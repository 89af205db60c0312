//! Timeline geometry: time ⇄ pixel mapping.
//!
//! Everything here is pure. Coordinates are relative to the top-left corner
//! of the track area (no ruler, no headers); the UI adds its own offsets.

use storyreel_core::{format_timecode, EditorConfig, TIME_EPSILON};

use crate::clip::Clip;

/// Zoom bounds in pixels per second.
pub const MIN_PIXELS_PER_SECOND: f64 = 10.0;
pub const MAX_PIXELS_PER_SECOND: f64 = 400.0;

/// Multiplier applied by one zoom step.
pub const ZOOM_STEP: f64 = 1.25;

/// Maps timeline time and tracks to pixel positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    pub pixels_per_second: f64,
    pub track_height: f64,
    pub num_tracks: usize,
    pub clip_margin: f64,
    pub tick_interval: f64,
}

/// Axis-aligned box of a clip in track-area pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClipRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

impl TimelineGeometry {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            pixels_per_second: config
                .pixels_per_second
                .clamp(MIN_PIXELS_PER_SECOND, MAX_PIXELS_PER_SECOND),
            track_height: config.track_height,
            num_tracks: config.num_tracks,
            clip_margin: config.clip_margin,
            tick_interval: config.tick_interval,
        }
    }

    #[inline]
    pub fn time_to_x(&self, time: f64) -> f64 {
        time * self.pixels_per_second
    }

    /// Pixel to time, clamped to `[0, duration]`.
    pub fn x_to_time(&self, x: f64, duration: f64) -> f64 {
        self.x_to_time_unclamped(x).min(duration.max(0.0))
    }

    /// Pixel to time, clamped only at 0. Drag and resize use this so clips
    /// can push past the current end of the timeline.
    pub fn x_to_time_unclamped(&self, x: f64) -> f64 {
        (x / self.pixels_per_second).max(0.0)
    }

    #[inline]
    pub fn track_to_y(&self, track: usize) -> f64 {
        track as f64 * self.track_height
    }

    /// Track lane under `y`, clamped to the valid range.
    pub fn y_to_track(&self, y: f64) -> usize {
        let last = self.num_tracks.saturating_sub(1);
        if y.is_nan() || y <= 0.0 {
            return 0;
        }
        ((y / self.track_height).floor() as usize).min(last)
    }

    /// Box of a clip inside its lane.
    pub fn clip_rect(&self, clip: &Clip) -> ClipRect {
        ClipRect {
            left: self.time_to_x(clip.start()),
            top: self.track_to_y(clip.track()),
            width: self.time_to_x(clip.duration()),
            height: self.track_height - self.clip_margin,
        }
    }

    pub fn total_height(&self) -> f64 {
        self.track_to_y(self.num_tracks)
    }

    pub fn content_width(&self, duration: f64) -> f64 {
        self.time_to_x(duration.max(0.0))
    }

    /// Ruler ticks from 0 to `duration` inclusive.
    pub fn ticks(&self, duration: f64) -> TickMarks {
        TickMarks {
            interval: self.tick_interval,
            duration: duration.max(0.0),
            index: 0,
        }
    }

    // ── Zoom ────────────────────────────────────────────────────

    pub fn set_pixels_per_second(&mut self, pps: f64) {
        if pps.is_finite() {
            self.pixels_per_second = pps.clamp(MIN_PIXELS_PER_SECOND, MAX_PIXELS_PER_SECOND);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_pixels_per_second(self.pixels_per_second * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_pixels_per_second(self.pixels_per_second / ZOOM_STEP);
    }
}

impl Default for TimelineGeometry {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

/// One ruler tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub time: f64,
    pub label: String,
}

/// Lazy ruler ticks. Clone it to restart.
#[derive(Debug, Clone)]
pub struct TickMarks {
    interval: f64,
    duration: f64,
    index: u64,
}

impl Iterator for TickMarks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if !(self.interval.is_finite() && self.interval > 0.0) {
            return None;
        }
        let time = self.index as f64 * self.interval;
        if time > self.duration + TIME_EPSILON {
            return None;
        }
        self.index += 1;
        Some(Tick {
            time,
            label: format_timecode(time),
        })
    }
}
