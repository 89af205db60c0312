//! Editor configuration.
//!
//! Stored as JSON. Missing fields fall back to defaults so a config file only
//! needs to mention what it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StoryError};
use crate::time::FrameRate;

/// File name looked up inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Tunables for the timeline, interaction and playback layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Number of timeline tracks (0 = primary video).
    pub num_tracks: usize,
    /// Track lane height in pixels.
    pub track_height: f64,
    /// Vertical gap subtracted from a clip box inside its lane.
    pub clip_margin: f64,
    /// Horizontal zoom.
    pub pixels_per_second: f64,
    /// Ruler tick spacing in seconds.
    pub tick_interval: f64,
    /// Duration given to media without an intrinsic duration.
    pub default_clip_duration: f64,
    /// Resize never shrinks a clip below this.
    pub min_clip_duration: f64,
    /// Pointer distance from a clip edge that starts a resize.
    pub edge_tolerance_px: f64,
    /// Pointer travel below which a press/release counts as a click.
    pub click_slop_px: f64,
    /// Scrub positions are snapped to this rate.
    pub frame_rate: FrameRate,
    /// Wrap to the start instead of stopping at the end.
    pub loop_playback: bool,
    /// Skip back/forward step of the transport buttons.
    pub skip_seconds: f64,
    /// Seconds a transient notice stays visible.
    pub notice_ttl_seconds: f64,
    pub generation: GenerationConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            num_tracks: 3,
            track_height: 80.0,
            clip_margin: 4.0,
            pixels_per_second: 50.0,
            tick_interval: 1.0,
            default_clip_duration: 5.0,
            min_clip_duration: 0.1,
            edge_tolerance_px: 6.0,
            click_slop_px: 3.0,
            frame_rate: FrameRate::FPS_30,
            loop_playback: false,
            skip_seconds: 5.0,
            notice_ttl_seconds: 6.0,
            generation: GenerationConfig::default(),
        }
    }
}

/// Image generation service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of the synchronous inference endpoint.
    pub endpoint: String,
    /// Application id appended to the endpoint.
    pub application: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub image_width: u32,
    pub image_height: u32,
    pub num_images: u32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://fal.run".into(),
            application: "fal-ai/realistic-vision".into(),
            api_key_env: "FAL_KEY".into(),
            image_width: 1080,
            image_height: 608,
            num_images: 8,
            timeout_seconds: 120,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json(data: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(data)
            .map_err(|e| StoryError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoryError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json(&data)?;
        info!(path = %path.display(), "Loaded editor config");
        Ok(config)
    }

    /// Load `explicit` if given, else the platform config file if it exists,
    /// else defaults. An explicit path that does not exist is an error.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/storyreel/config.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("storyreel").join(CONFIG_FILE_NAME))
    }

    /// Reject values the timeline math cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.num_tracks == 0 {
            return Err(StoryError::Config("num_tracks must be at least 1".into()));
        }
        let positive = [
            ("track_height", self.track_height),
            ("pixels_per_second", self.pixels_per_second),
            ("tick_interval", self.tick_interval),
            ("default_clip_duration", self.default_clip_duration),
            ("min_clip_duration", self.min_clip_duration),
            ("skip_seconds", self.skip_seconds),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(StoryError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.clip_margin < 0.0 || self.clip_margin >= self.track_height {
            return Err(StoryError::Config(format!(
                "clip_margin must be in [0, track_height), got {}",
                self.clip_margin
            )));
        }
        if self.min_clip_duration > self.default_clip_duration {
            return Err(StoryError::Config(
                "min_clip_duration cannot exceed default_clip_duration".into(),
            ));
        }
        if self.frame_rate.numerator == 0 || self.frame_rate.denominator == 0 {
            return Err(StoryError::Config("frame_rate must be non-zero".into()));
        }
        Ok(())
    }
}
