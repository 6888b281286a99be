use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EditorError, Result};

/// Corner frequencies and Q values for the three-band equalizer and the
/// pass filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqBands {
    pub bass_hz: f64,
    pub mid_hz: f64,
    pub mid_q: f64,
    pub treble_hz: f64,
    pub pass_q: f64,
}

impl Default for EqBands {
    fn default() -> Self {
        Self {
            bass_hz: 200.0,
            mid_hz: 1000.0,
            mid_q: 1.0,
            treble_hz: 3000.0,
            pass_q: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub default_zoom: u8,
    pub fade_seconds: f64,
    pub eq: EqBands,
    pub silence_threshold: f32,
    pub silence_min_seconds: f64,
    pub level_segments: usize,
    pub project_version: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_zoom: 50,
            fade_seconds: 1.0,
            eq: EqBands::default(),
            silence_threshold: 0.01,
            silence_min_seconds: 0.5,
            level_segments: 100,
            project_version: "1.0".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(text).map_err(|e| EditorError::Config(e.to_string()))?;
        config.default_zoom = config.default_zoom.min(100);
        Ok(config)
    }

    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
