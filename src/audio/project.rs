//! Project files: a JSON snapshot of the live buffer plus editor state.
//!
//! The audio travels as base64 of the exact WAV bytes the codec produces,
//! so restoring goes back through [`decode_wav`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use super::codec::{decode_wav, encode_wav};
use super::{SampleBuffer, Selection};
use crate::error::{EditorError, Result};

pub const DEFAULT_ZOOM: u8 = 50;

/// On-disk record. Field names match the editor's project JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub selection: Option<Selection>,
    /// Written as an integer; any JSON number is accepted on load.
    #[serde(default)]
    pub zoom: Option<serde_json::Number>,
    #[serde(default)]
    pub current_time: Option<f64>,
}

/// Editor state captured at save time.
#[derive(Debug, Clone, Copy)]
pub struct ProjectSnapshot<'a> {
    pub buffer: &'a SampleBuffer,
    pub selection: Option<Selection>,
    pub zoom: u8,
    pub current_time: f64,
}

/// Everything a project file restores.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub version: String,
    pub timestamp: String,
    pub buffer: SampleBuffer,
    pub selection: Option<Selection>,
    pub zoom: u8,
    pub current_time: f64,
}

pub fn save_project(snapshot: &ProjectSnapshot<'_>, version: &str) -> Result<Vec<u8>> {
    let wav = encode_wav(snapshot.buffer)?;
    let project = Project {
        version: version.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        audio: Some(BASE64.encode(&wav)),
        selection: snapshot.selection,
        zoom: Some(snapshot.zoom.into()),
        current_time: Some(snapshot.current_time),
    };

    let bytes = serde_json::to_vec(&project)?;
    tracing::info!(
        version,
        wav_bytes = wav.len(),
        project_bytes = bytes.len(),
        "Saved project"
    );
    Ok(bytes)
}

pub fn load_project(bytes: &[u8]) -> Result<LoadedProject> {
    let project: Project =
        serde_json::from_slice(bytes).map_err(|e| EditorError::Load(e.to_string()))?;

    let audio = project
        .audio
        .as_deref()
        .filter(|audio| !audio.is_empty())
        .ok_or_else(|| EditorError::Load("project has no audio".into()))?;
    let wav = BASE64
        .decode(audio.trim())
        .map_err(|e| EditorError::Load(format!("audio is not valid base64: {}", e)))?;
    let buffer = decode_wav(&wav).map_err(|e| EditorError::Load(e.to_string()))?;

    let duration = buffer.duration_seconds();
    // A stale or malformed selection is dropped rather than failing the load
    let selection = project
        .selection
        .and_then(|s| Selection::within(s.start, s.end, duration).ok());
    let zoom = project
        .zoom
        .and_then(|z| z.as_f64())
        .filter(|z| z.is_finite())
        .map(|z| z.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(DEFAULT_ZOOM);
    let current_time = project
        .current_time
        .filter(|t| t.is_finite())
        .map(|t| t.clamp(0.0, duration))
        .unwrap_or(0.0);

    tracing::info!(
        version = %project.version,
        channels = buffer.num_channels(),
        sample_rate = buffer.sample_rate(),
        frames = buffer.len(),
        "Loaded project"
    );

    Ok(LoadedProject {
        version: project.version,
        timestamp: project.timestamp,
        buffer,
        selection,
        zoom,
        current_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_buffer() -> SampleBuffer {
        let left: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.01).sin() * 0.5).collect();
        let right: Vec<f32> = left.iter().map(|s| s * -0.25).collect();
        SampleBuffer::new(vec![left, right], 1000).unwrap()
    }

    #[test]
    fn test_save_and_load_project() {
        let buffer = sample_buffer();
        let selection = Selection::new(0.1, 0.4).unwrap();
        let snapshot = ProjectSnapshot {
            buffer: &buffer,
            selection: Some(selection),
            zoom: 72,
            current_time: 0.25,
        };
        let bytes = save_project(&snapshot, "1.0").unwrap();

        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["version"], "1.0");
        assert!(json["audio"].is_string());
        assert_eq!(json["currentTime"], 0.25);
        assert_eq!(json["selection"]["start"], 0.1);
        assert!(json["zoom"].is_u64());
        assert_eq!(json["zoom"], 72);

        let loaded = load_project(&bytes).unwrap();
        assert_eq!(loaded.version, "1.0");
        assert_eq!(loaded.zoom, 72);
        assert_eq!(loaded.current_time, 0.25);
        assert_eq!(loaded.selection, Some(selection));
        assert_eq!(loaded.buffer.num_channels(), 2);
        assert_eq!(loaded.buffer.sample_rate(), 1000);
        assert_eq!(loaded.buffer.len(), 1000);
        for (orig, back) in buffer.channels().iter().zip(loaded.buffer.channels()) {
            for (a, b) in orig.iter().zip(back) {
                assert!((a - b).abs() <= 1.0 / 32767.0 + 1e-6);
            }
        }
    }

    #[test]
    fn test_missing_selection_and_zoom_use_defaults() {
        let buffer = sample_buffer();
        let wav = encode_wav(&buffer).unwrap();
        let json = serde_json::json!({
            "version": "1.0",
            "timestamp": "2024-06-09T12:00:00Z",
            "audio": BASE64.encode(&wav),
            "selection": null
        });
        let loaded = load_project(json.to_string().as_bytes()).unwrap();
        assert!(loaded.selection.is_none());
        assert_eq!(loaded.zoom, DEFAULT_ZOOM);
        assert_eq!(loaded.current_time, 0.0);
    }

    #[test]
    fn test_missing_or_corrupt_audio_is_load_error() {
        let missing = br#"{"version":"1.0","timestamp":"t","zoom":50,"currentTime":0}"#;
        assert!(matches!(load_project(missing), Err(EditorError::Load(_))));

        let not_base64 = br#"{"version":"1.0","timestamp":"t","audio":"@@@@"}"#;
        assert!(matches!(load_project(not_base64), Err(EditorError::Load(_))));

        let not_wav = format!(
            r#"{{"version":"1.0","timestamp":"t","audio":"{}"}}"#,
            BASE64.encode(b"definitely not RIFF data")
        );
        assert!(matches!(load_project(not_wav.as_bytes()), Err(EditorError::Load(_))));

        assert!(matches!(load_project(b"{ not json"), Err(EditorError::Load(_))));
    }

    #[test]
    fn test_out_of_range_hints_are_clamped() {
        let buffer = sample_buffer();
        let wav = encode_wav(&buffer).unwrap();
        let json = serde_json::json!({
            "version": "1.0",
            "timestamp": "t",
            "audio": BASE64.encode(&wav),
            "selection": { "start": 0.5, "end": 9.0 },
            "zoom": 180.4,
            "currentTime": 42.0
        });
        let loaded = load_project(json.to_string().as_bytes()).unwrap();
        assert_eq!(loaded.selection, Selection::new(0.5, 1.0).ok());
        assert_eq!(loaded.zoom, 100);
        assert_eq!(loaded.current_time, 1.0);
    }
}
