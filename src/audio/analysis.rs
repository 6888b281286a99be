// Level and silence analysis over a whole buffer.

use super::SampleBuffer;

/// Floor reported for silence.
pub const SILENCE_DB: f32 = -96.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceRegion {
    pub start: f64,
    pub end: f64,
}

/// Convert linear level to dBFS.
pub fn to_db(level: f32) -> f32 {
    if level <= 0.0 {
        SILENCE_DB
    } else {
        20.0 * level.log10()
    }
}

/// Peak of |sample| across all channels for each of `segments` equal
/// slices. Samples past `segments * floor(len / segments)` are ignored.
pub fn calculate_levels(buffer: &SampleBuffer, segments: usize) -> Vec<f32> {
    if segments == 0 {
        return Vec::new();
    }
    let per_segment = buffer.len() / segments;

    (0..segments)
        .map(|segment| {
            let start = segment * per_segment;
            let end = (start + per_segment).min(buffer.len());
            buffer
                .channels()
                .iter()
                .flat_map(|channel| channel[start..end].iter())
                .map(|s| s.abs())
                .fold(0.0f32, f32::max)
        })
        .collect()
}

/// Regions where every channel stays at or below `threshold` for at least
/// `min_seconds`.
pub fn detect_silence(
    buffer: &SampleBuffer,
    threshold: f32,
    min_seconds: f64,
) -> Vec<SilenceRegion> {
    let rate = buffer.sample_rate() as f64;
    let min_samples = min_seconds * rate;
    let mut regions = Vec::new();
    let mut silence_start: Option<usize> = None;
    let mut silence_count = 0usize;

    for i in 0..buffer.len() {
        let is_silent = buffer
            .channels()
            .iter()
            .all(|channel| channel[i].abs() <= threshold);

        if is_silent {
            silence_start.get_or_insert(i);
            silence_count += 1;
        } else {
            if let Some(start) = silence_start
                && silence_count as f64 >= min_samples
            {
                regions.push(SilenceRegion {
                    start: start as f64 / rate,
                    end: (i - 1) as f64 / rate,
                });
            }
            silence_start = None;
            silence_count = 0;
        }
    }

    if let Some(start) = silence_start
        && silence_count as f64 >= min_samples
    {
        regions.push(SilenceRegion {
            start: start as f64 / rate,
            end: buffer.len() as f64 / rate,
        });
    }

    regions
}
