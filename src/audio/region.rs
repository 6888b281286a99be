//! Region edits: copy, cut, paste and trim.
//!
//! Each function reads the source buffer and returns freshly built output;
//! the caller swaps it in, so the source is never left half-modified.
//! Time-to-offset conversion is `floor(seconds * rate)` clamped to the
//! buffer, which also re-validates selections made against an older,
//! longer buffer.

use super::{SampleBuffer, Selection};
use crate::error::{EditorError, Result};

/// Samples `[start, end)` of every channel.
pub fn copy(source: &SampleBuffer, selection: &Selection) -> SampleBuffer {
    let (start, end) = selection.offsets(source);
    source.slice(start, end)
}

/// Returns `(remaining, removed)`: the source with `[start, end)` taken
/// out, and the removed samples.
pub fn cut(source: &SampleBuffer, selection: &Selection) -> (SampleBuffer, SampleBuffer) {
    let (start, end) = selection.offsets(source);
    let removed = source.slice(start, end);

    let remaining_len = source.len() - (end - start);
    let channels = source
        .channels()
        .iter()
        .map(|channel| {
            let mut out = Vec::with_capacity(remaining_len);
            out.extend_from_slice(&channel[..start]);
            out.extend_from_slice(&channel[end..]);
            out
        })
        .collect();

    (
        SampleBuffer::from_channels_unchecked(channels, source.sample_rate()),
        removed,
    )
}

/// Insert `clip` at `at_seconds` (offset computed against `source`'s rate).
/// Sample rate and channel count must match; no resampling or remapping
/// is done.
pub fn paste(source: &SampleBuffer, clip: &SampleBuffer, at_seconds: f64) -> Result<SampleBuffer> {
    if clip.sample_rate() != source.sample_rate() {
        return Err(EditorError::SampleRateMismatch {
            clipboard: clip.sample_rate(),
            live: source.sample_rate(),
        });
    }
    if clip.num_channels() != source.num_channels() {
        return Err(EditorError::ChannelMismatch {
            clipboard: clip.num_channels(),
            live: source.num_channels(),
        });
    }

    let position = source.time_to_offset(at_seconds);
    let new_len = source.len() + clip.len();
    let channels = source
        .channels()
        .iter()
        .zip(clip.channels())
        .map(|(channel, inserted)| {
            let mut out = Vec::with_capacity(new_len);
            out.extend_from_slice(&channel[..position]);
            out.extend_from_slice(inserted);
            out.extend_from_slice(&channel[position..]);
            out
        })
        .collect();

    Ok(SampleBuffer::from_channels_unchecked(channels, source.sample_rate()))
}

/// Keep only `[start, end)`.
pub fn trim(source: &SampleBuffer, selection: &Selection) -> SampleBuffer {
    copy(source, selection)
}
