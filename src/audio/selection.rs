use serde::{Deserialize, Serialize};

use super::SampleBuffer;
use crate::error::{EditorError, Result};

/// A time range in seconds. `start <= end` always holds; a zero-length
/// selection is representable and makes region edits no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub start: f64,
    pub end: f64,
}

impl Selection {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || start > end {
            return Err(EditorError::InvalidSelection { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a non-empty selection inside `[0, duration]`. Reversed bounds
    /// are swapped, out-of-range bounds are clamped.
    pub fn within(start: f64, end: f64, duration: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(EditorError::InvalidSelection { start, end });
        }
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        let lo = lo.clamp(0.0, duration);
        let hi = hi.clamp(0.0, duration);
        if lo >= hi {
            return Err(EditorError::InvalidSelection { start, end });
        }
        Ok(Self { start: lo, end: hi })
    }

    /// Re-check against a (possibly shrunk) duration.
    pub fn clamp_to(&self, duration: f64) -> Self {
        let end = self.end.min(duration).max(0.0);
        Self {
            start: self.start.min(end),
            end,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Sample offsets `[floor(start * rate), floor(end * rate))` in `buffer`.
    /// A bound at or past the buffer's duration maps to its length, so
    /// `len / rate * rate` rounding down cannot drop the last sample.
    pub fn offsets(&self, buffer: &SampleBuffer) -> (usize, usize) {
        let duration = buffer.duration_seconds();
        let to_offset = |seconds: f64| {
            if seconds >= duration {
                buffer.len()
            } else {
                buffer.time_to_offset(seconds)
            }
        };
        let start = to_offset(self.start);
        let end = to_offset(self.end).max(start);
        (start, end)
    }
}

/// Audio captured by the last cut or copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardEntry {
    pub buffer: SampleBuffer,
    /// Source range, kept for reference only.
    pub start: f64,
    pub end: f64,
}

/// Single-slot clipboard. Storing overwrites; reading never consumes.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Option<ClipboardEntry>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, buffer: SampleBuffer, selection: &Selection) {
        self.slot = Some(ClipboardEntry {
            buffer,
            start: selection.start,
            end: selection.end,
        });
    }

    pub fn get(&self) -> Option<&ClipboardEntry> {
        self.slot.as_ref()
    }

    /// Like [`get`](Self::get), but an empty slot is an error.
    pub fn entry(&self) -> Result<&ClipboardEntry> {
        self.slot.as_ref().ok_or(EditorError::EmptyClipboard)
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
