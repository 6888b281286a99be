use crate::error::{EditorError, Result};

/// Owned multi-channel float PCM.
///
/// Every channel has the same length; constructors reject anything else and
/// the mutable accessors only hand out fixed-length slices, so the invariant
/// holds for the lifetime of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(EditorError::InvalidBuffer("buffer needs at least one channel".into()));
        }
        if sample_rate == 0 {
            return Err(EditorError::InvalidBuffer("sample rate must be positive".into()));
        }
        let length = channels[0].len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, channel)| channel.len() != length)
        {
            return Err(EditorError::InvalidBuffer(format!(
                "channel {} has {} samples, expected {}",
                index,
                channel.len(),
                length
            )));
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// All-zero buffer of the given shape.
    pub fn silent(num_channels: usize, length: usize, sample_rate: u32) -> Result<Self> {
        Self::new(vec![vec![0.0; length]; num_channels], sample_rate)
    }

    /// Split frame-interleaved samples into channels. A trailing partial
    /// frame is dropped.
    pub fn from_interleaved(
        samples: &[f32],
        num_channels: usize,
        sample_rate: u32,
    ) -> Result<Self> {
        if num_channels == 0 {
            return Err(EditorError::InvalidBuffer("buffer needs at least one channel".into()));
        }
        let frames = samples.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in samples.chunks_exact(num_channels) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(channels, sample_rate)
    }

    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * self.num_channels());
        for i in 0..self.len() {
            for channel in &self.channels {
                out.push(channel[i]);
            }
        }
        out
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length of each channel in samples.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Mutable access to each channel's samples (lengths stay fixed).
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.channels.iter_mut().map(Vec::as_mut_slice)
    }

    /// Seconds to a sample offset: `floor(seconds * rate)`, clamped to
    /// `[0, len]`.
    pub fn time_to_offset(&self, seconds: f64) -> usize {
        let offset = (seconds.max(0.0) * self.sample_rate as f64).floor() as usize;
        offset.min(self.len())
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|channel| channel.iter())
            .map(|&s| s.abs())
            .fold(0.0f32, f32::max)
    }

    /// Copy of samples `[start, end)` from every channel.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.len());
        let start = start.min(end);
        Self {
            channels: self
                .channels
                .iter()
                .map(|channel| channel[start..end].to_vec())
                .collect(),
            sample_rate: self.sample_rate,
        }
    }

    pub(crate) fn from_channels_unchecked(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        debug_assert!(!channels.is_empty());
        debug_assert!(channels.iter().all(|c| c.len() == channels[0].len()));
        Self {
            channels,
            sample_rate,
        }
    }
}
