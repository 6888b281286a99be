// Destructive effects applied to the live buffer.
// Fades, gain, normalize and reverse run in place; EQ and pass filters are
// planned as a filter chain for the offline renderer.

use wide::f32x4;

use super::SampleBuffer;
use super::filter::FilterDescriptor;
use crate::config::EqBands;

/// Peak at or above this counts as already normalized.
pub const NORMALIZED_PEAK: f32 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    FadeIn { seconds: f64 },
    FadeOut { seconds: f64 },
    Amplify { gain: f32 },
    Normalize,
    Reverse,
    Equalize {
        bass_db: f64,
        mid_db: f64,
        treble_db: f64,
    },
    LowPass { cutoff_hz: f64 },
    HighPass { cutoff_hz: f64 },
}

/// How an effect gets applied.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectPlan {
    /// Synchronous, mutates the live buffer.
    InPlace,
    /// Rendered offline through this chain; the result replaces the buffer.
    Offline(Vec<FilterDescriptor>),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::FadeIn { .. } => "fade_in",
            Effect::FadeOut { .. } => "fade_out",
            Effect::Amplify { .. } => "amplify",
            Effect::Normalize => "normalize",
            Effect::Reverse => "reverse",
            Effect::Equalize { .. } => "equalize",
            Effect::LowPass { .. } => "low_pass",
            Effect::HighPass { .. } => "high_pass",
        }
    }

    pub fn plan(&self, bands: &EqBands) -> EffectPlan {
        match *self {
            Effect::Equalize {
                bass_db,
                mid_db,
                treble_db,
            } => EffectPlan::Offline(equalizer_chain(bands, bass_db, mid_db, treble_db)),
            Effect::LowPass { cutoff_hz } => {
                EffectPlan::Offline(vec![FilterDescriptor::low_pass(cutoff_hz, bands.pass_q)])
            }
            Effect::HighPass { cutoff_hz } => {
                EffectPlan::Offline(vec![FilterDescriptor::high_pass(cutoff_hz, bands.pass_q)])
            }
            _ => EffectPlan::InPlace,
        }
    }
}

/// Bass low-shelf, mid peak, treble high-shelf, in that order.
pub fn equalizer_chain(
    bands: &EqBands,
    bass_db: f64,
    mid_db: f64,
    treble_db: f64,
) -> Vec<FilterDescriptor> {
    vec![
        FilterDescriptor::low_shelf(bands.bass_hz, bass_db),
        FilterDescriptor::peaking(bands.mid_hz, bands.mid_q, mid_db),
        FilterDescriptor::high_shelf(bands.treble_hz, treble_db),
    ]
}

/// Apply an in-place effect. Returns `false` for effects that need the
/// offline renderer (nothing is touched then).
pub fn apply_in_place(buffer: &mut SampleBuffer, effect: &Effect) -> bool {
    match *effect {
        Effect::FadeIn { seconds } => fade_in(buffer, seconds),
        Effect::FadeOut { seconds } => fade_out(buffer, seconds),
        Effect::Amplify { gain } => amplify(buffer, gain),
        Effect::Normalize => {
            normalize(buffer);
        }
        Effect::Reverse => reverse(buffer),
        Effect::Equalize { .. } | Effect::LowPass { .. } | Effect::HighPass { .. } => {
            return false;
        }
    }
    true
}

fn ramp_len(buffer: &SampleBuffer, seconds: f64) -> usize {
    (seconds.max(0.0) * buffer.sample_rate() as f64).floor() as usize
}

/// Linear ramp 0 -> 1 over the first `floor(seconds * rate)` samples.
pub fn fade_in(buffer: &mut SampleBuffer, seconds: f64) {
    let n = ramp_len(buffer, seconds);
    for channel in buffer.channels_mut() {
        let count = n.min(channel.len());
        for (i, sample) in channel[..count].iter_mut().enumerate() {
            *sample *= i as f32 / n as f32;
        }
    }
}

/// Mirror image of [`fade_in`]: the last sample gets gain 0 and the gain
/// rises by `1/n` per sample walking back from the tail.
pub fn fade_out(buffer: &mut SampleBuffer, seconds: f64) {
    let n = ramp_len(buffer, seconds);
    for channel in buffer.channels_mut() {
        let len = channel.len();
        for i in 0..n.min(len) {
            channel[len - 1 - i] *= i as f32 / n as f32;
        }
    }
}

/// Multiply by `gain` and hard-clip to `[-1, 1]`.
pub fn amplify(buffer: &mut SampleBuffer, gain: f32) {
    let gain_vec = f32x4::splat(gain);
    let one = f32x4::splat(1.0);
    let neg_one = f32x4::splat(-1.0);

    for channel in buffer.channels_mut() {
        let mut chunks = channel.chunks_exact_mut(4);
        for chunk in &mut chunks {
            let vec = f32x4::new([chunk[0], chunk[1], chunk[2], chunk[3]]);
            let result = (vec * gain_vec).max(neg_one).min(one);
            chunk.copy_from_slice(&result.to_array());
        }
        for sample in chunks.into_remainder() {
            *sample = (*sample * gain).clamp(-1.0, 1.0);
        }
    }
}

/// Scale so the peak becomes 1.0. Silent buffers and buffers already at
/// or above [`NORMALIZED_PEAK`] are left alone. Returns the gain applied.
pub fn normalize(buffer: &mut SampleBuffer) -> f32 {
    let peak = buffer.peak();
    if peak == 0.0 || peak >= NORMALIZED_PEAK {
        return 1.0;
    }

    let gain = 1.0 / peak;
    for channel in buffer.channels_mut() {
        for sample in channel.iter_mut() {
            *sample *= gain;
        }
    }
    gain
}

pub fn reverse(buffer: &mut SampleBuffer) {
    for channel in buffer.channels_mut() {
        channel.reverse();
    }
}
