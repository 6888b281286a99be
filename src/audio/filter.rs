//! Biquad filter design and cascades.
//!
//! Coefficients follow the Audio EQ Cookbook. Shelves use slope S = 1,
//! peaking and pass filters take a linear Q. Processing is Direct Form II
//! Transposed in f64, with fresh state per channel.

use std::f64::consts::PI;

use super::SampleBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    LowShelf,
    Peaking,
    HighShelf,
    LowPass,
    HighPass,
}

/// One stage of a filter chain handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDescriptor {
    pub kind: FilterKind,
    pub frequency_hz: f64,
    /// Only meaningful for peaking and pass filters.
    pub q: Option<f64>,
    pub gain_db: f64,
}

impl FilterDescriptor {
    const DEFAULT_Q: f64 = 1.0;

    pub fn low_shelf(frequency_hz: f64, gain_db: f64) -> Self {
        Self {
            kind: FilterKind::LowShelf,
            frequency_hz,
            q: None,
            gain_db,
        }
    }

    pub fn peaking(frequency_hz: f64, q: f64, gain_db: f64) -> Self {
        Self {
            kind: FilterKind::Peaking,
            frequency_hz,
            q: Some(q),
            gain_db,
        }
    }

    pub fn high_shelf(frequency_hz: f64, gain_db: f64) -> Self {
        Self {
            kind: FilterKind::HighShelf,
            frequency_hz,
            q: None,
            gain_db,
        }
    }

    pub fn low_pass(frequency_hz: f64, q: f64) -> Self {
        Self {
            kind: FilterKind::LowPass,
            frequency_hz,
            q: Some(q),
            gain_db: 0.0,
        }
    }

    pub fn high_pass(frequency_hz: f64, q: f64) -> Self {
        Self {
            kind: FilterKind::HighPass,
            frequency_hz,
            q: Some(q),
            gain_db: 0.0,
        }
    }
}

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoefficients {
    pub fn design(descriptor: &FilterDescriptor, sample_rate: u32) -> Self {
        let sr = sample_rate as f64;
        // Keep the corner strictly inside (0, Nyquist)
        let freq = descriptor.frequency_hz.clamp(1.0, sr * 0.4999);
        let q = descriptor
            .q
            .filter(|q| *q > 0.0)
            .unwrap_or(FilterDescriptor::DEFAULT_Q);

        let omega = 2.0 * PI * freq / sr;
        let sin_w = omega.sin();
        let cos_w = omega.cos();
        let a = 10.0_f64.powf(descriptor.gain_db / 40.0);

        let (b0, b1, b2, a0, a1, a2) = match descriptor.kind {
            FilterKind::Peaking => {
                let alpha = sin_w / (2.0 * q);
                (
                    1.0 + alpha * a,
                    -2.0 * cos_w,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos_w,
                    1.0 - alpha / a,
                )
            }
            FilterKind::LowShelf => {
                let two_sqrt_a_alpha = sin_w * std::f64::consts::SQRT_2 * a.sqrt();
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w + two_sqrt_a_alpha),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w),
                    a * ((a + 1.0) - (a - 1.0) * cos_w - two_sqrt_a_alpha),
                    (a + 1.0) + (a - 1.0) * cos_w + two_sqrt_a_alpha,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w),
                    (a + 1.0) + (a - 1.0) * cos_w - two_sqrt_a_alpha,
                )
            }
            FilterKind::HighShelf => {
                let two_sqrt_a_alpha = sin_w * std::f64::consts::SQRT_2 * a.sqrt();
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_w + two_sqrt_a_alpha),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w),
                    a * ((a + 1.0) + (a - 1.0) * cos_w - two_sqrt_a_alpha),
                    (a + 1.0) - (a - 1.0) * cos_w + two_sqrt_a_alpha,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_w),
                    (a + 1.0) - (a - 1.0) * cos_w - two_sqrt_a_alpha,
                )
            }
            FilterKind::LowPass => {
                let alpha = sin_w / (2.0 * q);
                (
                    (1.0 - cos_w) / 2.0,
                    1.0 - cos_w,
                    (1.0 - cos_w) / 2.0,
                    1.0 + alpha,
                    -2.0 * cos_w,
                    1.0 - alpha,
                )
            }
            FilterKind::HighPass => {
                let alpha = sin_w / (2.0 * q);
                (
                    (1.0 + cos_w) / 2.0,
                    -(1.0 + cos_w),
                    (1.0 + cos_w) / 2.0,
                    1.0 + alpha,
                    -2.0 * cos_w,
                    1.0 - alpha,
                )
            }
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Magnitude of the response at DC (`z = 1`).
    pub fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }

    /// Magnitude of the response at Nyquist (`z = -1`).
    pub fn nyquist_gain(&self) -> f64 {
        (self.b0 - self.b1 + self.b2) / (1.0 - self.a1 + self.a2)
    }

    fn process(&self, samples: &mut [f32]) {
        let mut z1 = 0.0f64;
        let mut z2 = 0.0f64;
        for sample in samples.iter_mut() {
            let x = *sample as f64;
            let y = self.b0 * x + z1;
            z1 = self.b1 * x - self.a1 * y + z2;
            z2 = self.b2 * x - self.a2 * y;
            *sample = y as f32;
        }
    }
}

/// Filters applied in series to every channel.
#[derive(Debug, Clone)]
pub struct FilterCascade {
    stages: Vec<BiquadCoefficients>,
}

impl FilterCascade {
    pub fn new(chain: &[FilterDescriptor], sample_rate: u32) -> Self {
        Self {
            stages: chain
                .iter()
                .map(|d| BiquadCoefficients::design(d, sample_rate))
                .collect(),
        }
    }

    pub fn stages(&self) -> &[BiquadCoefficients] {
        &self.stages
    }

    /// Render `input` through every stage into a new buffer of the same shape.
    pub fn process(&self, input: &SampleBuffer) -> SampleBuffer {
        let mut output = input.clone();
        for channel in output.channels_mut() {
            for stage in &self.stages {
                stage.process(channel);
            }
        }
        output
    }
}
