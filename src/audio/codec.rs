//! WAV container encode/decode.
//!
//! Encoding always produces the canonical 44-byte header followed by 16-bit
//! little-endian PCM, frame-interleaved. Float samples are clamped to
//! `[-1, 1]`, scaled by 32767 and truncated toward zero (`as i16`), so
//! `0.5 -> 16383`, `-0.5 -> -16383`, `1.0 -> 32767`. NaN encodes as 0.

use byteorder::{LittleEndian, WriteBytesExt};
use hound::{SampleFormat, WavReader};
use std::io::{Cursor, Write};
use std::path::Path;

use super::SampleBuffer;
use crate::error::{EditorError, Result};

pub const WAV_HEADER_LEN: usize = 44;
pub const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;
const PCM_FORMAT: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;
const I16_SCALE: f32 = 32767.0;

/// Source of decoded PCM for arbitrary input bytes.
pub trait Decoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer>;
}

/// Decodes RIFF/WAVE data (integer PCM of any depth, or 32-bit float).
#[derive(Debug, Default, Clone, Copy)]
pub struct WavDecoder;

impl Decoder for WavDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer> {
        decode_wav(bytes)
    }
}

#[inline]
pub fn sample_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * I16_SCALE) as i16
}

pub fn encode_wav(buffer: &SampleBuffer) -> Result<Vec<u8>> {
    let channels = buffer.num_channels();
    let sample_rate = buffer.sample_rate();
    let payload_len = buffer.len() * channels * BYTES_PER_SAMPLE;

    let too_large = || EditorError::InvalidBuffer("buffer too large for a WAV container".into());
    let channel_count = u16::try_from(channels).map_err(|_| too_large())?;
    let block_align = channel_count.checked_mul(2).ok_or_else(too_large)?;
    let byte_rate = sample_rate
        .checked_mul(block_align as u32)
        .ok_or_else(too_large)?;
    let data_len = u32::try_from(payload_len).map_err(|_| too_large())?;
    let riff_len = data_len.checked_add(36).ok_or_else(too_large)?;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + payload_len);

    // RIFF descriptor
    out.write_all(b"RIFF")?;
    out.write_u32::<LittleEndian>(riff_len)?;
    out.write_all(b"WAVE")?;

    // fmt sub-chunk
    out.write_all(b"fmt ")?;
    out.write_u32::<LittleEndian>(FMT_CHUNK_LEN)?;
    out.write_u16::<LittleEndian>(PCM_FORMAT)?;
    out.write_u16::<LittleEndian>(channel_count)?;
    out.write_u32::<LittleEndian>(sample_rate)?;
    out.write_u32::<LittleEndian>(byte_rate)?;
    out.write_u16::<LittleEndian>(block_align)?;
    out.write_u16::<LittleEndian>(BITS_PER_SAMPLE)?;

    // data sub-chunk
    out.write_all(b"data")?;
    out.write_u32::<LittleEndian>(data_len)?;

    for i in 0..buffer.len() {
        for channel in buffer.channels() {
            out.write_i16::<LittleEndian>(sample_to_i16(channel[i]))?;
        }
    }

    debug_assert_eq!(out.len(), WAV_HEADER_LEN + payload_len);
    tracing::debug!(
        channels,
        sample_rate,
        frames = buffer.len(),
        bytes = out.len(),
        "Encoded WAV"
    );
    Ok(out)
}

/// Decode a complete WAV container. Truncated or malformed input fails as
/// a whole; nothing is partially decoded.
pub fn decode_wav(bytes: &[u8]) -> Result<SampleBuffer> {
    let reader =
        WavReader::new(Cursor::new(bytes)).map_err(|e| EditorError::Decode(e.to_string()))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(EditorError::Decode("WAV declares zero channels".into()));
    }

    // Samples come back frame-interleaved
    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EditorError::Decode(e.to_string()))?,
        SampleFormat::Int => {
            // Symmetric full scale, the inverse of the encoder's 32767 scaling
            let max_value = ((1_i64 << (spec.bits_per_sample - 1)) - 1) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_value))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| EditorError::Decode(e.to_string()))?
        }
    };

    let channels = spec.channels as usize;
    if interleaved.len() % channels != 0 {
        return Err(EditorError::Decode(format!(
            "{} samples do not fill whole {}-channel frames",
            interleaved.len(),
            channels
        )));
    }

    let buffer = SampleBuffer::from_interleaved(&interleaved, channels, spec.sample_rate)
        .map_err(|e| EditorError::Decode(e.to_string()))?;
    tracing::debug!(
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames = buffer.len(),
        "Decoded WAV"
    );
    Ok(buffer)
}

pub fn import_wav<P: AsRef<Path>>(path: P) -> Result<SampleBuffer> {
    let bytes = std::fs::read(&path)?;
    tracing::info!(path = %path.as_ref().display(), bytes = bytes.len(), "Importing audio file");
    WavDecoder.decode(&bytes)
}

pub fn export_wav<P: AsRef<Path>>(path: P, buffer: &SampleBuffer) -> Result<()> {
    let bytes = encode_wav(buffer)?;
    std::fs::write(&path, &bytes)?;
    tracing::info!(path = %path.as_ref().display(), bytes = bytes.len(), "Exported WAV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_single_sample_mono_layout() {
        let buffer = SampleBuffer::new(vec![vec![0.5]], 44100).unwrap();
        let bytes = encode_wav(&buffer).unwrap();

        assert_eq!(bytes.len(), 46);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32_at(&bytes, 4), 38);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32_at(&bytes, 16), 16);
        assert_eq!(u16_at(&bytes, 20), 1);
        assert_eq!(u16_at(&bytes, 22), 1);
        assert_eq!(u32_at(&bytes, 24), 44100);
        assert_eq!(u32_at(&bytes, 28), 88200);
        assert_eq!(u16_at(&bytes, 32), 2);
        assert_eq!(u16_at(&bytes, 34), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32_at(&bytes, 40), 2);
        assert_eq!(i16::from_le_bytes([bytes[44], bytes[45]]), 16383);
    }

    #[test]
    fn test_stereo_header_and_interleaving() {
        let buffer = SampleBuffer::new(vec![vec![1.0, 0.0], vec![-1.0, 0.25]], 48000).unwrap();
        let bytes = encode_wav(&buffer).unwrap();

        assert_eq!(bytes.len(), 44 + 8);
        assert_eq!(u32_at(&bytes, 4), 36 + 8);
        assert_eq!(u32_at(&bytes, 28), 48000 * 2 * 2);
        assert_eq!(u16_at(&bytes, 32), 4);
        assert_eq!(u32_at(&bytes, 40), 8);

        let samples: Vec<i16> = bytes[44..]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples, vec![32767, -32767, 0, 8191]);
    }

    #[test]
    fn test_conversion_clamps_and_truncates() {
        assert_eq!(sample_to_i16(1.5), 32767);
        assert_eq!(sample_to_i16(-3.0), -32767);
        assert_eq!(sample_to_i16(0.5), 16383);
        assert_eq!(sample_to_i16(-0.5), -16383);
        assert_eq!(sample_to_i16(0.0), 0);
        assert_eq!(sample_to_i16(f32::NAN), 0);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let left: Vec<f32> = (0..500).map(|i| (i as f32 * 0.05).sin() * 0.8).collect();
        let right: Vec<f32> = left.iter().map(|s| -s * 0.5).collect();
        let buffer = SampleBuffer::new(vec![left, right], 22050).unwrap();

        let decoded = decode_wav(&encode_wav(&buffer).unwrap()).unwrap();
        assert_eq!(decoded.num_channels(), 2);
        assert_eq!(decoded.sample_rate(), 22050);
        assert_eq!(decoded.len(), 500);
        for (orig, dec) in buffer.channels().iter().zip(decoded.channels()) {
            for (a, b) in orig.iter().zip(dec) {
                assert!((a - b).abs() <= 1.0 / 32767.0 + 1e-6);
            }
        }
    }

    #[test]
    fn test_empty_buffer_encodes_header_only() {
        let buffer = SampleBuffer::silent(2, 0, 44100).unwrap();
        let bytes = encode_wav(&buffer).unwrap();
        assert_eq!(bytes.len(), 44);
        assert_eq!(u32_at(&bytes, 40), 0);
    }

    #[test]
    fn test_decode_rejects_garbage_and_truncation() {
        assert!(matches!(
            decode_wav(b"not a wav file at all"),
            Err(EditorError::Decode(_))
        ));

        let buffer = SampleBuffer::silent(1, 100, 8000).unwrap();
        let bytes = encode_wav(&buffer).unwrap();
        assert!(matches!(
            decode_wav(&bytes[..bytes.len() - 51]),
            Err(EditorError::Decode(_))
        ));
    }

    #[test]
    fn test_decodes_float_wav_written_by_hound() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for s in [0.25f32, -0.25, 0.5, -0.5] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }

        let decoded = WavDecoder.decode(cursor.get_ref()).unwrap();
        assert_eq!(decoded.sample_rate(), 16000);
        assert_eq!(decoded.channel(0).unwrap(), &[0.25, 0.5]);
        assert_eq!(decoded.channel(1).unwrap(), &[-0.25, -0.5]);
    }

    #[test]
    fn test_file_export_import_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.wav");
        let buffer = SampleBuffer::new(vec![vec![0.1, -0.2, 0.3, -0.4, 0.5]], 44100).unwrap();

        export_wav(&path, &buffer).unwrap();
        let imported = import_wav(&path).unwrap();

        assert_eq!(imported.len(), buffer.len());
        let original = buffer.channel(0).unwrap();
        for (orig, imp) in original.iter().zip(imported.channel(0).unwrap()) {
            assert!((orig - imp).abs() < 0.001);
        }
    }
}
