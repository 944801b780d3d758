//! Minimal canonical PCM WAV container synthesis
//!
//! Produces a fixed 44-byte RIFF/WAVE header followed by the sample payload
//! verbatim: uncompressed PCM, mono, 16 bits per sample, all multi-byte
//! integer fields little-endian.

use azan_common::{Error, Result};

/// Fixed header length for a canonical single-data-chunk PCM file
pub const HEADER_LEN: usize = 44;

const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: u32 = 2;

/// Encode samples as a complete WAV byte stream
///
/// Accepts any sample count, including zero. Sample values are carried
/// through untouched; the full signed 16-bit range is valid. The output is
/// exactly `44 + 2 * samples.len()` bytes.
pub fn encode(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    if sample_rate == 0 {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    let byte_rate = sample_rate
        .checked_mul(BYTES_PER_SAMPLE)
        .ok_or(Error::InvalidSampleRate(sample_rate))?;

    let data_len = samples.len() as u32 * BYTES_PER_SAMPLE;
    let mut wav = Vec::with_capacity(HEADER_LEN + data_len as usize);

    // RIFF chunk
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    wav.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&(CHANNELS * BITS_PER_SAMPLE / 8).to_le_bytes()); // block align
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    for &sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    Ok(wav)
}
