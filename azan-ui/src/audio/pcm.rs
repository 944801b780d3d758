//! Base64 payload decoding and PCM sample interpretation

use azan_common::{Error, Result};
use base64::{engine::general_purpose, Engine as _};

/// Decode a standard-alphabet Base64 string into raw bytes
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(data)
        .map_err(|e| Error::Decode(format!("Invalid base64 payload: {}", e)))
}

/// Reinterpret raw bytes as signed 16-bit little-endian mono samples
///
/// The payload is 2 bytes per sample; an odd byte count means the payload is
/// corrupt and is rejected rather than truncated.
pub fn bytes_to_samples(bytes: &[u8]) -> Result<Vec<i16>> {
    if bytes.len() % 2 != 0 {
        return Err(Error::Decode(format!(
            "PCM payload has odd byte length {}",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Extract the sample rate from a mime type of the form
/// `audio/<codec>;rate=<digits>`
pub fn parse_sample_rate(mime: &str) -> Result<u32> {
    if !mime.starts_with("audio/") {
        return Err(Error::MalformedResponse(format!(
            "Unexpected payload mime type: {}",
            mime
        )));
    }

    let rate = mime
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .next()
        .ok_or_else(|| {
            Error::MalformedResponse(format!("No rate parameter in mime type: {}", mime))
        })?;

    rate.parse::<u32>().map_err(|_| {
        Error::MalformedResponse(format!("Unparsable rate in mime type: {}", mime))
    })
}
