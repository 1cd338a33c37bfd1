//! Whole-track encoding.
//!
//! Browser hosts decode a complete file into per-channel `f32` arrays and
//! feed them to the encoder in fixed-size chunks, then flush once. This
//! module runs the same loop natively and returns the finished MP3 stream.

use crate::capacity::estimate_output_capacity;
use crate::config::EncoderConfig;
use crate::encoder::Mp3Encoder;
use crate::error::{EncoderError, EncoderResult};

/// Samples per channel fed to the encoder per call (64Ki).
pub const DEFAULT_CHUNK_SAMPLES: usize = 1024 * 64;

/// Encode a complete track into one MP3 byte stream.
///
/// `right` is ignored for mono configs. One scratch buffer sized for
/// `chunk_samples` is reused for every chunk and for the final flush.
///
/// # Errors
///
/// Returns [`EncoderError::InvalidChunkSize`] for a zero chunk size, and
/// otherwise whatever the encoder reports.
pub fn encode_track(
    left: &[f32],
    right: &[f32],
    config: EncoderConfig,
    chunk_samples: usize,
) -> EncoderResult<Vec<u8>> {
    if chunk_samples == 0 {
        return Err(EncoderError::InvalidChunkSize);
    }

    let mut encoder = Mp3Encoder::new(config)?;
    let stereo = encoder.config().is_stereo();
    if stereo && left.len() != right.len() {
        return Err(EncoderError::ChannelLengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let mut scratch = vec![0u8; estimate_output_capacity(chunk_samples)];
    let mut stream = Vec::with_capacity(estimate_output_capacity(left.len()));

    for (i, left_chunk) in left.chunks(chunk_samples).enumerate() {
        let right_chunk = if stereo {
            let start = i * chunk_samples;
            &right[start..start + left_chunk.len()]
        } else {
            &[][..]
        };
        let n = encoder.encode(left_chunk, right_chunk, &mut scratch)?;
        stream.extend_from_slice(&scratch[..n]);
    }

    let n = encoder.finish(&mut scratch)?;
    stream.extend_from_slice(&scratch[..n]);

    let stats = encoder.close();
    debug_assert_eq!(stats.bytes_out, stream.len() as u64);

    Ok(stream)
}
