//! Owned MP3 encoder.
//!
//! [`Mp3Encoder`] wraps one LAME encoder instance. It is created fully
//! configured, encodes blocks of planar `f32` samples into caller-provided
//! byte buffers, and releases the LAME state when dropped.
//!
//! Unlike calling LAME directly, every call checks the output capacity
//! against [`estimate_output_capacity`] before any sample reaches the
//! library, so an undersized buffer is an error rather than a truncated or
//! corrupted stream.

use crate::capacity::{estimate_output_capacity, FLUSH_CAPACITY};
use crate::config::EncoderConfig;
use crate::error::{EncoderError, EncoderResult};
use log::{debug, trace};
use mp3lame_encoder::{Builder, DualPcm, EncodeError, Encoder, FlushGap, Id3Tag, MonoPcm};

/// Running totals for one encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Samples consumed per channel
    pub samples_in: u64,
    /// MP3 bytes produced by encode and finish calls
    pub bytes_out: u64,
    /// Number of encode calls that reached the backend
    pub encode_calls: u32,
    /// Whether finish has been called at least once
    pub flushed: bool,
}

/// A configured LAME encoder.
///
/// Not `Clone`: the instance owns native state that is released exactly once,
/// on drop or [`close`](Self::close).
pub struct Mp3Encoder {
    inner: Encoder,
    config: EncoderConfig,
    stats: EncodeStats,
    // LAME writes here first; the bytes are then copied to the caller's buffer
    scratch: Vec<u8>,
}

impl std::fmt::Debug for Mp3Encoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mp3Encoder")
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Mp3Encoder {
    /// Validate `config` and build a LAME encoder from it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range fields, or
    /// [`EncoderError::BuildFailed`] / [`EncoderError::TagRejected`] when LAME
    /// refuses the parameter set.
    pub fn new(config: EncoderConfig) -> EncoderResult<Self> {
        config.validate()?;

        let mut builder = Builder::new().ok_or(EncoderError::BackendUnavailable)?;
        builder
            .set_num_channels(config.channels)
            .map_err(|e| EncoderError::BuildFailed(format!("set_num_channels: {:?}", e)))?;
        builder
            .set_sample_rate(config.sample_rate)
            .map_err(|e| EncoderError::BuildFailed(format!("set_sample_rate: {:?}", e)))?;
        builder
            .set_mode(config.lame_mode())
            .map_err(|e| EncoderError::BuildFailed(format!("set_mode: {:?}", e)))?;
        builder
            .set_brate(config.lame_bitrate()?)
            .map_err(|e| EncoderError::BuildFailed(format!("set_brate: {:?}", e)))?;
        builder
            .set_quality(config.lame_quality()?)
            .map_err(|e| EncoderError::BuildFailed(format!("set_quality: {:?}", e)))?;

        if !config.tags.is_empty() {
            let tags = &config.tags;
            builder
                .set_id3_tag(Id3Tag {
                    title: tags.title.as_bytes(),
                    artist: tags.artist.as_bytes(),
                    album: tags.album.as_bytes(),
                    album_art: &[],
                    year: tags.year.as_bytes(),
                    comment: tags.comment.as_bytes(),
                })
                .map_err(|e| EncoderError::TagRejected(format!("{:?}", e)))?;
        }

        let inner = builder
            .build()
            .map_err(|e| EncoderError::BuildFailed(format!("{:?}", e)))?;

        debug!(
            "opened encoder: {} Hz, {} ch, {} kbps, {:?}",
            config.sample_rate,
            config.channels,
            config.bitrate_kbps,
            config.effective_mode()
        );

        Ok(Self {
            inner,
            config,
            stats: EncodeStats::default(),
            scratch: Vec::new(),
        })
    }

    /// The configuration this encoder was built with
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Totals accumulated so far
    pub fn stats(&self) -> EncodeStats {
        self.stats
    }

    /// Encode one block of planar samples into `output`.
    ///
    /// For stereo input `left` and `right` must have the same length; for
    /// mono input `right` is ignored. `output` must hold at least
    /// `estimate_output_capacity(left.len())` bytes.
    ///
    /// Returns the number of bytes written to the front of `output`, which
    /// may be zero while LAME buffers a partial frame.
    pub fn encode(
        &mut self,
        left: &[f32],
        right: &[f32],
        output: &mut [u8],
    ) -> EncoderResult<usize> {
        if self.config.is_stereo() && left.len() != right.len() {
            return Err(EncoderError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }

        let required = estimate_output_capacity(left.len());
        let available = output.len();
        if available < required {
            return Err(EncoderError::BufferTooSmall {
                required,
                available,
            });
        }

        if left.is_empty() {
            return Ok(0);
        }

        self.scratch.clear();
        self.scratch.reserve_exact(available);
        let result = if self.config.is_stereo() {
            self.inner.encode_to_vec(DualPcm { left, right }, &mut self.scratch)
        } else {
            self.inner.encode_to_vec(MonoPcm(left), &mut self.scratch)
        };
        result.map_err(|e| map_encode_error(e, required, available))?;
        let written = self.copy_scratch(output, required)?;

        self.stats.samples_in += left.len() as u64;
        self.stats.bytes_out += written as u64;
        self.stats.encode_calls += 1;
        trace!("encoded {} samples into {} bytes", left.len(), written);

        Ok(written)
    }

    /// Flush the buffered partial frame into `output`.
    ///
    /// `output` must hold at least [`FLUSH_CAPACITY`] bytes.
    pub fn finish(&mut self, output: &mut [u8]) -> EncoderResult<usize> {
        let available = output.len();
        if available < FLUSH_CAPACITY {
            return Err(EncoderError::BufferTooSmall {
                required: FLUSH_CAPACITY,
                available,
            });
        }

        // A gapped flush ends the stream and appends the ID3v1 trailer.
        self.scratch.clear();
        self.scratch.reserve_exact(available);
        self.inner
            .flush_to_vec::<FlushGap>(&mut self.scratch)
            .map_err(|e| map_encode_error(e, FLUSH_CAPACITY, available))?;
        let written = self.copy_scratch(output, FLUSH_CAPACITY)?;

        self.stats.bytes_out += written as u64;
        self.stats.flushed = true;
        trace!("flushed {} bytes", written);

        Ok(written)
    }

    /// Release the encoder, returning its final totals.
    pub fn close(self) -> EncodeStats {
        debug!(
            "closing encoder after {} samples, {} bytes",
            self.stats.samples_in, self.stats.bytes_out
        );
        self.stats
    }

    /// Move the last LAME output into the front of `output`.
    fn copy_scratch(&self, output: &mut [u8], required: usize) -> EncoderResult<usize> {
        let written = self.scratch.len();
        let available = output.len();
        let dest = output
            .get_mut(..written)
            .ok_or(EncoderError::BufferTooSmall {
                required: required.max(written),
                available,
            })?;
        dest.copy_from_slice(&self.scratch);
        Ok(written)
    }
}

fn map_encode_error(err: EncodeError, required: usize, available: usize) -> EncoderError {
    match err {
        EncodeError::BufferTooSmall => EncoderError::BufferTooSmall {
            required,
            available,
        },
        other => EncoderError::EncodeFailed(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Id3Tags, StereoMode};

    fn stereo_encoder() -> Mp3Encoder {
        Mp3Encoder::new(EncoderConfig::default()).unwrap()
    }

    /// A 440 Hz tone at half amplitude.
    fn sine(sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (i as f32 * 440.0 * std::f32::consts::TAU / sample_rate as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_zero_samples_then_finish() {
        let mut encoder = stereo_encoder();
        let silence = vec![0.0f32; 1024];
        let mut out = vec![0u8; estimate_output_capacity(1024)];

        let encoded = encoder.encode(&silence, &silence, &mut out).unwrap();
        assert!(encoded <= out.len());

        let flushed = encoder.finish(&mut out).unwrap();
        assert!(encoded + flushed > 0, "flush should emit the buffered frames");

        let stats = encoder.close();
        assert_eq!(stats.samples_in, 1024);
        assert_eq!(stats.bytes_out, (encoded + flushed) as u64);
        assert!(stats.flushed);
    }

    #[test]
    fn test_output_starts_with_frame_sync_or_tag() {
        let mut config = EncoderConfig::default();
        config.tags = Id3Tags::default();
        let mut encoder = Mp3Encoder::new(config).unwrap();

        let tone = sine(44_100, 44_100);
        let mut out = vec![0u8; estimate_output_capacity(tone.len())];
        let mut stream = Vec::new();

        let n = encoder.encode(&tone, &tone, &mut out).unwrap();
        stream.extend_from_slice(&out[..n]);
        let n = encoder.finish(&mut out).unwrap();
        stream.extend_from_slice(&out[..n]);

        assert!(stream.len() > 1000);
        // Either an ID3v2 header or an MPEG audio frame sync (11 set bits)
        let tagged = stream.starts_with(b"ID3");
        let synced = stream[0] == 0xFF && stream[1] & 0xE0 == 0xE0;
        assert!(tagged || synced);
    }

    #[test]
    fn test_tags_are_embedded() {
        let tags = Id3Tags::new("Title", "Artist", "uuid");
        let config = EncoderConfig::with_tags(44_100, 2, tags);
        let mut encoder = Mp3Encoder::new(config).unwrap();

        let tone = sine(44_100, 4096);
        let mut out = vec![0u8; estimate_output_capacity(tone.len())];
        let mut stream = Vec::new();

        let n = encoder.encode(&tone, &tone, &mut out).unwrap();
        stream.extend_from_slice(&out[..n]);
        let n = encoder.finish(&mut out).unwrap();
        stream.extend_from_slice(&out[..n]);

        assert!(stream.windows(5).any(|w| w == b"Title"));
    }

    #[test]
    fn test_finish_appends_id3v1_trailer() {
        let tags = Id3Tags::new("Title", "Artist", "uuid");
        let config = EncoderConfig::with_tags(44_100, 2, tags);
        let mut encoder = Mp3Encoder::new(config).unwrap();

        let tone = sine(44_100, 4096);
        let mut out = vec![0u8; estimate_output_capacity(tone.len())];
        let mut stream = Vec::new();

        let n = encoder.encode(&tone, &tone, &mut out).unwrap();
        stream.extend_from_slice(&out[..n]);
        let n = encoder.finish(&mut out).unwrap();
        stream.extend_from_slice(&out[..n]);

        // ID3v1: "TAG", then a 30-byte title and a 30-byte artist field
        assert!(stream.len() > 128);
        let trailer = &stream[stream.len() - 128..];
        assert_eq!(&trailer[..3], b"TAG");
        assert!(trailer[3..33].starts_with(b"Title"));
        assert!(trailer[33..63].starts_with(b"Artist"));
    }

    #[test]
    fn test_mono_stream_is_complete() {
        let config = EncoderConfig::with_tags(44_100, 1, Id3Tags::new("Mono", "", ""));
        let mut encoder = Mp3Encoder::new(config).unwrap();

        let tone = sine(44_100, 8192);
        let mut out = vec![0u8; estimate_output_capacity(tone.len())];
        let mut stream = Vec::new();

        let n = encoder.encode(&tone, &[], &mut out).unwrap();
        stream.extend_from_slice(&out[..n]);
        let n = encoder.finish(&mut out).unwrap();
        stream.extend_from_slice(&out[..n]);

        assert_eq!(encoder.stats().bytes_out, stream.len() as u64);
        assert_eq!(&stream[stream.len() - 128..stream.len() - 125], b"TAG");
    }

    #[test]
    fn test_mono_ignores_right_channel() {
        let config = EncoderConfig::with_tags(22_050, 1, Id3Tags::default());
        let mut encoder = Mp3Encoder::new(config).unwrap();
        assert_eq!(encoder.config().effective_mode(), StereoMode::Mono);

        let tone = sine(22_050, 2048);
        let mut out = vec![0u8; estimate_output_capacity(tone.len())];
        // An empty right channel is fine for mono input
        let result = encoder.encode(&tone, &[], &mut out);
        assert!(result.is_ok());
    }

    #[test]
    fn test_channel_length_mismatch() {
        let mut encoder = stereo_encoder();
        let mut out = vec![0u8; estimate_output_capacity(1024)];
        let result = encoder.encode(&[0.0; 1024], &[0.0; 1000], &mut out);
        assert!(matches!(
            result,
            Err(EncoderError::ChannelLengthMismatch {
                left: 1024,
                right: 1000
            })
        ));
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut encoder = stereo_encoder();
        let mut out = vec![0u8; 100];
        let result = encoder.encode(&[0.0; 1024], &[0.0; 1024], &mut out);
        assert!(matches!(
            result,
            Err(EncoderError::BufferTooSmall {
                required: 8480,
                available: 100
            })
        ));
        assert_eq!(encoder.stats().encode_calls, 0);
    }

    #[test]
    fn test_finish_buffer_too_small() {
        let mut encoder = stereo_encoder();
        let mut out = vec![0u8; FLUSH_CAPACITY - 1];
        let result = encoder.finish(&mut out);
        assert!(matches!(result, Err(EncoderError::BufferTooSmall { .. })));
        assert!(!encoder.stats().flushed);
    }

    #[test]
    fn test_empty_block_writes_nothing() {
        let mut encoder = stereo_encoder();
        let mut out = vec![0u8; FLUSH_CAPACITY];
        assert_eq!(encoder.encode(&[], &[], &mut out).unwrap(), 0);
        assert_eq!(encoder.stats().encode_calls, 0);
    }

    #[test]
    fn test_invalid_config_rejected_before_backend() {
        let mut config = EncoderConfig::default();
        config.channels = 6;
        assert!(matches!(
            Mp3Encoder::new(config),
            Err(EncoderError::InvalidChannelCount(6))
        ));
    }
}
