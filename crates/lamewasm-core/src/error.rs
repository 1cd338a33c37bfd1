//! Error types for the encoder adapter.

use thiserror::Error;

/// Errors that can occur while configuring or driving an encoder.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// The handle does not name a live encoder (never issued, or already closed).
    #[error("Invalid encoder handle: {0}")]
    InvalidHandle(u32),

    /// The null handle was used, i.e. the encoder was never initialized.
    #[error("Encoder used before initialization")]
    UninitializedEncoder,

    /// The output buffer cannot hold the worst-case encoded size.
    #[error("Output buffer too small: need {required} bytes, got {available}")]
    BufferTooSmall { required: usize, available: usize },

    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Only mono and stereo input is supported.
    #[error("Invalid channel count: {0} (expected 1 or 2)")]
    InvalidChannelCount(u32),

    #[error("Unsupported bitrate: {0} kbps")]
    UnsupportedBitrate(u16),

    #[error("Invalid quality: {0} (expected 0-9)")]
    InvalidQuality(u8),

    /// Stereo input with a different number of samples per channel.
    #[error("Channel length mismatch: left has {left} samples, right has {right}")]
    ChannelLengthMismatch { left: usize, right: usize },

    /// A sample count larger than the buffer it refers to.
    #[error("Sample count {requested} exceeds buffer length {available}")]
    SampleCountOutOfRange { requested: usize, available: usize },

    #[error("Chunk size must be non-zero")]
    InvalidChunkSize,

    /// Every handle value has been issued once.
    #[error("No encoder handles left")]
    HandlesExhausted,

    /// LAME could not allocate its global state.
    #[error("MP3 encoder backend unavailable")]
    BackendUnavailable,

    /// LAME rejected the parameter set.
    #[error("Failed to initialize encoder: {0}")]
    BuildFailed(String),

    #[error("Failed to set ID3 tag: {0}")]
    TagRejected(String),

    /// LAME returned a negative code while encoding or flushing.
    #[error("MP3 encoding failed: {0}")]
    EncodeFailed(String),
}

/// Result alias used throughout the crate.
pub type EncoderResult<T> = Result<T, EncoderError>;
