//! lamewasm Core - MP3 encoder adapter
//!
//! This crate wraps the LAME MP3 encoder behind a small, checked API that a
//! WebAssembly host can drive: size an output buffer, open an encoder,
//! encode blocks of planar `f32` samples, flush, and close.
//!
//! # Module Structure
//!
//! - `capacity` - Worst-case output buffer sizing
//! - `config` - Encoding profile and ID3 tags
//! - `encoder` - The owned [`Mp3Encoder`]
//! - `registry` - Integer handles for hosts that cannot hold Rust values
//! - `track` - Whole-track chunked encoding
//!
//! # Example
//!
//! ```ignore
//! use lamewasm_core::{estimate_output_capacity, EncoderConfig, Mp3Encoder};
//!
//! let mut encoder = Mp3Encoder::new(EncoderConfig::default())?;
//! let left = vec![0.0f32; 1024];
//! let right = vec![0.0f32; 1024];
//! let mut out = vec![0u8; estimate_output_capacity(1024)];
//!
//! let mut mp3 = Vec::new();
//! let n = encoder.encode(&left, &right, &mut out)?;
//! mp3.extend_from_slice(&out[..n]);
//! let n = encoder.finish(&mut out)?;
//! mp3.extend_from_slice(&out[..n]);
//! ```

pub mod capacity;
pub mod config;
pub mod encoder;
pub mod error;
pub mod registry;
pub mod track;

pub use capacity::{estimate_output_capacity, estimate_output_capacity_i32, FLUSH_CAPACITY};
pub use config::{EncoderConfig, Id3Tags, StereoMode};
pub use encoder::{EncodeStats, Mp3Encoder};
pub use error::{EncoderError, EncoderResult};
pub use registry::{EncoderHandle, EncoderRegistry};
pub use track::{encode_track, DEFAULT_CHUNK_SAMPLES};
