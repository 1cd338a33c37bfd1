//! Handle-based encoder WASM bindings.
//!
//! These five functions keep the calling convention of the original
//! Emscripten build: the host receives a numeric handle from `encoder_init`
//! and passes it back to every other call. Unlike raw pointers, a handle that
//! was never issued or has been closed produces an error.
//!
//! # Functions
//!
//! - [`get_encoded_max_size`] - Worst-case output size for a chunk
//! - [`encoder_init`] / [`encoder_init_with_config`] - Open an encoder
//! - [`encoder_encode`] - Encode one chunk of planar samples
//! - [`encoder_finish`] - Flush the final partial frame
//! - [`encoder_close`] - Release the encoder
//!
//! # Example
//!
//! ```typescript
//! import { get_encoded_max_size, encoder_init, encoder_encode,
//!          encoder_finish, encoder_close } from '@lamewasm/wasm';
//!
//! const chunk = 1024 * 64;
//! const out = new Uint8Array(get_encoded_max_size(chunk));
//! const handle = encoder_init(audio.sampleRate, audio.numberOfChannels, title, artist, uuid);
//!
//! const parts = [];
//! for (let offset = 0; offset < left.length; offset += chunk) {
//!   const l = left.subarray(offset, offset + chunk);
//!   const r = right.subarray(offset, offset + chunk);
//!   const n = encoder_encode(handle, l, l.length, r, r.length, out, out.length);
//!   parts.push(out.slice(0, n));
//! }
//! parts.push(out.slice(0, encoder_finish(handle, out, out.length)));
//! encoder_close(handle);
//!
//! const blob = new Blob(parts, { type: 'audio/mpeg' });
//! ```

use crate::console;
use lamewasm_core::{
    estimate_output_capacity_i32, EncoderConfig, EncoderError, EncoderHandle, EncoderRegistry,
    EncoderResult, Id3Tags,
};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    static REGISTRY: RefCell<EncoderRegistry> = RefCell::new(EncoderRegistry::new());
}

fn with_registry<T>(f: impl FnOnce(&mut EncoderRegistry) -> T) -> T {
    REGISTRY.with(|registry| f(&mut registry.borrow_mut()))
}

pub(crate) fn to_js_error(err: EncoderError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Worst-case MP3 buffer size in bytes for `orig_length` samples per channel.
///
/// Computed as `1.25 * orig_length + 7200`, rounded. Negative lengths count
/// as zero.
#[wasm_bindgen]
pub fn get_encoded_max_size(orig_length: i32) -> i32 {
    estimate_output_capacity_i32(orig_length)
}

/// Open an encoder with the fixed joint-stereo 128 kbps CBR profile.
///
/// # Arguments
///
/// * `sample_rate` - Input sample rate in Hz (e.g. `AudioBuffer.sampleRate`)
/// * `channels` - Number of input channels (1 or 2)
/// * `title`, `artist`, `comment` - ID3 tag text
///
/// # Returns
///
/// A non-zero handle to pass to the other `encoder_*` functions.
///
/// # Errors
///
/// Returns an error if the sample rate or channel count is invalid, or if
/// LAME rejects the parameters.
#[wasm_bindgen]
pub fn encoder_init(
    sample_rate: u32,
    channels: u32,
    title: &str,
    artist: &str,
    comment: &str,
) -> Result<u32, JsValue> {
    let tags = Id3Tags::new(title, artist, comment);
    let config = EncoderConfig::with_tags(sample_rate, channels, tags);
    open_handle(config).map_err(to_js_error)
}

/// Open an encoder from a configuration object.
///
/// Every field is optional and falls back to the default profile:
///
/// ```typescript
/// const handle = encoder_init_with_config({
///   sample_rate: 48000,
///   channels: 2,
///   bitrate_kbps: 192,
///   mode: 'joint_stereo',   // 'mono' | 'stereo' | 'joint_stereo'
///   quality: 2,
///   tags: { title: 'Song', artist: 'Band', album: 'Album', year: '2024' },
/// });
/// ```
#[wasm_bindgen]
pub fn encoder_init_with_config(config: JsValue) -> Result<u32, JsValue> {
    let config: EncoderConfig = serde_wasm_bindgen::from_value(config).map_err(|e| {
        let message = format!("Invalid encoder config: {}", e);
        JsValue::from(js_sys::Error::new(&message))
    })?;
    open_handle(config).map_err(to_js_error)
}

/// Encode one chunk of planar samples.
///
/// # Arguments
///
/// * `handle` - Handle from `encoder_init`
/// * `channel0`, `length0` - Left (or mono) samples and how many to encode
/// * `channel1`, `length1` - Right samples; ignored for mono encoders
/// * `output_buffer` - Destination for MP3 bytes
/// * `max_size` - Usable bytes of `output_buffer`; clamped to its length
///
/// # Returns
///
/// The number of bytes written to the front of `output_buffer` (may be 0).
///
/// # Errors
///
/// Returns an error for a null, unknown or closed handle, a length past the
/// end of its buffer, mismatched stereo lengths, or a buffer smaller than
/// `get_encoded_max_size(length0)`.
#[wasm_bindgen]
pub fn encoder_encode(
    handle: u32,
    channel0: &[f32],
    length0: u32,
    channel1: &[f32],
    length1: u32,
    output_buffer: &mut [u8],
    max_size: u32,
) -> Result<u32, JsValue> {
    let bytes = encode_with_handle(
        handle,
        channel0,
        length0 as usize,
        channel1,
        length1 as usize,
        output_buffer,
        max_size as usize,
    )
    .map_err(to_js_error)?;
    console::log(&format!("Encoded {} bytes", bytes));
    Ok(bytes as u32)
}

/// Flush the final partial frame.
///
/// `output_buffer` must offer at least 7200 usable bytes.
#[wasm_bindgen]
pub fn encoder_finish(
    handle: u32,
    output_buffer: &mut [u8],
    max_size: u32,
) -> Result<u32, JsValue> {
    let bytes =
        finish_with_handle(handle, output_buffer, max_size as usize).map_err(to_js_error)?;
    console::log(&format!("Flushed {} bytes", bytes));
    Ok(bytes as u32)
}

/// Release the encoder. The handle is invalid afterwards.
#[wasm_bindgen]
pub fn encoder_close(handle: u32) -> Result<(), JsValue> {
    close_handle(handle).map_err(to_js_error)
}

pub(crate) fn open_handle(config: EncoderConfig) -> EncoderResult<u32> {
    with_registry(|registry| registry.open(config)).map(EncoderHandle::get)
}

pub(crate) fn encode_with_handle(
    handle: u32,
    channel0: &[f32],
    length0: usize,
    channel1: &[f32],
    length1: usize,
    output: &mut [u8],
    max_size: usize,
) -> EncoderResult<usize> {
    let handle = EncoderHandle::from(handle);
    let capacity = max_size.min(output.len());
    with_registry(|registry| {
        let stereo = registry.config(handle)?.is_stereo();
        let left = prefix(channel0, length0)?;
        // Mono encoders never read channel 1, so its length is not checked.
        let right = if stereo {
            prefix(channel1, length1)?
        } else {
            &[][..]
        };
        registry.encode(handle, left, right, &mut output[..capacity])
    })
}

pub(crate) fn finish_with_handle(
    handle: u32,
    output: &mut [u8],
    max_size: usize,
) -> EncoderResult<usize> {
    let capacity = max_size.min(output.len());
    let handle = EncoderHandle::from(handle);
    with_registry(|registry| registry.finish(handle, &mut output[..capacity]))
}

pub(crate) fn close_handle(handle: u32) -> EncoderResult<()> {
    with_registry(|registry| registry.close(EncoderHandle::from(handle))).map(|_| ())
}

fn prefix(samples: &[f32], length: usize) -> EncoderResult<&[f32]> {
    samples
        .get(..length)
        .ok_or(EncoderError::SampleCountOutOfRange {
            requested: length,
            available: samples.len(),
        })
}
