//! Class-style encoder wrapper for JavaScript.
//!
//! [`JsMp3Encoder`] owns its encoder directly instead of going through the
//! handle table, and allocates output buffers itself, so callers never size
//! buffers by hand.

use crate::console;
use crate::encoder::to_js_error;
use lamewasm_core::{
    estimate_output_capacity, EncoderConfig, EncoderResult, Id3Tags, Mp3Encoder, FLUSH_CAPACITY,
};
use wasm_bindgen::prelude::*;

/// An MP3 encoder owned by a JavaScript object.
///
/// # Memory Management
///
/// The LAME state lives in WASM memory until `free()` is called or the
/// wasm-bindgen finalizer collects the object. Call `free()` once the stream
/// is finished to release it promptly.
///
/// # Example (TypeScript)
/// ```typescript
/// const encoder = new JsMp3Encoder(44100, 2, 'Title', 'Artist', '');
/// const parts = [encoder.encode(left, right), encoder.finish()];
/// console.log(`${encoder.bytes_out} bytes from ${encoder.samples_in} samples`);
/// encoder.free();
/// ```
#[wasm_bindgen]
pub struct JsMp3Encoder {
    inner: Mp3Encoder,
}

#[wasm_bindgen]
impl JsMp3Encoder {
    /// Create an encoder with the fixed joint-stereo 128 kbps CBR profile.
    ///
    /// # Errors
    /// Returns error if the sample rate or channel count is invalid
    #[wasm_bindgen(constructor)]
    pub fn new(
        sample_rate: u32,
        channels: u32,
        title: &str,
        artist: &str,
        comment: &str,
    ) -> Result<JsMp3Encoder, JsValue> {
        let tags = Id3Tags::new(title, artist, comment);
        let config = EncoderConfig::with_tags(sample_rate, channels, tags);
        Self::from_config(config).map_err(to_js_error)
    }

    /// Encode a block of planar samples and return the MP3 bytes produced.
    ///
    /// `right` is ignored for mono encoders.
    pub fn encode(&mut self, left: &[f32], right: &[f32]) -> Result<Vec<u8>, JsValue> {
        let bytes = self.encode_block(left, right).map_err(to_js_error)?;
        console::log(&format!("Encoded {} bytes", bytes.len()));
        Ok(bytes)
    }

    /// Flush the final partial frame and return its bytes.
    pub fn finish(&mut self) -> Result<Vec<u8>, JsValue> {
        let bytes = self.flush_block().map_err(to_js_error)?;
        console::log(&format!("Flushed {} bytes", bytes.len()));
        Ok(bytes)
    }

    /// Samples consumed per channel so far
    #[wasm_bindgen(getter)]
    pub fn samples_in(&self) -> f64 {
        self.inner.stats().samples_in as f64
    }

    /// MP3 bytes produced so far
    #[wasm_bindgen(getter)]
    pub fn bytes_out(&self) -> f64 {
        self.inner.stats().bytes_out as f64
    }

    /// Whether `finish()` has been called
    #[wasm_bindgen(getter)]
    pub fn flushed(&self) -> bool {
        self.inner.stats().flushed
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    /// Call this to release the encoder as soon as the stream is done.
    pub fn free(self) {
        self.inner.close();
    }
}

impl JsMp3Encoder {
    pub(crate) fn from_config(config: EncoderConfig) -> EncoderResult<Self> {
        Ok(Self {
            inner: Mp3Encoder::new(config)?,
        })
    }

    pub(crate) fn encode_block(&mut self, left: &[f32], right: &[f32]) -> EncoderResult<Vec<u8>> {
        let mut out = vec![0u8; estimate_output_capacity(left.len())];
        let n = self.inner.encode(left, right, &mut out)?;
        out.truncate(n);
        Ok(out)
    }

    pub(crate) fn flush_block(&mut self) -> EncoderResult<Vec<u8>> {
        let mut out = vec![0u8; FLUSH_CAPACITY];
        let n = self.inner.finish(&mut out)?;
        out.truncate(n);
        Ok(out)
    }
}
