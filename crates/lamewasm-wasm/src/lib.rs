//! lamewasm WASM - WebAssembly bindings for the MP3 encoder
//!
//! This crate exposes lamewasm-core to JavaScript so a browser can encode
//! decoded audio (`AudioBuffer.getChannelData`) to MP3 before uploading it.
//!
//! # Module Structure
//!
//! - `encoder` - Handle-based functions (`encoder_init`, `encoder_encode`, ...)
//! - `types` - The class-style `JsMp3Encoder`
//! - `console` - Diagnostic output
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsMp3Encoder } from '@lamewasm/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const audio = await ctx.decodeAudioData(await file.arrayBuffer());
//! const encoder = new JsMp3Encoder(audio.sampleRate, audio.numberOfChannels, title, artist, '');
//! const mp3 = [
//!   encoder.encode(audio.getChannelData(0), audio.getChannelData(1)),
//!   encoder.finish(),
//! ];
//! encoder.free();
//! ```

use wasm_bindgen::prelude::*;

mod console;
mod encoder;
mod types;

// Re-export public types
pub use encoder::{
    encoder_close, encoder_encode, encoder_finish, encoder_init, encoder_init_with_config,
    get_encoded_max_size,
};
pub use types::JsMp3Encoder;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console::log("Encoder WebAssembly loaded");
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
