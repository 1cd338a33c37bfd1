//! Integer handles for hosts that cannot hold Rust values.
//!
//! A WebAssembly host passes encoders around as plain numbers. The
//! [`EncoderRegistry`] owns every open [`Mp3Encoder`] and maps those numbers
//! back to them, so a stale or forged handle produces an error instead of a
//! dangling pointer.
//!
//! Handles are non-zero and never reused within one registry; `0` is the null
//! handle a host holds before initialization.

use crate::config::EncoderConfig;
use crate::encoder::{EncodeStats, Mp3Encoder};
use crate::error::{EncoderError, EncoderResult};
use std::collections::HashMap;

/// Host-visible encoder handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncoderHandle(u32);

impl EncoderHandle {
    /// The handle a host holds before calling `initialize`.
    pub const NULL: EncoderHandle = EncoderHandle(0);

    /// Raw value passed across the host boundary
    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for EncoderHandle {
    fn from(value: u32) -> Self {
        EncoderHandle(value)
    }
}

/// Table of open encoders keyed by handle.
#[derive(Debug)]
pub struct EncoderRegistry {
    encoders: HashMap<u32, Mp3Encoder>,
    next_id: u32,
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self {
            encoders: HashMap::new(),
            next_id: 1,
        }
    }
}

impl EncoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an encoder and return a fresh handle for it.
    pub fn open(&mut self, config: EncoderConfig) -> EncoderResult<EncoderHandle> {
        // Wrapping past u32::MAX would make handles ambiguous.
        if self.next_id == u32::MAX {
            return Err(EncoderError::HandlesExhausted);
        }

        let encoder = Mp3Encoder::new(config)?;
        let handle = EncoderHandle(self.next_id);
        self.next_id += 1;
        self.encoders.insert(handle.0, encoder);
        Ok(handle)
    }

    /// Encode a block with the encoder behind `handle`.
    pub fn encode(
        &mut self,
        handle: EncoderHandle,
        left: &[f32],
        right: &[f32],
        output: &mut [u8],
    ) -> EncoderResult<usize> {
        self.get_mut(handle)?.encode(left, right, output)
    }

    /// Flush the encoder behind `handle`.
    pub fn finish(&mut self, handle: EncoderHandle, output: &mut [u8]) -> EncoderResult<usize> {
        self.get_mut(handle)?.finish(output)
    }

    /// Release the encoder behind `handle`; the handle is dead afterwards.
    pub fn close(&mut self, handle: EncoderHandle) -> EncoderResult<EncodeStats> {
        if handle.is_null() {
            return Err(EncoderError::UninitializedEncoder);
        }
        self.encoders
            .remove(&handle.0)
            .map(Mp3Encoder::close)
            .ok_or(EncoderError::InvalidHandle(handle.0))
    }

    /// Totals for the encoder behind `handle`
    pub fn stats(&self, handle: EncoderHandle) -> EncoderResult<EncodeStats> {
        if handle.is_null() {
            return Err(EncoderError::UninitializedEncoder);
        }
        self.encoders
            .get(&handle.0)
            .map(Mp3Encoder::stats)
            .ok_or(EncoderError::InvalidHandle(handle.0))
    }

    /// Configuration of the encoder behind `handle`
    pub fn config(&self, handle: EncoderHandle) -> EncoderResult<&EncoderConfig> {
        if handle.is_null() {
            return Err(EncoderError::UninitializedEncoder);
        }
        self.encoders
            .get(&handle.0)
            .map(Mp3Encoder::config)
            .ok_or(EncoderError::InvalidHandle(handle.0))
    }

    /// Number of open encoders
    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    fn get_mut(&mut self, handle: EncoderHandle) -> EncoderResult<&mut Mp3Encoder> {
        if handle.is_null() {
            return Err(EncoderError::UninitializedEncoder);
        }
        self.encoders
            .get_mut(&handle.0)
            .ok_or(EncoderError::InvalidHandle(handle.0))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::capacity::estimate_output_capacity;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Property: Bytes written across a session never exceed the capacity supplied.
        #[test]
        fn prop_bytes_within_supplied_capacity(
            chunks in prop::collection::vec(0usize..=4096, 1..=6),
            extra in 0usize..=512,
        ) {
            let mut registry = EncoderRegistry::new();
            let handle = registry.open(EncoderConfig::default()).unwrap();

            let mut supplied = 0usize;
            let mut written = 0usize;

            for (i, len) in chunks.iter().enumerate() {
                let samples: Vec<f32> = (0..*len)
                    .map(|n| ((n + i) as f32 * 0.01).sin() * 0.8)
                    .collect();
                let mut out = vec![0u8; estimate_output_capacity(*len) + extra];
                supplied += out.len();

                let n = registry.encode(handle, &samples, &samples, &mut out).unwrap();
                prop_assert!(n <= out.len());
                written += n;
            }

            let mut out = vec![0u8; estimate_output_capacity(0) + extra];
            supplied += out.len();
            written += registry.finish(handle, &mut out).unwrap();

            let stats = registry.close(handle).unwrap();
            prop_assert_eq!(stats.bytes_out, written as u64);
            prop_assert!(written <= supplied);
        }

        /// Property: Any handle the registry never issued is rejected.
        #[test]
        fn prop_unissued_handles_rejected(raw in 1u32..=u32::MAX) {
            let mut registry = EncoderRegistry::new();
            let mut out = vec![0u8; estimate_output_capacity(0)];
            let result = registry.finish(EncoderHandle::from(raw), &mut out);
            prop_assert!(matches!(result, Err(EncoderError::InvalidHandle(h)) if h == raw));
        }
    }
}
