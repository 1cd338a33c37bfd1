//! Output buffer sizing.
//!
//! LAME documents a worst-case bound for the MP3 buffer needed to encode
//! `n` samples per channel: `1.25 * n + 7200` bytes. Flushing needs at most
//! one padded frame plus the reservoir, which fits in the constant term.

/// Constant term of the worst-case bound, and the minimum flush buffer size.
pub const FLUSH_CAPACITY: usize = 7200;

/// Worst-case encoded size, in bytes, for `sample_count` samples per channel.
///
/// Computed as `1.25 * sample_count + 7200`, rounded to the nearest integer.
///
/// # Example
///
/// ```
/// use lamewasm_core::estimate_output_capacity;
///
/// assert_eq!(estimate_output_capacity(44100), 62325);
/// ```
pub fn estimate_output_capacity(sample_count: usize) -> usize {
    let bytes = (sample_count as f64 * 1.25 + FLUSH_CAPACITY as f64 + 0.5) as u64;
    usize::try_from(bytes).unwrap_or(usize::MAX)
}

/// Host-facing variant taking and returning `i32`.
///
/// Negative lengths count as zero and the result saturates at `i32::MAX`.
pub fn estimate_output_capacity_i32(sample_count: i32) -> i32 {
    let samples = usize::try_from(sample_count).unwrap_or(0);
    i32::try_from(estimate_output_capacity(samples)).unwrap_or(i32::MAX)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: The estimate never drops below the flush capacity.
        #[test]
        fn prop_at_least_flush_capacity(n in 0usize..=10_000_000) {
            prop_assert!(estimate_output_capacity(n) >= FLUSH_CAPACITY);
        }

        /// Property: The estimate is monotonically non-decreasing.
        #[test]
        fn prop_monotonic(a in 0usize..=10_000_000, b in 0usize..=10_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(estimate_output_capacity(lo) <= estimate_output_capacity(hi));
        }

        /// Property: The estimate is within rounding of 1.25 bytes per sample.
        #[test]
        fn prop_tracks_per_sample_bound(n in 0usize..=10_000_000) {
            let est = estimate_output_capacity(n) as f64;
            let exact = n as f64 * 1.25 + FLUSH_CAPACITY as f64;
            prop_assert!((est - exact).abs() <= 0.5);
        }

        /// Property: The host-facing variant agrees with the native one.
        #[test]
        fn prop_i32_matches_native(n in 0i32..=1_000_000) {
            prop_assert_eq!(
                estimate_output_capacity_i32(n) as usize,
                estimate_output_capacity(n as usize)
            );
        }
    }
}
