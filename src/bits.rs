//! Bit-length helper shared by both estimation engines.
//!
//! Distances are reported as `floor(log2(distance))` buckets, which keeps
//! histograms compact and avoids comparing exact magnitudes on the hot path.

/// Bucket reported for a reference with no recorded prior occurrence.
///
/// One past the highest representable bit position, so a cold reference
/// sorts as "more distant than any real distance".
pub const COLD_BUCKET: u32 = 64;

/// Returns the 0-based position of the highest set bit of `v`.
///
/// `bit_length(1) == 0`, `bit_length(2) == 1`, ..., `bit_length(1 << 63) == 63`.
/// For `v == 0` there is no set bit; the function returns [`COLD_BUCKET`],
/// treating zero as wider than any representable distance so that cold
/// references and overflow report uniformly.
///
/// # Example
///
/// ```
/// use reusekit::bits::{bit_length, COLD_BUCKET};
///
/// assert_eq!(bit_length(1), 0);
/// assert_eq!(bit_length(5), 2);
/// assert_eq!(bit_length(1024), 10);
/// assert_eq!(bit_length(0), COLD_BUCKET);
/// ```
#[inline]
pub const fn bit_length(v: u64) -> u32 {
    if v == 0 {
        COLD_BUCKET
    } else {
        63 - v.leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_length_of_zero_is_cold() {
        assert_eq!(bit_length(0), COLD_BUCKET);
        assert_eq!(COLD_BUCKET, 64);
    }

    #[test]
    fn bit_length_of_powers_of_two() {
        for shift in 0..64u32 {
            assert_eq!(bit_length(1u64 << shift), shift);
        }
    }

    #[test]
    fn bit_length_rounds_down_between_powers() {
        for shift in 1..63u32 {
            let low = 1u64 << shift;
            assert_eq!(bit_length(low + 1), shift);
            assert_eq!(bit_length((low << 1) - 1), shift);
        }
        assert_eq!(bit_length(u64::MAX), 63);
    }

    #[test]
    fn bit_length_matches_naive_scan_for_small_values() {
        for v in 1u64..=(1 << 16) {
            let naive = (0..64).rev().find(|&b| v & (1u64 << b) != 0).unwrap();
            assert_eq!(bit_length(v), naive as u32);
        }
    }
}
