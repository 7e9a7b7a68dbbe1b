//! Slot-count policies
//!
//! A raw hash code is 31 bits wide. Dividing it by a compression factor
//! shrinks the slot domain to `(i32::MAX / factor) + 1` slots: a larger factor
//! means fewer slots and longer chains, a smaller one the opposite.

use std::fmt;

/// Choose a compression factor from the expected record count
pub trait SlotCountPolicy: fmt::Debug + Send + Sync {
    fn compression_factor(&self, expected_capacity: u64) -> u32;
}

/// Number of slots for a given compression factor
pub fn slot_count(compression_factor: u32) -> usize {
    (i32::MAX as u32 / compression_factor.max(1)) as usize + 1
}

/// Three-regime schedule sized from expected load:
///
/// - below 1.1M records: 36000
/// - above 20M records: 189
/// - in between: `6000 / ((capacity / 1000) - 1000) * 600`
#[derive(Debug, Clone, Copy, Default)]
pub struct TieredCompression;

impl TieredCompression {
    pub const SMALL_CAPACITY: u64 = 1_100_000;
    pub const LARGE_CAPACITY: u64 = 20_000_000;
    pub const SMALL_FACTOR: u32 = 36_000;
    pub const LARGE_FACTOR: u32 = 189;
}

impl SlotCountPolicy for TieredCompression {
    fn compression_factor(&self, expected_capacity: u64) -> u32 {
        if expected_capacity < Self::SMALL_CAPACITY {
            Self::SMALL_FACTOR
        } else if expected_capacity > Self::LARGE_CAPACITY {
            Self::LARGE_FACTOR
        } else {
            let thousands = expected_capacity as f64 / 1000.0 - 1000.0;
            let factor = 6000.0 / thousands * 600.0;
            (factor as u32).max(1)
        }
    }
}

/// Constant factor, for tests and tuning
#[derive(Debug, Clone, Copy)]
pub struct FixedCompression(pub u32);

impl SlotCountPolicy for FixedCompression {
    fn compression_factor(&self, _expected_capacity: u64) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiered_regimes() {
        let policy = TieredCompression;
        assert_eq!(policy.compression_factor(0), 36_000);
        assert_eq!(policy.compression_factor(1_099_999), 36_000);
        assert_eq!(policy.compression_factor(20_000_001), 189);
        assert_eq!(policy.compression_factor(u64::MAX), 189);
    }

    #[test]
    fn test_tiered_interpolation() {
        let policy = TieredCompression;
        assert_eq!(policy.compression_factor(1_100_000), 36_000);
        assert_eq!(policy.compression_factor(2_000_000), 3_600);
        assert_eq!(policy.compression_factor(7_000_000), 600);
        assert_eq!(policy.compression_factor(20_000_000), 189);
    }

    #[test]
    fn test_slot_count() {
        assert_eq!(slot_count(1), 1 << 31);
        assert_eq!(slot_count(36_000), 59_653);
        assert_eq!(slot_count(0), 1 << 31);
    }

    #[test]
    fn test_fixed() {
        assert_eq!(FixedCompression(7).compression_factor(123), 7);
    }
}
