//! Sizing policy: initial capacity, load factor and growth factor.

/// Number of buckets in a freshly constructed map.
pub const DEFAULT_CAPACITY: usize = 16;

/// Load factor expressed as a fraction (3/4) so thresholds stay integral.
pub const LOAD_FACTOR_NUM: usize = 3;
pub const LOAD_FACTOR_DEN: usize = 4;

/// Capacity multiplier applied on every resize.
pub const GROWTH_FACTOR: usize = 2;

/// Size at which the next insert grows the table: `floor(capacity * 0.75)`.
#[inline]
pub const fn threshold_for(capacity: usize) -> usize {
    // Split to avoid overflowing `capacity * LOAD_FACTOR_NUM` near usize::MAX.
    capacity / LOAD_FACTOR_DEN * LOAD_FACTOR_NUM
        + capacity % LOAD_FACTOR_DEN * LOAD_FACTOR_NUM / LOAD_FACTOR_DEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_is_twelve() {
        assert_eq!(threshold_for(DEFAULT_CAPACITY), 12);
    }

    /// Thresholds floor like `(capacity as f32 * 0.75) as usize`.
    #[test]
    fn threshold_floors_for_small_capacities() {
        assert_eq!(threshold_for(1), 0);
        assert_eq!(threshold_for(2), 1);
        assert_eq!(threshold_for(3), 2);
        assert_eq!(threshold_for(5), 3);
        assert_eq!(threshold_for(32), 24);
        assert_eq!(threshold_for(1 << 20), 786_432);
    }
}
