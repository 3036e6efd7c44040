//! Bit manipulation helpers shared by the whole backend.
//!
//! All functions are total over their input width. `count_leading_zeros_*` and
//! `count_trailing_zeros_*` return the bit width for a zero input.

/// Returns the number of set bits in `value`.
#[inline]
pub fn count_population_32(value: u32) -> u32 {
    value.count_ones()
}

#[inline]
pub fn count_population_64(value: u64) -> u32 {
    value.count_ones()
}

/// Returns the number of zero bits above the most significant set bit, or 32
/// if `value` is zero.
#[inline]
pub fn count_leading_zeros_32(value: u32) -> u32 {
    value.leading_zeros()
}

#[inline]
pub fn count_leading_zeros_64(value: u64) -> u32 {
    value.leading_zeros()
}

/// Returns the number of zero bits below the least significant set bit, or 32
/// if `value` is zero.
#[inline]
pub fn count_trailing_zeros_32(value: u32) -> u32 {
    value.trailing_zeros()
}

#[inline]
pub fn count_trailing_zeros_64(value: u64) -> u32 {
    value.trailing_zeros()
}

/// Returns `true` iff exactly one bit of `value` is set. Zero is not a power of
/// two.
#[inline]
pub fn is_power_of_two_32(value: u32) -> bool {
    value != 0 && value & (value - 1) == 0
}

#[inline]
pub fn is_power_of_two_64(value: u64) -> bool {
    value != 0 && value & (value - 1) == 0
}

/// Returns the smallest power of two greater than or equal to `value`.
///
/// `value` must not exceed `0x8000_0000`. A zero input yields zero.
pub fn round_up_to_power_of_two_32(value: u32) -> u32 {
    debug_assert!(value <= 0x8000_0000, "{value:#x} has no 32-bit power of two above it");
    let mut value = value.wrapping_sub(1);
    value |= value >> 1;
    value |= value >> 2;
    value |= value >> 4;
    value |= value >> 8;
    value |= value >> 16;
    value.wrapping_add(1)
}

/// Returns the greatest power of two less than or equal to `value`.
pub fn round_down_to_power_of_two_32(value: u32) -> u32 {
    if value > 0x8000_0000 {
        return 0x8000_0000;
    }
    let result = round_up_to_power_of_two_32(value);
    if result > value {
        result >> 1
    } else {
        result
    }
}

#[inline]
pub fn rotate_right_32(value: u32, shift: u32) -> u32 {
    if shift == 0 {
        return value;
    }
    (value >> shift) | (value << (32 - shift))
}

#[inline]
pub fn rotate_right_64(value: u64, shift: u64) -> u64 {
    if shift == 0 {
        return value;
    }
    (value >> shift) | (value << (64 - shift))
}
