//! Number conversions with the truncation rules of the source language.

/// Converts `value` with the ECMAScript `ToInt32` rules: truncate toward zero
/// and wrap modulo 2^32. NaN and infinities map to zero.
pub fn double_to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }

    let modulo = value.trunc().rem_euclid(4_294_967_296.0);
    if modulo >= 2_147_483_648.0 {
        (modulo - 4_294_967_296.0) as i32
    } else {
        modulo as i32
    }
}

/// Converts `value` with the ECMAScript `ToUint32` rules.
pub fn double_to_uint32(value: f64) -> u32 {
    double_to_int32(value) as u32
}

/// Truncating conversion for values already known to fit in an `i32`.
#[inline]
pub fn fast_d2i(value: f64) -> i32 {
    value as i32
}

/// Truncating conversion for values already known to fit in a `u32`.
#[inline]
pub fn fast_d2ui(value: f64) -> u32 {
    value as u32
}

#[inline]
pub fn fast_ui2d(value: u32) -> f64 {
    value as f64
}

#[inline]
pub fn is_minus_zero(value: f64) -> bool {
    value == 0.0 && value.is_sign_negative()
}

/// Returns `true` if `value` is exactly representable as an `i32`.
pub fn is_int32_double(value: f64) -> bool {
    if is_minus_zero(value) {
        return false;
    }
    value >= i32::MIN as f64 && value <= i32::MAX as f64 && value == fast_d2i(value) as f64
}

/// Returns `true` if `value` is exactly representable as a `u32`.
pub fn is_uint32_double(value: f64) -> bool {
    if is_minus_zero(value) {
        return false;
    }
    value >= 0.0 && value <= u32::MAX as f64 && value == fast_ui2d(fast_d2ui(value))
}
