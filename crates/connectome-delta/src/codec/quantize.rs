//! Scalar quantization.
//!
//! `q = clamp(round_half_away(value × scale))`, `value' = q / scale`. Inside
//! the representable range the round-trip error is at most `1 / (2 × scale)`.

#[inline]
pub fn quantize_i16(value: f64, scale: f64) -> i16 {
    (value * scale)
        .round()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

#[inline]
pub fn quantize_i8(value: f64, scale: f64) -> i8 {
    (value * scale)
        .round()
        .clamp(i8::MIN as f64, i8::MAX as f64) as i8
}

#[inline]
pub fn dequantize_i16(q: i16, scale: f64) -> f64 {
    q as f64 / scale
}

#[inline]
pub fn dequantize_i8(q: i8, scale: f64) -> f64 {
    q as f64 / scale
}

/// Worst-case round-trip error for an in-range value.
#[inline]
pub fn max_error(scale: f64) -> f64 {
    1.0 / (2.0 * scale)
}
