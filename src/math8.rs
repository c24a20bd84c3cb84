/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// A factor of 255 leaves the value unchanged, 0 yields black.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Type alias for a function that adjusts a u8 value
pub type U8Adjuster = fn(value: u8) -> u8;
