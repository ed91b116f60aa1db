//! 16.16 fixed-point helpers for the resampling inner loop.

/// One source bit of advance in 16.16 fixed point.
pub const ONE: u32 = 1 << 16;
/// Mask selecting the fractional field.
pub const FRAC_MASK: u32 = ONE - 1;

/// Converts a non-negative fractional offset, truncating toward zero.
///
/// Truncation loses up to one ulp of the float input; the resampler
/// accepts that as long as the value fits the 16-bit fractional field.
#[inline]
pub fn to_fixed(value: f32) -> u32 {
    (value * ONE as f32) as u32
}

/// Converts a per-row scale, rounding to nearest.
#[inline]
pub fn scale_to_fixed(scale: f32) -> u32 {
    libm::roundf(scale * ONE as f32) as u32
}

/// Whole-bit count carried in an accumulator.
#[inline]
pub const fn whole(fx: u32) -> u32 {
    fx >> 16
}
