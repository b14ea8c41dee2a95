//! Fixed bit-depth channel reduction.

/// Reduce one channel to `bits` significant bits, re-expanded to the centre
/// of its bucket so the mean brightness is preserved.
#[inline]
pub(crate) fn posterize_channel(value: u8, bits: u8) -> u8 {
    let bits = bits.clamp(1, 8);
    if bits == 8 {
        return value;
    }
    let shift = 8 - bits;
    let bucket = (value >> shift) << shift;
    bucket | ((1u8 << shift) >> 1)
}

#[inline]
pub(crate) fn posterize_rgb(rgb: [u8; 3], bits: u8) -> [u8; 3] {
    rgb.map(|c| posterize_channel(c, bits))
}
