//! Gamma curves backed by tables generated in build.rs.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

#[inline]
fn sample(table: &[f32; 4096], x: f32) -> f32 {
    let scaled = x.clamp(0.0, 1.0) * 4095.0;
    let index = scaled as usize;
    if index >= 4095 {
        return table[4095];
    }
    let frac = scaled - index as f32;
    table[index] + (table[index + 1] - table[index]) * frac
}

/// sRGB component to linear light. Input is clamped to `0.0..=1.0`.
#[inline]
pub(crate) fn srgb_to_linear(v: f32) -> f32 {
    sample(&DECODE, v)
}

/// Linear light to sRGB component. Input is clamped to `0.0..=1.0`.
#[inline]
pub(crate) fn linear_to_srgb(v: f32) -> f32 {
    sample(&ENCODE, v)
}
