//! Linear-light RGB.

use super::lut::srgb_to_linear;
use super::srgb::Srgb;

/// A color in linear RGB. Light adds linearly here, so overlay blending
/// and error diffusion are computed in this space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Composite `top` over `self` with the given opacity.
    ///
    /// `opacity` 0.0 returns `self`, 1.0 returns `top`.
    #[inline]
    pub fn blend_over(self, top: LinearRgb, opacity: f32) -> LinearRgb {
        let keep = 1.0 - opacity;
        LinearRgb {
            r: self.r * keep + top.r * opacity,
            g: self.g * keep + top.g * opacity,
            b: self.b * keep + top.b * opacity,
        }
    }
}

impl From<Srgb> for LinearRgb {
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb_to_linear(srgb.r),
            g: srgb_to_linear(srgb.g),
            b: srgb_to_linear(srgb.b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        let bottom = LinearRgb::new(0.2, 0.4, 0.6);
        let top = LinearRgb::new(1.0, 0.0, 0.5);
        assert_eq!(bottom.blend_over(top, 0.0), bottom);
        assert_eq!(bottom.blend_over(top, 1.0), top);
    }

    #[test]
    fn test_blend_half() {
        let black = LinearRgb::new(0.0, 0.0, 0.0);
        let white = LinearRgb::new(1.0, 1.0, 1.0);
        let mid = black.blend_over(white, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.5).abs() < 1e-6);
        assert!((mid.b - 0.5).abs() < 1e-6);
    }
}
