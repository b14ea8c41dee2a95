//! One mappable color target: a solid alone, or a solid under an overlay.

use crate::color::{LinearRgb, Srgb};

use super::material::{Material, MaterialIndex};

/// Brightness the game applies to north/south block faces.
pub const SIDE_FACE_SHADE: f32 = 0.8;

/// A mapping target with its precomputed effective color.
///
/// Single-material entries reference the same material in both slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combination {
    pub bottom: MaterialIndex,
    pub top: MaterialIndex,
    /// What the pairing looks like in the active view mode.
    pub color: Srgb,
}

impl Combination {
    pub(crate) fn single(index: MaterialIndex, material: &Material, is_side_view: bool) -> Self {
        Self {
            bottom: index,
            top: index,
            color: material.color(is_side_view),
        }
    }

    /// Composite `overlay` over `solid` in linear light.
    pub(crate) fn layered(
        solid_index: MaterialIndex,
        solid: &Material,
        overlay_index: MaterialIndex,
        overlay: &Material,
        is_side_view: bool,
    ) -> Self {
        let bottom = LinearRgb::from(solid.color(is_side_view));
        let top = LinearRgb::from(overlay.color(is_side_view));
        Self {
            bottom: solid_index,
            top: overlay_index,
            color: Srgb::from(bottom.blend_over(top, overlay.opacity)),
        }
    }

    /// Darken the effective color by `factor`, as the game lights the face.
    pub(crate) fn shaded(self, factor: f32) -> Self {
        let c = self.color;
        Self {
            color: Srgb::new(c.r * factor, c.g * factor, c.b * factor),
            ..self
        }
    }

    /// True when two different materials are stacked.
    #[inline]
    pub fn is_layered(&self) -> bool {
        self.bottom != self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_is_not_layered() {
        let red = Material::solid("RED", 35, 14, Srgb::from_u8(160, 39, 34));
        let combo = Combination::single(MaterialIndex(3), &red, true);
        assert!(!combo.is_layered());
        assert_eq!(combo.bottom, combo.top);
        assert_eq!(combo.color.to_bytes(), [160, 39, 34]);
    }

    #[test]
    fn test_layered_color_lies_between_inputs() {
        let white = Material::solid("WHITE", 35, 0, Srgb::from_u8(255, 255, 255));
        let black_glass = Material::overlay("GLASS_15", 95, 15, Srgb::from_u8(0, 0, 0), 0.5);
        let combo = Combination::layered(MaterialIndex(1), &white, MaterialIndex(2), &black_glass, false);

        assert!(combo.is_layered());
        let [r, g, b] = combo.color.to_bytes();
        assert_eq!(r, g);
        assert_eq!(g, b);
        // Half coverage in linear light encodes to roughly sRGB 188.
        assert!((180..=195).contains(&r), "got {r}");
    }

    #[test]
    fn test_shading_keeps_materials() {
        let red = Material::solid("RED", 35, 14, Srgb::from_u8(160, 40, 35));
        let combo = Combination::single(MaterialIndex(3), &red, true).shaded(SIDE_FACE_SHADE);
        assert_eq!(combo.bottom, MaterialIndex(3));
        assert_eq!(combo.color.to_bytes(), [128, 32, 28]);
    }

    #[test]
    fn test_layered_color_is_deterministic() {
        let solid = Material::solid("S", 1, 0, Srgb::from_u8(12, 200, 77));
        let glass = Material::overlay("G", 95, 3, Srgb::from_u8(102, 153, 216), 0.45);
        let a = Combination::layered(MaterialIndex(1), &solid, MaterialIndex(2), &glass, true);
        let b = Combination::layered(MaterialIndex(1), &solid, MaterialIndex(2), &glass, true);
        assert_eq!(a.color.r.to_bits(), b.color.r.to_bits());
        assert_eq!(a.color.g.to_bits(), b.color.g.to_bits());
        assert_eq!(a.color.b.to_bits(), b.color.b.to_bits());
    }
}
