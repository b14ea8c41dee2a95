//! A single placeable block type.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;

/// How a material may be used on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialLayer {
    /// Opaque block that can stand alone or sit under an overlay.
    #[default]
    Solid,
    /// Translucent block (stained glass) only placed on top of a solid.
    Overlay,
    /// Empty space, used for transparent pixels and never matched.
    Air,
}

/// Position of a material inside its [`MaterialPalette`](super::MaterialPalette).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialIndex(pub(crate) u16);

impl MaterialIndex {
    /// Air always sits at index 0.
    pub const AIR: MaterialIndex = MaterialIndex(0);

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// A block type with its representative colors.
///
/// `block_id`/`data` are the legacy numeric identifiers written into
/// `.schematic` files; `name` is the namespaced block name used by newer
/// tooling.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Stable identifier, e.g. `WOOL_14`.
    pub id: String,
    pub label: String,
    pub block_id: u8,
    pub data: u8,
    pub name: String,
    /// Average color of the top face texture.
    pub top_color: Srgb,
    /// Average color of the side face texture.
    pub side_color: Srgb,
    pub layer: MaterialLayer,
    /// Coverage of an overlay when composited over a solid.
    pub opacity: f32,
    pub enabled: bool,
}

impl Material {
    /// An opaque material with the same color on every face.
    pub fn solid(id: &str, block_id: u8, data: u8, color: Srgb) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            block_id,
            data,
            name: format!("legacy:{block_id}_{data}"),
            top_color: color,
            side_color: color,
            layer: MaterialLayer::Solid,
            opacity: 1.0,
            enabled: true,
        }
    }

    /// A translucent material that only appears on top of a solid.
    pub fn overlay(id: &str, block_id: u8, data: u8, color: Srgb, opacity: f32) -> Self {
        Self {
            layer: MaterialLayer::Overlay,
            opacity,
            ..Self::solid(id, block_id, data, color)
        }
    }

    /// The empty block.
    pub fn air() -> Self {
        Self {
            id: "AIR".to_string(),
            label: "Air".to_string(),
            block_id: 0,
            data: 0,
            name: "minecraft:air".to_string(),
            top_color: Srgb::new(0.0, 0.0, 0.0),
            side_color: Srgb::new(0.0, 0.0, 0.0),
            layer: MaterialLayer::Air,
            opacity: 0.0,
            enabled: true,
        }
    }

    /// Override the side-face color.
    pub fn with_side_color(mut self, color: Srgb) -> Self {
        self.side_color = color;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Color this material presents in the given view mode.
    #[inline]
    pub fn color(&self, is_side_view: bool) -> Srgb {
        if is_side_view {
            self.side_color
        } else {
            self.top_color
        }
    }

    #[inline]
    pub fn is_air(&self) -> bool {
        self.layer == MaterialLayer::Air
    }

    /// May fill the bottom slot of a combination.
    #[inline]
    pub fn is_eligible_solid(&self) -> bool {
        self.enabled && self.layer == MaterialLayer::Solid
    }

    /// May fill the top slot of a layered combination.
    #[inline]
    pub fn is_eligible_overlay(&self) -> bool {
        self.enabled && self.layer == MaterialLayer::Overlay
    }
}
