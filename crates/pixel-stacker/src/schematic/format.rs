//! NBT layout of an MCEdit `.schematic` file.

use fastnbt::{ByteArray, Value};
use serde::{Deserialize, Serialize};

/// Name of the root compound.
pub(crate) const ROOT_NAME: &str = "Schematic";

/// Only legacy numeric block ids are written.
pub(crate) const MATERIALS_ALPHA: &str = "Alpha";

/// Bumped whenever the layout of the `PixelStacker` compound changes.
pub const FORMAT_VERSION: i32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SchematicNbt {
    pub width: i16,
    pub height: i16,
    pub length: i16,
    pub materials: String,
    pub blocks: ByteArray,
    pub data: ByteArray,
    pub entities: Vec<Value>,
    pub tile_entities: Vec<Value>,
    #[serde(rename = "PixelStacker", default, skip_serializing_if = "Option::is_none")]
    pub pixel_stacker: Option<PixelStackerNbt>,
}

/// Converter metadata needed to rebuild the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PixelStackerNbt {
    pub is_side_view: bool,
    pub is_multi_layer: bool,
    pub source_width: i32,
    pub source_height: i32,
    pub format_version: i32,
}

/// Position of a block inside the flattened `Blocks`/`Data` arrays.
#[inline]
pub(crate) fn block_index(x: usize, y: usize, z: usize, width: usize, length: usize) -> usize {
    (y * length + z) * width + x
}

/// Maps canvas coordinates to schematic coordinates for one view mode.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layout {
    pub width: usize,
    /// Schematic height (Y extent).
    pub height: usize,
    /// Schematic length (Z extent).
    pub length: usize,
    canvas_height: usize,
    is_side_view: bool,
    layers: usize,
}

impl Layout {
    pub(crate) fn new(canvas_width: usize, canvas_height: usize, is_side_view: bool, layers: usize) -> Self {
        let (height, length) = if is_side_view {
            (canvas_height, layers)
        } else {
            (layers, canvas_height)
        };
        Self {
            width: canvas_width,
            height,
            length,
            canvas_height,
            is_side_view,
            layers,
        }
    }

    #[inline]
    pub(crate) fn volume(&self) -> usize {
        self.width * self.height * self.length
    }

    /// Array index of the solid block behind canvas cell `(x, row)`.
    #[inline]
    pub(crate) fn solid_index(&self, x: usize, row: usize) -> usize {
        // Side view: overlay faces the viewer at z=0, solid behind it.
        let solid_depth = if self.is_side_view { self.layers - 1 } else { 0 };
        self.index(x, row, solid_depth)
    }

    /// Array index of the overlay slot, when the layout has one.
    #[inline]
    pub(crate) fn overlay_index(&self, x: usize, row: usize) -> Option<usize> {
        if self.layers < 2 {
            return None;
        }
        let depth = if self.is_side_view { 0 } else { 1 };
        Some(self.index(x, row, depth))
    }

    fn index(&self, x: usize, row: usize, depth: usize) -> usize {
        if self.is_side_view {
            let y = self.canvas_height - 1 - row;
            block_index(x, y, depth, self.width, self.length)
        } else {
            block_index(x, depth, row, self.width, self.length)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_view_flips_rows() {
        let layout = Layout::new(4, 3, true, 1);
        assert_eq!((layout.width, layout.height, layout.length), (4, 3, 1));
        // Top-left pixel lands at y = 2.
        assert_eq!(layout.solid_index(0, 0), block_index(0, 2, 0, 4, 1));
        assert_eq!(layout.solid_index(3, 2), block_index(3, 0, 0, 4, 1));
        assert_eq!(layout.overlay_index(0, 0), None);
    }

    #[test]
    fn test_side_view_layers_along_z() {
        let layout = Layout::new(2, 2, true, 2);
        assert_eq!(layout.overlay_index(1, 0), Some(block_index(1, 1, 0, 2, 2)));
        assert_eq!(layout.solid_index(1, 0), block_index(1, 1, 1, 2, 2));
    }

    #[test]
    fn test_top_view_layers_along_y() {
        let layout = Layout::new(3, 5, false, 2);
        assert_eq!((layout.width, layout.height, layout.length), (3, 2, 5));
        assert_eq!(layout.solid_index(2, 4), block_index(2, 0, 4, 3, 5));
        assert_eq!(layout.overlay_index(2, 4), Some(block_index(2, 1, 4, 3, 5)));
        assert_eq!(layout.volume(), 30);
    }
}
