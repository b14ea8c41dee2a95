//! The rendered block grid.

use std::collections::BTreeMap;

use crate::color::{LinearRgb, Srgb};
use crate::palette::{Combination, MaterialIndex, MaterialPalette};

/// One grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Single(MaterialIndex),
    /// A solid with a translucent overlay in front of (side view) or above
    /// (top view) it.
    Layered {
        bottom: MaterialIndex,
        top: MaterialIndex,
    },
}

impl Cell {
    pub const AIR: Cell = Cell::Single(MaterialIndex::AIR);

    #[inline]
    pub fn bottom(self) -> MaterialIndex {
        match self {
            Cell::Single(m) => m,
            Cell::Layered { bottom, .. } => bottom,
        }
    }

    /// The overlay, if any.
    #[inline]
    pub fn overlay(self) -> Option<MaterialIndex> {
        match self {
            Cell::Single(_) => None,
            Cell::Layered { top, .. } => Some(top),
        }
    }
}

impl From<Combination> for Cell {
    fn from(combo: Combination) -> Self {
        if combo.is_layered() {
            Cell::Layered {
                bottom: combo.bottom,
                top: combo.top,
            }
        } else {
            Cell::Single(combo.bottom)
        }
    }
}

/// A fully populated `width x height` grid of cells, row-major, row 0 at
/// the top of the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCanvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    source_width: usize,
    source_height: usize,
    is_multi_layer: bool,
    is_side_view: bool,
}

impl RenderedCanvas {
    /// Returns `None` when `cells.len() != width * height`.
    pub fn new(
        width: usize,
        height: usize,
        cells: Vec<Cell>,
        is_side_view: bool,
        is_multi_layer: bool,
    ) -> Option<Self> {
        if width.checked_mul(height)? != cells.len() {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
            source_width: width,
            source_height: height,
            is_multi_layer,
            is_side_view,
        })
    }

    /// Record the size of the image before any upstream downscaling.
    pub fn with_source_dimensions(mut self, width: usize, height: usize) -> Self {
        self.source_width = width;
        self.source_height = height;
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn source_width(&self) -> usize {
        self.source_width
    }

    #[inline]
    pub fn source_height(&self) -> usize {
        self.source_height
    }

    #[inline]
    pub fn is_multi_layer(&self) -> bool {
        self.is_multi_layer
    }

    #[inline]
    pub fn is_side_view(&self) -> bool {
        self.is_side_view
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }

    /// Whether any cell carries an overlay.
    pub fn has_overlays(&self) -> bool {
        self.cells.iter().any(|c| c.overlay().is_some())
    }

    /// Bill of materials: blocks placed per material id, air excluded.
    pub fn material_counts(&self, palette: &MaterialPalette) -> BTreeMap<String, usize> {
        let mut by_index: BTreeMap<MaterialIndex, usize> = BTreeMap::new();
        for cell in &self.cells {
            *by_index.entry(cell.bottom()).or_default() += 1;
            if let Some(top) = cell.overlay() {
                *by_index.entry(top).or_default() += 1;
            }
        }
        by_index
            .into_iter()
            .filter(|(index, _)| !palette.get(*index).is_air())
            .map(|(index, n)| (palette.get(index).id.clone(), n))
            .collect()
    }

    /// RGBA8 bytes showing how the canvas reads in its view mode.
    ///
    /// Air cells are fully transparent.
    pub fn to_rgba_preview(&self, palette: &MaterialPalette) -> Vec<u8> {
        let side = self.is_side_view;
        let mut out = Vec::with_capacity(self.cells.len() * 4);
        for cell in &self.cells {
            let color = match *cell {
                Cell::Single(m) if palette.get(m).is_air() => {
                    out.extend_from_slice(&[0, 0, 0, 0]);
                    continue;
                }
                Cell::Single(m) => palette.get(m).color(side),
                Cell::Layered { bottom, top } => {
                    let overlay = palette.get(top);
                    let base = LinearRgb::from(palette.get(bottom).color(side));
                    Srgb::from(base.blend_over(LinearRgb::from(overlay.color(side)), overlay.opacity))
                }
            };
            out.extend_from_slice(&color.to_bytes());
            out.push(255);
        }
        out
    }
}
