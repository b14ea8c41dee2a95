//! `.schematic` bytes back to a canvas.

use std::io::Read;

use flate2::read::GzDecoder;

use super::format::{Layout, SchematicNbt, MATERIALS_ALPHA};
use super::ExportError;
use crate::palette::{MaterialIndex, MaterialPalette};
use crate::render::{Cell, RenderedCanvas};

/// A decoded schematic.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSchematic {
    pub canvas: RenderedCanvas,
    /// `None` for files without converter metadata.
    pub format_version: Option<i32>,
}

impl ParsedSchematic {
    #[inline]
    pub fn is_side_view(&self) -> bool {
        self.canvas.is_side_view()
    }

    #[inline]
    pub fn is_multi_layer(&self) -> bool {
        self.canvas.is_multi_layer()
    }
}

/// Rebuild the canvas stored in a gzip-compressed schematic.
///
/// Files without a `PixelStacker` compound are read as side view, with
/// multilayer inferred from a depth of two.
///
/// # Errors
///
/// - [`ExportError::Io`] / [`ExportError::Nbt`] for undecodable input
/// - [`ExportError::Format`] when dimensions and arrays disagree
/// - [`ExportError::UnknownBlock`] for blocks missing from `palette`
pub fn read_schematic(bytes: &[u8], palette: &MaterialPalette) -> Result<ParsedSchematic, ExportError> {
    let mut raw = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut raw)?;
    let nbt: SchematicNbt = fastnbt::from_bytes(&raw)?;

    if nbt.materials != MATERIALS_ALPHA {
        return Err(ExportError::Format(format!("unsupported materials: {}", nbt.materials)));
    }
    let [width, height, length] = [nbt.width, nbt.height, nbt.length].map(|v| v.max(0) as usize);
    if [nbt.width, nbt.height, nbt.length].iter().any(|&v| v < 0) {
        return Err(ExportError::Format("negative dimension".to_string()));
    }

    let (is_side_view, is_multi_layer, source) = match &nbt.pixel_stacker {
        Some(meta) => (
            meta.is_side_view,
            meta.is_multi_layer,
            Some((meta.source_width.max(0) as usize, meta.source_height.max(0) as usize)),
        ),
        None => (true, length == 2, None),
    };

    let layers = if is_multi_layer { 2 } else { 1 };
    let (canvas_height, depth) = if is_side_view { (height, length) } else { (length, height) };
    if depth != layers {
        return Err(ExportError::Format(format!(
            "expected {layers} layer(s), found depth {depth}"
        )));
    }

    let layout = Layout::new(width, canvas_height, is_side_view, layers);
    let volume = layout.volume();
    if nbt.blocks.len() != volume || nbt.data.len() != volume {
        return Err(ExportError::Format(format!(
            "expected {volume} blocks, found {} blocks and {} data values",
            nbt.blocks.len(),
            nbt.data.len()
        )));
    }

    let lookup = |index: usize| -> Result<MaterialIndex, ExportError> {
        let block = nbt.blocks[index] as u8;
        let data = nbt.data[index] as u8;
        palette
            .find_block(block, data)
            .ok_or(ExportError::UnknownBlock { block, data })
    };

    let mut cells = Vec::with_capacity(width * canvas_height);
    for row in 0..canvas_height {
        for x in 0..width {
            let solid = lookup(layout.solid_index(x, row))?;
            let overlay = match layout.overlay_index(x, row) {
                Some(index) => lookup(index)?,
                None => MaterialIndex::AIR,
            };
            cells.push(if overlay == MaterialIndex::AIR {
                Cell::Single(solid)
            } else {
                Cell::Layered {
                    bottom: solid,
                    top: overlay,
                }
            });
        }
    }

    let mut canvas = RenderedCanvas::new(width, canvas_height, cells, is_side_view, is_multi_layer)
        .ok_or_else(|| ExportError::Format("cell count mismatch".to_string()))?;
    if let Some((w, h)) = source {
        canvas = canvas.with_source_dimensions(w, h);
    }

    Ok(ParsedSchematic {
        canvas,
        format_version: nbt.pixel_stacker.map(|meta| meta.format_version),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use crate::options::Options;
    use crate::palette::Material;
    use crate::schematic::{ProjectData, SchematicExporter, FORMAT_VERSION};

    fn palette() -> MaterialPalette {
        MaterialPalette::new(vec![
            Material::solid("WHITE", 35, 0, Srgb::from_u8(255, 255, 255)),
            Material::solid("BLACK", 35, 15, Srgb::from_u8(0, 0, 0)),
            Material::overlay("GLASS_RED", 95, 14, Srgb::from_u8(153, 51, 51), 0.5),
        ])
        .unwrap()
    }

    #[test]
    fn test_round_trip_multilayer_side_view() {
        let p = palette();
        let white = p.index_of("WHITE").unwrap();
        let black = p.index_of("BLACK").unwrap();
        let glass = p.index_of("GLASS_RED").unwrap();
        let cells = vec![
            Cell::Layered { bottom: white, top: glass },
            Cell::Single(black),
            Cell::AIR,
            Cell::Layered { bottom: black, top: glass },
            Cell::Single(white),
            Cell::Single(white),
        ];
        let canvas = RenderedCanvas::new(3, 2, cells, true, true)
            .unwrap()
            .with_source_dimensions(30, 20);
        let options = Options::new().multi_layer(true);
        let bytes = SchematicExporter::to_bytes(&ProjectData::new(&canvas, &options, &p)).unwrap();

        let parsed = read_schematic(&bytes, &p).unwrap();
        assert_eq!(parsed.canvas, canvas);
        assert!(parsed.is_side_view());
        assert!(parsed.is_multi_layer());
        assert_eq!(parsed.format_version, Some(FORMAT_VERSION));
    }

    #[test]
    fn test_unknown_block() {
        let exported = palette();
        let white = exported.index_of("WHITE").unwrap();
        let canvas = RenderedCanvas::new(1, 1, vec![Cell::Single(white)], false, false).unwrap();
        let options = Options::new().side_view(false);
        let bytes = SchematicExporter::to_bytes(&ProjectData::new(&canvas, &options, &exported)).unwrap();

        let other = MaterialPalette::new(vec![Material::solid("STONE", 1, 0, Srgb::from_u8(1, 1, 1))]).unwrap();
        let err = read_schematic(&bytes, &other).unwrap_err();
        assert!(matches!(err, ExportError::UnknownBlock { block: 35, data: 0 }));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = read_schematic(b"definitely not gzip", &palette()).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
