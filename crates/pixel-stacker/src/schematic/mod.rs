//! MCEdit `.schematic` export and import.
//!
//! The file is a gzip-compressed NBT compound named `Schematic`:
//!
//! | Tag            | Type       | Content                                  |
//! |----------------|------------|------------------------------------------|
//! | `Width`        | short      | X extent                                 |
//! | `Height`       | short      | Y extent                                 |
//! | `Length`       | short      | Z extent                                 |
//! | `Materials`    | string     | always `Alpha`                           |
//! | `Blocks`       | byte array | legacy block ids, `(y * Length + z) * Width + x` |
//! | `Data`         | byte array | legacy data values, same order           |
//! | `Entities`     | list       | empty                                    |
//! | `TileEntities` | list       | empty                                    |
//! | `PixelStacker` | compound   | view mode, layering, source size, format version |
//!
//! In side view the image stands in the X/Y plane with its first row at the
//! top and layers run along Z, overlay in front. In top view the image lies
//! in the X/Z plane with its first row at `z = 0` and layers stack along Y,
//! overlay above.
//!
//! Output is deterministic: the gzip header carries no timestamp.

mod exporter;
mod format;
mod reader;

use std::io;

use crate::options::Options;
use crate::palette::MaterialPalette;
use crate::render::RenderedCanvas;

pub use exporter::SchematicExporter;
pub use format::FORMAT_VERSION;
pub use reader::{read_schematic, ParsedSchematic};

/// Everything the exporter needs: the finished canvas, the options that
/// produced it and the palette its cells index into.
#[derive(Debug, Clone, Copy)]
pub struct ProjectData<'a> {
    pub canvas: &'a RenderedCanvas,
    pub options: &'a Options,
    pub palette: &'a MaterialPalette,
}

impl<'a> ProjectData<'a> {
    pub fn new(canvas: &'a RenderedCanvas, options: &'a Options, palette: &'a MaterialPalette) -> Self {
        Self {
            canvas,
            options,
            palette,
        }
    }
}

/// Schematic encoding, decoding or persistence failure.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("NBT error: {0}")]
    Nbt(#[from] fastnbt::error::Error),

    #[error("canvas {width}x{height}x{depth} exceeds the schematic size limit of {max}", max = i16::MAX)]
    TooLarge {
        width: usize,
        height: usize,
        depth: usize,
    },

    #[error("malformed schematic: {0}")]
    Format(String),

    #[error("block {block}:{data} is not in the palette")]
    UnknownBlock { block: u8, data: u8 },
}
