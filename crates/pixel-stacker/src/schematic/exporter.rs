//! Canvas to `.schematic` bytes.

use std::io::Write;
use std::path::Path;

use fastnbt::{ByteArray, SerOpts};
use flate2::{Compression, GzBuilder};
use tempfile::NamedTempFile;

use super::format::{Layout, PixelStackerNbt, SchematicNbt, FORMAT_VERSION, MATERIALS_ALPHA, ROOT_NAME};
use super::{ExportError, ProjectData};
use crate::palette::{Material, MaterialIndex, MaterialPalette};
use crate::render::RenderedCanvas;

/// Serializes rendered canvases.
pub struct SchematicExporter;

impl SchematicExporter {
    /// Encode `project` as gzip-compressed NBT.
    ///
    /// # Errors
    ///
    /// - [`ExportError::TooLarge`] when any dimension exceeds `i16::MAX`
    /// - [`ExportError::Format`] when the options disagree with the canvas
    ///   about view mode or layering, or a cell names a material the
    ///   palette does not have
    pub fn to_bytes(project: &ProjectData<'_>) -> Result<Vec<u8>, ExportError> {
        let nbt = build_nbt(project)?;
        let raw = fastnbt::to_bytes_with_opts(&nbt, SerOpts::new().root_name(ROOT_NAME))?;

        let mut encoder = GzBuilder::new().mtime(0).write(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        let bytes = encoder.finish()?;

        tracing::debug!(
            width = nbt.width,
            height = nbt.height,
            length = nbt.length,
            nbt_bytes = raw.len(),
            gzip_bytes = bytes.len(),
            "Schematic encoded"
        );
        Ok(bytes)
    }

    /// Encode `project` and publish it at `path` atomically.
    ///
    /// The bytes go to a temporary file next to `path`, which is synced and
    /// then renamed over the destination. On failure an existing file at
    /// `path` is left untouched.
    pub fn export(path: &Path, project: &ProjectData<'_>) -> Result<(), ExportError> {
        let bytes = Self::to_bytes(project)?;
        write_atomic(path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Schematic written");
        Ok(())
    }
}

/// Replace `path` with `bytes` via a synced temp file in the same directory.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;
    Ok(())
}

fn checked_i16(value: usize, canvas: &RenderedCanvas, depth: usize) -> Result<i16, ExportError> {
    i16::try_from(value).map_err(|_| ExportError::TooLarge {
        width: canvas.width(),
        height: canvas.height(),
        depth,
    })
}

fn check_options(project: &ProjectData<'_>) -> Result<(), ExportError> {
    let (options, canvas) = (project.options, project.canvas);
    if options.is_side_view != canvas.is_side_view() {
        return Err(ExportError::Format(format!(
            "options request side_view={} but the canvas was rendered with side_view={}",
            options.is_side_view,
            canvas.is_side_view()
        )));
    }
    if options.is_multi_layer != canvas.is_multi_layer() {
        return Err(ExportError::Format(format!(
            "options request multi_layer={} but the canvas was rendered with multi_layer={}",
            options.is_multi_layer,
            canvas.is_multi_layer()
        )));
    }
    Ok(())
}

fn lookup(palette: &MaterialPalette, index: MaterialIndex) -> Result<&Material, ExportError> {
    if !palette.contains(index) {
        return Err(ExportError::Format(format!(
            "cell references material #{} but the palette has {} entries",
            index.get(),
            palette.len()
        )));
    }
    Ok(palette.get(index))
}

fn build_nbt(project: &ProjectData<'_>) -> Result<SchematicNbt, ExportError> {
    check_options(project)?;
    let (canvas, palette) = (project.canvas, project.palette);

    let layers = if canvas.is_multi_layer() { 2 } else { 1 };
    let layout = Layout::new(canvas.width(), canvas.height(), canvas.is_side_view(), layers);

    let width = checked_i16(layout.width, canvas, layers)?;
    let height = checked_i16(layout.height, canvas, layers)?;
    let length = checked_i16(layout.length, canvas, layers)?;

    // Air is block 0 data 0, so untouched slots need no write.
    let mut blocks = vec![0i8; layout.volume()];
    let mut data = vec![0i8; layout.volume()];
    let mut put = |index: usize, material: MaterialIndex| -> Result<(), ExportError> {
        let m = lookup(palette, material)?;
        blocks[index] = m.block_id as i8;
        data[index] = m.data as i8;
        Ok(())
    };

    for row in 0..canvas.height() {
        for x in 0..canvas.width() {
            let cell = canvas.get(x, row);
            put(layout.solid_index(x, row), cell.bottom())?;
            if let Some(top) = cell.overlay() {
                let index = layout.overlay_index(x, row).ok_or_else(|| {
                    ExportError::Format("layered cell in a single-layer canvas".to_string())
                })?;
                put(index, top)?;
            }
        }
    }

    Ok(SchematicNbt {
        width,
        height,
        length,
        materials: MATERIALS_ALPHA.to_string(),
        blocks: ByteArray::new(blocks),
        data: ByteArray::new(data),
        entities: Vec::new(),
        tile_entities: Vec::new(),
        pixel_stacker: Some(PixelStackerNbt {
            is_side_view: canvas.is_side_view(),
            is_multi_layer: canvas.is_multi_layer(),
            source_width: i32::try_from(canvas.source_width()).unwrap_or(i32::MAX),
            source_height: i32::try_from(canvas.source_height()).unwrap_or(i32::MAX),
            format_version: FORMAT_VERSION,
        }),
    })
}
