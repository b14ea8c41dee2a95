//! Single-image conversion: decode, render, export, optional preview.

use crate::error::AppError;
use crate::services::image_loader::{load_image, LoadedImage};
use crate::services::preview::write_preview;
use pixel_stacker::Converter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Downscale limits applied before conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeLimits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

/// What one conversion produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    pub source_width: usize,
    pub source_height: usize,
    pub multi_layer: bool,
    pub side_view: bool,
    /// Blocks placed per material id.
    pub materials: BTreeMap<String, usize>,
    pub bytes: usize,
    pub elapsed_ms: u64,
}

impl ConversionReport {
    pub fn block_count(&self) -> usize {
        self.materials.values().sum()
    }
}

/// Decode `input`, convert it and write the schematic to `output`.
pub fn convert_file(
    converter: &Converter,
    input: &Path,
    output: &Path,
    limits: SizeLimits,
    preview: Option<&Path>,
) -> Result<ConversionReport, AppError> {
    let loaded = load_image(input, limits.max_width, limits.max_height)?;
    convert_loaded(converter, input, &loaded, output, preview)
}

/// Convert an already decoded image.
pub fn convert_loaded(
    converter: &Converter,
    input: &Path,
    loaded: &LoadedImage,
    output: &Path,
    preview: Option<&Path>,
) -> Result<ConversionReport, AppError> {
    let started = Instant::now();

    let canvas = converter
        .render(&loaded.buffer)?
        .with_source_dimensions(loaded.source_width, loaded.source_height);
    converter.export_to_file(&canvas, output)?;
    let bytes = std::fs::metadata(output)
        .map_err(|e| AppError::io(output, e))?
        .len() as usize;
    tracing::debug!(path = %output.display(), bytes, "Wrote schematic");

    if let Some(path) = preview {
        write_preview(path, &canvas, converter.palette())?;
    }

    let report = ConversionReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        width: canvas.width(),
        height: canvas.height(),
        source_width: loaded.source_width,
        source_height: loaded.source_height,
        multi_layer: canvas.is_multi_layer(),
        side_view: canvas.is_side_view(),
        materials: canvas.material_counts(converter.palette()),
        bytes,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        size = %format!("{}x{}", report.width, report.height),
        resized = loaded.was_resized(),
        blocks = report.block_count(),
        materials = report.materials.len(),
        elapsed_ms = report.elapsed_ms,
        "Converted image"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use pixel_stacker::{read_schematic, Material, MaterialPalette, Options, Srgb};
    use std::sync::Arc;

    fn converter() -> Converter {
        let palette = MaterialPalette::new(vec![
            Material::solid("RED", 35, 14, Srgb::from_u8(160, 39, 34)),
            Material::solid("WHITE", 35, 0, Srgb::from_u8(233, 236, 236)),
        ])
        .unwrap();
        Converter::new(Arc::new(palette), Options::new().side_view(false)).unwrap()
    }

    #[test]
    fn test_convert_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("red.png");
        let output = dir.path().join("red.schematic");
        RgbaImage::from_pixel(6, 4, Rgba([160, 39, 34, 255]))
            .save(&input)
            .unwrap();

        let converter = converter();
        let limits = SizeLimits {
            max_width: Some(3),
            max_height: None,
        };
        let report = convert_file(&converter, &input, &output, limits, None).unwrap();
        assert_eq!((report.width, report.height), (3, 2));
        assert_eq!((report.source_width, report.source_height), (6, 4));
        assert_eq!(report.materials.get("RED"), Some(&6));
        assert_eq!(report.block_count(), 6);

        let written = std::fs::read(&output).unwrap();
        assert_eq!(written.len(), report.bytes);
        let parsed = read_schematic(&written, converter.palette()).unwrap();
        assert_eq!(parsed.canvas.source_width(), 6);
        assert!(!parsed.is_side_view());
    }
}
