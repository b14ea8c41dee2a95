//! Unified error type for the conversion API.

use crate::mapper::MapperError;
use crate::palette::PaletteError;
use crate::render::RenderError;
use crate::schematic::ExportError;

/// Everything [`Converter`](super::Converter) can fail with.
///
/// Each pipeline stage keeps its own error enum; this one wraps them for
/// `?` propagation in application code.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pixel_stacker::{ConvertError, Converter, MaterialPalette, Options, PixelBuffer};
///
/// fn convert(palette: Arc<MaterialPalette>, image: &PixelBuffer) -> Result<Vec<u8>, ConvertError> {
///     let converter = Converter::new(palette, Options::new())?;
///     converter.convert(image)
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The palette offers nothing to map onto under the requested options.
    #[error("configuration error: {0}")]
    Configuration(#[from] PaletteError),

    #[error("color mapper is not seeded")]
    NotSeeded,

    #[error("render failed: {0}")]
    Render(RenderError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

impl From<RenderError> for ConvertError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::NotSeeded => ConvertError::NotSeeded,
            other => ConvertError::Render(other),
        }
    }
}

impl From<MapperError> for ConvertError {
    fn from(err: MapperError) -> Self {
        match err {
            MapperError::NotSeeded => ConvertError::NotSeeded,
        }
    }
}
