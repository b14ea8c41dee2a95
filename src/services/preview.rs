//! PNG preview of a rendered canvas, one pixel per cell.

use crate::error::AppError;
use image::{ImageFormat, RgbaImage};
use pixel_stacker::{MaterialPalette, RenderedCanvas};
use std::path::Path;

pub fn preview_image(
    canvas: &RenderedCanvas,
    palette: &MaterialPalette,
) -> Result<RgbaImage, AppError> {
    let width = u32::try_from(canvas.width())
        .map_err(|_| AppError::Preview(format!("canvas width {} too large", canvas.width())))?;
    let height = u32::try_from(canvas.height())
        .map_err(|_| AppError::Preview(format!("canvas height {} too large", canvas.height())))?;
    RgbaImage::from_raw(width, height, canvas.to_rgba_preview(palette))
        .ok_or_else(|| AppError::Preview("preview buffer has the wrong size".to_string()))
}

/// Write the canvas as a PNG where each block shows its effective color.
pub fn write_preview(
    path: &Path,
    canvas: &RenderedCanvas,
    palette: &MaterialPalette,
) -> Result<(), AppError> {
    let image = preview_image(canvas, palette)?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| AppError::Preview(format!("{}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "Wrote preview");
    Ok(())
}
