//! Image decoding into the converter's pixel buffer.

use crate::error::AppError;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use pixel_stacker::PixelBuffer;
use std::path::Path;

/// A decoded image ready for conversion.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub buffer: PixelBuffer,
    /// Dimensions as stored in the file, before any downscale.
    pub source_width: usize,
    pub source_height: usize,
}

impl LoadedImage {
    pub fn was_resized(&self) -> bool {
        self.buffer.width() != self.source_width || self.buffer.height() != self.source_height
    }
}

/// Largest size that fits `max_width` x `max_height` while keeping the aspect
/// ratio. Images are never enlarged.
pub fn fit_within(
    width: u32,
    height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> (u32, u32) {
    let mut scale = 1.0f64;
    if let Some(max) = max_width.filter(|&m| m > 0 && width > m) {
        scale = scale.min(max as f64 / width as f64);
    }
    if let Some(max) = max_height.filter(|&m| m > 0 && height > m) {
        scale = scale.min(max as f64 / height as f64);
    }
    if scale >= 1.0 {
        return (width, height);
    }
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Decode `path` and convert it to RGBA8, downscaling if limits are set.
pub fn load_image(
    path: &Path,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> Result<LoadedImage, AppError> {
    if !path.exists() {
        return Err(AppError::InputNotFound(path.to_path_buf()));
    }
    let decoded = image::open(path).map_err(|source| AppError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        "Decoded image"
    );
    from_rgba_image(decoded.to_rgba8(), max_width, max_height)
        .map_err(|e| AppError::io(path, e))
}

/// Wrap an already decoded image.
pub fn from_rgba_image(
    image: RgbaImage,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> std::io::Result<LoadedImage> {
    let (source_width, source_height) = image.dimensions();
    let (width, height) = fit_within(source_width, source_height, max_width, max_height);

    let image = if (width, height) != (source_width, source_height) {
        tracing::debug!(
            from = %format!("{source_width}x{source_height}"),
            to = %format!("{width}x{height}"),
            "Downscaling image"
        );
        imageops::resize(&image, width, height, FilterType::Lanczos3)
    } else {
        image
    };

    let buffer = PixelBuffer::from_rgba8(width as usize, height as usize, image.as_raw())
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "pixel data size mismatch")
        })?;

    Ok(LoadedImage {
        buffer,
        source_width: source_width as usize,
        source_height: source_height as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(100, 50, None, None), (100, 50));
        assert_eq!(fit_within(100, 50, Some(200), Some(200)), (100, 50));
        assert_eq!(fit_within(100, 50, Some(50), None), (50, 25));
        assert_eq!(fit_within(100, 50, Some(80), Some(10)), (20, 10));
        assert_eq!(fit_within(1000, 1, Some(10), None), (10, 1));
        assert_eq!(fit_within(100, 50, Some(0), None), (100, 50));
    }

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbaImage::from_pixel(8, 4, Rgba([200, 10, 10, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path, Some(4), None).unwrap();
        assert_eq!((loaded.buffer.width(), loaded.buffer.height()), (4, 2));
        assert_eq!((loaded.source_width, loaded.source_height), (8, 4));
        assert!(loaded.was_resized());
    }

    #[test]
    fn test_missing_file() {
        let err = load_image(Path::new("/nonexistent/a.png"), None, None).unwrap_err();
        assert!(matches!(err, AppError::InputNotFound(_)));
    }

    #[test]
    fn test_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(matches!(
            load_image(&path, None, None),
            Err(AppError::Decode { .. })
        ));
    }
}
