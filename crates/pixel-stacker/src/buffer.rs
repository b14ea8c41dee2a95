//! In-memory pixel buffer handed over by the image source.

use crate::color::Rgba;

/// Row-major RGBA pixels with explicit dimensions.
///
/// Every pipeline stage produces a new buffer rather than mutating its
/// input, so a loaded image can be converted several times with different
/// options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Wrap existing pixels.
    ///
    /// Returns `None` when `pixels.len() != width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgba>) -> Option<Self> {
        if width.checked_mul(height)? != pixels.len() {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A buffer filled with one color.
    pub fn filled(width: usize, height: usize, pixel: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width * height],
        }
    }

    /// Build from tightly packed RGBA8 bytes (the layout `image::RgbaImage` uses).
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Option<Self> {
        if width.checked_mul(height)?.checked_mul(4)? != bytes.len() {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
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
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    /// Pixels of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[Rgba] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Apply a per-pixel transform, keeping the dimensions.
    pub fn map_pixels(&self, f: impl Fn(Rgba) -> Rgba) -> PixelBuffer {
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&p| f(p)).collect(),
        }
    }

    pub(crate) fn with_pixels(&self, pixels: Vec<Rgba>) -> PixelBuffer {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}
