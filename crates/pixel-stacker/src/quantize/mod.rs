//! Optional color reduction ahead of material mapping.
//!
//! Reducing the number of distinct colors trades fidelity for flatter,
//! more readable block art and fewer mapper queries per distinct color.
//!
//! Two algorithms are available:
//!
//! - [`QuantizerAlgorithm::MedianCut`]: builds an adaptive palette of at most
//!   `max_colors` entries from the opaque pixels, then snaps every opaque
//!   pixel to its nearest entry.
//! - [`QuantizerAlgorithm::Posterize`]: keeps the top `bits` of each channel.
//!
//! Either can diffuse the remapping error with Floyd-Steinberg when
//! `dither` is set. Transparent pixels are never touched and dimensions never
//! change.
//!
//! ```
//! use pixel_stacker::{PixelBuffer, Quantizer, QuantizerSettings, Rgba};
//!
//! let image = PixelBuffer::filled(4, 4, Rgba::opaque(13, 77, 201));
//! let settings = QuantizerSettings::new().enabled(true).max_colors(8);
//! let out = Quantizer::apply(&image, &settings);
//! assert_eq!(out, image);
//! ```

mod diffusion;
mod median_cut;
mod posterize;
mod settings;

use std::collections::HashMap;

use crate::buffer::PixelBuffer;
use crate::color::Rgba;

pub use settings::{QuantizerAlgorithm, QuantizerSettings};

/// Stateless entry point for color reduction.
pub struct Quantizer;

impl Quantizer {
    /// Reduce the colors of `buffer` according to `settings`.
    ///
    /// Returns an equal buffer when the quantizer is disabled.
    pub fn apply(buffer: &PixelBuffer, settings: &QuantizerSettings) -> PixelBuffer {
        if !settings.enabled || buffer.is_empty() {
            return buffer.clone();
        }

        let pixels = match settings.algorithm {
            QuantizerAlgorithm::MedianCut => median_cut_pixels(buffer, settings),
            QuantizerAlgorithm::Posterize => posterize_pixels(buffer, settings),
        };
        buffer.with_pixels(pixels)
    }
}

fn median_cut_pixels(buffer: &PixelBuffer, settings: &QuantizerSettings) -> Vec<Rgba> {
    let mut histogram: HashMap<[u8; 3], u32> = HashMap::new();
    for pixel in buffer.pixels().iter().filter(|p| !p.is_transparent()) {
        *histogram.entry(pixel.rgb()).or_insert(0) += 1;
    }
    if histogram.is_empty() {
        return buffer.pixels().to_vec();
    }

    let palette = median_cut::build_palette(&histogram, settings.max_colors);
    tracing::debug!(
        distinct = histogram.len(),
        reduced = palette.len(),
        dither = settings.dither,
        "Median cut palette built"
    );

    if settings.dither {
        return diffusion::diffuse(buffer, |c| palette[median_cut::nearest(&palette, c)]);
    }

    // Without diffusion every occurrence of a color maps the same way.
    let remap: HashMap<[u8; 3], [u8; 3]> = histogram
        .keys()
        .map(|&c| {
            let target = palette[median_cut::nearest(&palette, c.map(f32::from))];
            (c, target)
        })
        .collect();
    buffer
        .pixels()
        .iter()
        .map(|&p| match remap.get(&p.rgb()) {
            Some(&[r, g, b]) if !p.is_transparent() => Rgba::new(r, g, b, p.a),
            _ => p,
        })
        .collect()
}

fn posterize_pixels(buffer: &PixelBuffer, settings: &QuantizerSettings) -> Vec<Rgba> {
    let bits = settings.bits;
    if settings.dither {
        return diffusion::diffuse(buffer, |c| {
            posterize::posterize_rgb(c.map(|v| v.round() as u8), bits)
        });
    }
    buffer
        .pixels()
        .iter()
        .map(|&p| {
            if p.is_transparent() {
                return p;
            }
            let [r, g, b] = posterize::posterize_rgb(p.rgb(), bits);
            Rgba::new(r, g, b, p.a)
        })
        .collect()
}
