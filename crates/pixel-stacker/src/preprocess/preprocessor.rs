//! The per-pixel preprocessing pass.

use crate::buffer::PixelBuffer;
use crate::color::Rgba;
use crate::options::Options;
use crate::quantize::{Quantizer, QuantizerSettings};

use super::PreprocessSettings;

/// Adapts a decoded image to the active view mode before mapping.
///
/// Steps, in order:
///
/// 1. alpha threshold
/// 2. channel bucketing
/// 3. quantization, when enabled
///
/// Side-face shading is not applied here: the palette darkens its side-view
/// colors instead, so source highlights keep their full range. Dimensions
/// never change.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    settings: PreprocessSettings,
    quantizer: QuantizerSettings,
}

impl Preprocessor {
    pub fn new(options: &Options) -> Self {
        Self {
            settings: options.preprocess.clone(),
            quantizer: options.quantizer.clone(),
        }
    }

    /// Run every enabled step over `buffer`.
    pub fn process(&self, buffer: &PixelBuffer) -> PixelBuffer {
        let bucket = self.settings.rgb_bucket_size;
        let threshold = self.settings.alpha_threshold;

        let adjusted = buffer.map_pixels(|p| {
            if p.a < threshold {
                return Rgba::TRANSPARENT;
            }
            let mut rgb = p.rgb();
            if bucket > 1 {
                rgb = rgb.map(|c| bucket_channel(c, bucket));
            }
            Rgba::opaque(rgb[0], rgb[1], rgb[2])
        });

        Quantizer::apply(&adjusted, &self.quantizer)
    }
}

/// Floor to a multiple of `size`, then move to the bucket centre.
#[inline]
fn bucket_channel(channel: u8, size: u8) -> u8 {
    let size = size as u16;
    let floor = channel as u16 / size * size;
    (floor + size / 2).min(255) as u8
}
