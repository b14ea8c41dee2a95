//! Quantizer configuration.

use serde::{Deserialize, Serialize};

/// Color reduction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantizerAlgorithm {
    /// Adaptive palette by recursive median cut, bounded by `max_colors`.
    #[default]
    MedianCut,
    /// Fixed per-channel bit depth, bounded by `bits`.
    Posterize,
}

/// Configuration for [`Quantizer`](super::Quantizer).
///
/// Disabled by default. When enabled, the default is a 256-color median cut
/// without dithering.
///
/// # Example
///
/// ```
/// use pixel_stacker::{QuantizerAlgorithm, QuantizerSettings};
///
/// let settings = QuantizerSettings::new()
///     .enabled(true)
///     .algorithm(QuantizerAlgorithm::MedianCut)
///     .max_colors(32)
///     .dither(true);
/// assert_eq!(settings.max_colors, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizerSettings {
    pub enabled: bool,

    pub algorithm: QuantizerAlgorithm,

    /// Upper bound on distinct opaque colors for median cut.
    ///
    /// Values below 1 are treated as 1.
    pub max_colors: usize,

    /// Bits kept per channel for posterize, clamped to `1..=8`.
    pub bits: u8,

    /// Diffuse the remapping error (Floyd-Steinberg, serpentine scan).
    pub dither: bool,
}

impl Default for QuantizerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            algorithm: QuantizerAlgorithm::MedianCut,
            max_colors: 256,
            bits: 5,
            dither: false,
        }
    }
}

impl QuantizerSettings {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[inline]
    pub fn algorithm(mut self, algorithm: QuantizerAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }

    #[inline]
    pub fn bits(mut self, bits: u8) -> Self {
        self.bits = bits;
        self
    }

    #[inline]
    pub fn dither(mut self, enabled: bool) -> Self {
        self.dither = enabled;
        self
    }
}
