//! Per-conversion settings.

use serde::{Deserialize, Serialize};

use crate::mapper::ColorMetric;
use crate::preprocess::PreprocessSettings;
use crate::quantize::QuantizerSettings;

/// Everything a single conversion needs besides the palette and the image.
///
/// Built once per request and then treated as immutable. All fields have
/// defaults so partial YAML documents deserialize cleanly.
///
/// # Defaults
///
/// - side view, single layer
/// - Oklab distance metric
/// - rayon's global pool (`threads = 0`)
/// - default preprocessing, quantizer disabled
///
/// # Example
///
/// ```
/// use pixel_stacker::Options;
///
/// let options = Options::new()
///     .side_view(false)
///     .multi_layer(true)
///     .quantize(true);
/// assert!(!options.is_side_view);
/// assert!(options.quantizer.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Build a wall seen from the front (true) or a floor seen from above.
    pub is_side_view: bool,

    /// Allow a translucent overlay on top of each solid block.
    pub is_multi_layer: bool,

    pub metric: ColorMetric,

    /// Worker threads for rendering; 0 uses the global rayon pool.
    pub threads: usize,

    pub preprocess: PreprocessSettings,

    pub quantizer: QuantizerSettings,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            is_side_view: true,
            is_multi_layer: false,
            metric: ColorMetric::default(),
            threads: 0,
            preprocess: PreprocessSettings::default(),
            quantizer: QuantizerSettings::default(),
        }
    }
}

impl Options {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn side_view(mut self, enabled: bool) -> Self {
        self.is_side_view = enabled;
        self
    }

    #[inline]
    pub fn multi_layer(mut self, enabled: bool) -> Self {
        self.is_multi_layer = enabled;
        self
    }

    #[inline]
    pub fn metric(mut self, metric: ColorMetric) -> Self {
        self.metric = metric;
        self
    }

    #[inline]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[inline]
    pub fn preprocess(mut self, settings: PreprocessSettings) -> Self {
        self.preprocess = settings;
        self
    }

    #[inline]
    pub fn quantizer(mut self, settings: QuantizerSettings) -> Self {
        self.quantizer = settings;
        self
    }

    /// Shorthand for toggling the quantizer while keeping its other settings.
    #[inline]
    pub fn quantize(mut self, enabled: bool) -> Self {
        self.quantizer.enabled = enabled;
        self
    }
}
