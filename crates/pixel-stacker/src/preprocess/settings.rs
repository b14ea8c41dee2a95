//! Preprocessing settings.

use serde::{Deserialize, Serialize};

/// Configuration for the per-pixel [`Preprocessor`](super::Preprocessor)
/// steps.
///
/// # Defaults
///
/// - alpha threshold 32
/// - side-face shading enabled
/// - channel bucketing disabled (bucket size 1)
///
/// # Example
///
/// ```
/// use pixel_stacker::PreprocessSettings;
///
/// let settings = PreprocessSettings::new()
///     .alpha_threshold(128)
///     .face_shading(false)
///     .rgb_bucket_size(16);
/// assert_eq!(settings.rgb_bucket_size, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessSettings {
    /// Pixels with alpha below this become air; all others become opaque.
    pub alpha_threshold: u8,

    /// Match side-view pixels against block colors darkened the way the game
    /// shades side faces.
    pub face_shading: bool,

    /// Snap each channel to buckets of this width. 0 and 1 disable it.
    pub rgb_bucket_size: u8,
}

impl Default for PreprocessSettings {
    fn default() -> Self {
        Self {
            alpha_threshold: 32,
            face_shading: true,
            rgb_bucket_size: 1,
        }
    }
}

impl PreprocessSettings {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alpha_threshold(mut self, threshold: u8) -> Self {
        self.alpha_threshold = threshold;
        self
    }

    #[inline]
    pub fn face_shading(mut self, enabled: bool) -> Self {
        self.face_shading = enabled;
        self
    }

    #[inline]
    pub fn rgb_bucket_size(mut self, size: u8) -> Self {
        self.rgb_bucket_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = PreprocessSettings::default();
        assert_eq!(settings.alpha_threshold, 32);
        assert!(settings.face_shading);
        assert_eq!(settings.rgb_bucket_size, 1);
        assert_eq!(settings, PreprocessSettings::new());
    }
}
