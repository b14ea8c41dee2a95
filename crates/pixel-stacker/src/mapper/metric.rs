//! Distance metrics expressed as coordinate embeddings.

use serde::{Deserialize, Serialize};

use crate::color::{LinearRgb, Oklab, Srgb};

/// How colors are compared when matching pixels to combinations.
///
/// Each metric maps a color to a point in 3-d space where plain Euclidean
/// distance is the metric's distance, which lets one k-d tree serve all of
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMetric {
    /// Euclidean distance in Oklab.
    #[default]
    Oklab,
    /// Euclidean distance on 0..=255 sRGB channels.
    Rgb,
    /// sRGB with channel weights 2, 4 and 3 for red, green and blue.
    WeightedRgb,
}

impl ColorMetric {
    /// Embed `color` so that squared Euclidean distance between embeddings
    /// equals this metric's squared distance.
    #[inline]
    pub fn embed(self, color: Srgb) -> [f32; 3] {
        match self {
            ColorMetric::Oklab => {
                let lab = Oklab::from(LinearRgb::from(color));
                [lab.l, lab.a, lab.b]
            }
            ColorMetric::Rgb => [color.r * 255.0, color.g * 255.0, color.b * 255.0],
            ColorMetric::WeightedRgb => [
                color.r * 255.0 * std::f32::consts::SQRT_2,
                color.g * 255.0 * 2.0,
                color.b * 255.0 * 3.0_f32.sqrt(),
            ],
        }
    }
}

#[inline]
pub(crate) fn distance_squared(a: [f32; 3], b: [f32; 3]) -> f32 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}
