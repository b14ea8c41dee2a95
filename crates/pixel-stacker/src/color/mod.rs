//! Color types shared by every pipeline stage.
//!
//! - [`Rgba`]: 8-bit pixel as delivered by the image source.
//! - [`Srgb`]: gamma-encoded color with float channels, used for material
//!   colors and catalog parsing.
//! - [`LinearRgb`]: linear light, the only space where blending is correct.
//! - [`Oklab`]: perceptual space used for nearest-match distances.

mod linear_rgb;
mod lut;
mod oklab;
mod rgba;
mod srgb;

pub use linear_rgb::LinearRgb;
pub use oklab::Oklab;
pub use rgba::Rgba;
pub use srgb::Srgb;
