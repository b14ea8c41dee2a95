//! Material catalog, palette validation and combination building.

mod catalog;
mod combination;
mod error;
mod material;
mod palette;

pub use combination::{Combination, SIDE_FACE_SHADE};
pub use error::{PaletteError, ParseColorError};
pub use material::{Material, MaterialIndex, MaterialLayer};
pub use palette::MaterialPalette;
