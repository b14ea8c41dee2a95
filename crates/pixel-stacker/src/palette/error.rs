//! Error types for catalog parsing and palette validation.

use std::num::ParseIntError;

/// Failure to parse a `#RRGGBB` color string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseColorError {
    #[error("invalid hex color length {0} (expected 3 or 6 digits)")]
    InvalidLength(usize),

    #[error("invalid hex digit: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Palette construction or configuration failure.
///
/// [`PaletteError::NoEligibleMaterials`] is the configuration error raised
/// when the options leave nothing to map onto; the other variants reject a
/// malformed catalog.
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("material catalog is empty")]
    EmptyCatalog,

    #[error("duplicate material id: {0}")]
    DuplicateId(String),

    #[error("material {id} reuses block {block}:{data}")]
    DuplicateBlock { id: String, block: u8, data: u8 },

    #[error("material {id} has data value {data} (must be 0-15)")]
    InvalidData { id: String, data: u8 },

    #[error("material {id} has opacity {opacity} (must be within 0.0-1.0)")]
    InvalidOpacity { id: String, opacity: f32 },

    #[error("catalog holds {0} materials (at most 65535 are supported)")]
    TooManyMaterials(usize),

    #[error("catalog defines more than one air material ({0})")]
    DuplicateAir(String),

    #[error("material {id}: {source}")]
    Color {
        id: String,
        #[source]
        source: ParseColorError,
    },

    #[error("catalog parse error: {0}")]
    Catalog(#[from] serde_yaml::Error),

    #[error("no enabled solid materials are available for {view} view")]
    NoEligibleMaterials { view: &'static str },
}
