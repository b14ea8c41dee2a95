//! YAML material catalog.
//!
//! ```yaml
//! materials:
//!   - id: LOG_OAK
//!     label: Oak Log
//!     block: 17
//!     data: 0
//!     name: minecraft:oak_log
//!     top: "#977A49"
//!     side: "#6D5532"
//!   - id: GLASS_14
//!     block: 95
//!     data: 14
//!     top: "#993333"
//!     layer: overlay
//!     opacity: 0.55
//! ```

use serde::Deserialize;

use super::error::PaletteError;
use super::material::{Material, MaterialLayer};
use crate::color::Srgb;

const DEFAULT_OVERLAY_OPACITY: f32 = 0.5;

#[derive(Debug, Deserialize)]
pub(crate) struct Catalog {
    pub materials: Vec<MaterialSpec>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MaterialSpec {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub block: u8,
    #[serde(default)]
    pub data: u8,
    #[serde(default)]
    pub name: Option<String>,
    pub top: String,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub layer: MaterialLayer,
    #[serde(default)]
    pub opacity: Option<f32>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

fn parse_color(id: &str, hex: &str) -> Result<Srgb, PaletteError> {
    hex.parse().map_err(|source| PaletteError::Color {
        id: id.to_string(),
        source,
    })
}

impl TryFrom<MaterialSpec> for Material {
    type Error = PaletteError;

    fn try_from(spec: MaterialSpec) -> Result<Self, Self::Error> {
        let top_color = parse_color(&spec.id, &spec.top)?;
        let side_color = match spec.side.as_deref() {
            Some(hex) => parse_color(&spec.id, hex)?,
            None => top_color,
        };
        let opacity = spec.opacity.unwrap_or(match spec.layer {
            MaterialLayer::Solid => 1.0,
            MaterialLayer::Overlay => DEFAULT_OVERLAY_OPACITY,
            MaterialLayer::Air => 0.0,
        });

        Ok(Material {
            label: spec.label.unwrap_or_else(|| spec.id.clone()),
            name: spec
                .name
                .unwrap_or_else(|| format!("legacy:{}_{}", spec.block, spec.data)),
            id: spec.id,
            block_id: spec.block,
            data: spec.data,
            top_color,
            side_color,
            layer: spec.layer,
            opacity,
            enabled: spec.enabled,
        })
    }
}

pub(crate) fn parse_catalog(yaml: &str) -> Result<Vec<Material>, PaletteError> {
    let catalog: Catalog = serde_yaml::from_str(yaml)?;
    catalog
        .materials
        .into_iter()
        .map(Material::try_from)
        .collect()
}
