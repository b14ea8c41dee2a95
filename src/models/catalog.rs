use crate::assets::AssetLoader;
use crate::error::AppError;
use pixel_stacker::{MaterialLayer, MaterialPalette};

/// Load and validate the material catalog.
///
/// Unlike the config, a broken catalog is fatal: there is nothing sensible
/// to convert onto.
pub fn load_palette(loader: &AssetLoader) -> Result<MaterialPalette, AppError> {
    let yaml = loader
        .read_materials_string()
        .map_err(|e| AppError::io(loader.materials_source(), e))?;
    let palette = MaterialPalette::from_yaml(&yaml)?;

    let overlays = palette
        .materials()
        .iter()
        .filter(|m| m.enabled && m.layer == MaterialLayer::Overlay)
        .count();
    tracing::info!(
        materials = palette.len(),
        overlays,
        source = %loader.materials_source(),
        "Loaded material catalog"
    );
    Ok(palette)
}
