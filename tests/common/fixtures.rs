//! Test fixtures: a small material catalog and image writers.

use image::{Rgba, RgbaImage};
use image_to_schematic::assets::AssetLoader;
use image_to_schematic::models::load_palette;
use pixel_stacker::{Converter, MaterialPalette, Options};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Four wools and one glass pane, enough to tell mappings apart.
pub const TEST_CATALOG: &str = r##"
materials:
  - { id: WOOL_00, block: 35, data: 0, top: "#E9ECEC" }
  - { id: WOOL_14, block: 35, data: 14, top: "#A02722" }
  - { id: WOOL_11, block: 35, data: 11, top: "#35399D" }
  - { id: WOOL_15, block: 35, data: 15, top: "#141519" }
  - { id: GLASS_04, block: 95, data: 4, top: "#E5E533", layer: overlay }
"##;

/// Colors matching the catalog entries above.
pub mod colors {
    pub const WHITE: [u8; 4] = [0xE9, 0xEC, 0xEC, 255];
    pub const RED: [u8; 4] = [0xA0, 0x27, 0x22, 255];
    pub const BLUE: [u8; 4] = [0x35, 0x39, 0x9D, 255];
    pub const BLACK: [u8; 4] = [0x14, 0x15, 0x19, 255];
    pub const CLEAR: [u8; 4] = [0, 0, 0, 0];
}

pub fn test_palette() -> Arc<MaterialPalette> {
    Arc::new(MaterialPalette::from_yaml(TEST_CATALOG).expect("test catalog is valid"))
}

/// Converter over [`TEST_CATALOG`].
///
/// Top view keeps colors unshaded so fixtures map onto their exact material.
pub fn test_converter(options: Options) -> Converter {
    Converter::new(test_palette(), options).expect("converter")
}

pub fn top_view() -> Options {
    Options::new().side_view(false)
}

/// The catalog that ships with the binary.
pub fn embedded_palette() -> Arc<MaterialPalette> {
    Arc::new(load_palette(&AssetLoader::default()).expect("embedded catalog is valid"))
}

/// Write a solid-color PNG and return its path.
pub fn write_solid_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba(color))
        .save(&path)
        .expect("write png");
    path
}

/// Write a PNG whose rows cycle through `rows`.
pub fn write_striped_png(dir: &Path, name: &str, width: u32, rows: &[[u8; 4]]) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_fn(width, rows.len() as u32, |_, y| Rgba(rows[y as usize]))
        .save(&path)
        .expect("write png");
    path
}

/// Write the test catalog to `dir/materials.yaml`.
pub fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("materials.yaml");
    std::fs::write(&path, TEST_CATALOG).expect("write catalog");
    path
}
