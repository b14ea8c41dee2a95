//! Assertion helpers for tests.

use pixel_stacker::{read_schematic, MaterialPalette, ParsedSchematic};
use pretty_assertions::assert_eq;
use std::path::Path;

/// Assert bytes are a gzip stream and parse them as a schematic.
pub fn assert_schematic(bytes: &[u8], palette: &MaterialPalette) -> ParsedSchematic {
    assert!(
        bytes.starts_with(&[0x1f, 0x8b]),
        "Expected gzip data, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..4.min(bytes.len())]
    );
    read_schematic(bytes, palette).expect("schematic parses")
}

/// Read a schematic file and assert its canvas size.
pub fn assert_schematic_file(
    path: &Path,
    palette: &MaterialPalette,
    width: usize,
    height: usize,
) -> ParsedSchematic {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected schematic at {}: {e}", path.display()));
    let parsed = assert_schematic(&bytes, palette);
    assert_eq!(
        (parsed.canvas.width(), parsed.canvas.height()),
        (width, height),
        "Unexpected canvas size in {}",
        path.display()
    );
    parsed
}

/// Assert every cell of the canvas holds the material `id`.
pub fn assert_uniform(parsed: &ParsedSchematic, palette: &MaterialPalette, id: &str) {
    let counts = parsed.canvas.material_counts(palette);
    let cells = parsed.canvas.width() * parsed.canvas.height();
    assert_eq!(counts.len(), 1, "Expected only {id}, got {counts:?}");
    assert_eq!(counts.get(id), Some(&cells));
}
