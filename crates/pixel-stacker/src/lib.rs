#![allow(clippy::excessive_precision, clippy::module_inception)]

//! pixel-stacker: turn images into block art schematics
//!
//! Every pixel is matched against a fixed catalog of block materials. In
//! multilayer mode a translucent overlay (stained glass) may sit on top of a
//! solid block, which multiplies the colors the canvas can show. The finished
//! grid is written as an MCEdit `.schematic` file.
//!
//! # Quick Start
//!
//! [`Converter`] is the primary entry point:
//!
//! ```
//! use std::sync::Arc;
//! use pixel_stacker::{Converter, MaterialPalette, Options, PixelBuffer, Rgba};
//!
//! let palette = MaterialPalette::from_yaml(r##"
//! materials:
//!   - { id: WOOL_00, block: 35, data: 0, top: "#E9ECEC" }
//!   - { id: WOOL_14, block: 35, data: 14, top: "#A02722" }
//!   - { id: GLASS_14, block: 95, data: 14, top: "#993333", layer: overlay, opacity: 0.5 }
//! "##)
//! .unwrap();
//!
//! let converter = Converter::new(Arc::new(palette), Options::new().multi_layer(true)).unwrap();
//! let image = PixelBuffer::filled(8, 8, Rgba::opaque(180, 40, 40));
//! let schematic: Vec<u8> = converter.convert(&image).unwrap();
//! assert!(!schematic.is_empty());
//! ```
//!
//! # Pipeline
//!
//! ```text
//! PixelBuffer
//!     |
//!     v
//! Preprocessor            alpha threshold, channel bucketing,
//!     |                   optional Quantizer
//!     v
//! ColorMapper             k-d tree over the palette's valid combinations,
//!     |                   side faces shaded in side view
//!     |
//!     v
//! RenderedCanvas          one Cell per pixel, rows mapped in parallel
//!     |
//!     v
//! SchematicExporter       gzip-compressed NBT, atomic file publish
//! ```
//!
//! # Color Spaces
//!
//! - [`Rgba`]: 8-bit pixels as decoded from image files
//! - [`Srgb`]: material colors and catalog values
//! - [`LinearRgb`]: overlay blending, since light adds linearly
//! - [`Oklab`]: default matching space, see [`ColorMetric`]
//!
//! # Sharing
//!
//! A [`MaterialPalette`] is immutable after construction and meant to be
//! shared behind an `Arc`. Its combination sets are built lazily per view
//! mode and multilayer setting and cached inside the palette. A
//! [`Converter`] owns a seeded mapper and can convert any number of images.

pub mod api;
pub mod buffer;
pub mod color;
pub mod mapper;
pub mod options;
pub mod palette;
pub mod preprocess;
pub mod quantize;
pub mod render;
pub mod schematic;


pub use api::{ConvertError, Converter};
pub use buffer::PixelBuffer;
pub use color::{LinearRgb, Oklab, Rgba, Srgb};
pub use mapper::{ColorMapper, ColorMetric, KdTreeMapper, LinearScanMapper, MapperError};
pub use options::Options;
pub use palette::{
    Combination, Material, MaterialIndex, MaterialLayer, MaterialPalette, PaletteError,
    ParseColorError,
};
pub use preprocess::{PreprocessSettings, Preprocessor};
pub use quantize::{Quantizer, QuantizerAlgorithm, QuantizerSettings};
pub use render::{CancelToken, Cell, RenderEngine, RenderError, RenderedCanvas};
pub use schematic::{read_schematic, ExportError, ParsedSchematic, ProjectData, SchematicExporter};
