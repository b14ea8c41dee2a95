//! image-to-schematic
//!
//! Command-line front end for the `pixel-stacker` engine: turns images into
//! MCEdit `.schematic` files built from colored blocks.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod services;

pub use error::AppError;
