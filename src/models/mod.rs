pub mod catalog;
pub mod config;

pub use catalog::load_palette;
pub use config::{AppConfig, Overrides, DEFAULT_IMAGE_EXTENSIONS};
