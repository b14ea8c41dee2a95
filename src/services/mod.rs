pub mod batch;
pub mod conversion;
pub mod image_loader;
pub mod preview;

pub use batch::{BatchDriver, BatchReport, ItemOutcome};
pub use conversion::{convert_file, convert_loaded, ConversionReport, SizeLimits};
pub use image_loader::{load_image, LoadedImage};
pub use preview::write_preview;
