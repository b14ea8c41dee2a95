//! View-mode adaptation of the decoded image.
//!
//! Runs to completion before any color lookup, producing a buffer of the
//! same shape in which every pixel is either fully opaque or fully
//! transparent.

mod preprocessor;
mod settings;

pub use preprocessor::Preprocessor;
pub use settings::PreprocessSettings;
