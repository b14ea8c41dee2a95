//! Public entry point: [`Converter`] and its unified error type.

mod converter;
mod error;

pub use converter::Converter;
pub use error::ConvertError;
