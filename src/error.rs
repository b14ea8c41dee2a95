use std::path::PathBuf;

use pixel_stacker::{ConvertError, PaletteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Material catalog error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    #[error("Preview error: {0}")]
    Preview(String),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable category used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InputNotFound(_) => "input_not_found",
            AppError::Io { .. } => "io",
            AppError::Decode { .. } => "decode",
            AppError::Palette(_) => "configuration",
            AppError::Convert(ConvertError::Configuration(_)) => "configuration",
            AppError::Convert(ConvertError::NotSeeded) => "not_seeded",
            AppError::Convert(ConvertError::Render(_)) => "render",
            AppError::Convert(ConvertError::Export(_)) => "export",
            AppError::Preview(_) => "preview",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_stacker::RenderError;

    #[test]
    fn test_error_display() {
        let err = AppError::InputNotFound(PathBuf::from("missing.png"));
        assert_eq!(err.to_string(), "Input not found: missing.png");

        let err = AppError::io(
            "out/a.schematic",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "IO error on out/a.schematic: denied");
    }

    #[test]
    fn test_kind() {
        let err = AppError::from(ConvertError::Render(RenderError::EmptyImage {
            width: 0,
            height: 3,
        }));
        assert_eq!(err.kind(), "render");
        assert_eq!(AppError::Preview("x".into()).kind(), "preview");
    }
}
