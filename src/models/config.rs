use crate::assets::AssetLoader;
use pixel_stacker::Options;
use serde::{Deserialize, Serialize};

/// Extensions picked up in batch mode.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[
    "bmp", "gif", "ico", "jpeg", "jpg", "ktx", "png", "webp", "wbmp",
];

/// Application configuration loaded from config.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Settings handed to the converter
    #[serde(default)]
    pub conversion: Options,

    /// Downscale wider images before conversion
    #[serde(default)]
    pub max_width: Option<u32>,

    /// Downscale taller images before conversion
    #[serde(default)]
    pub max_height: Option<u32>,

    /// File extensions considered images in batch mode (case-insensitive)
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

fn default_image_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

/// Command-line settings layered on top of the config file.
///
/// Switches only ever turn a feature on; values replace the configured ones
/// when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub quantize: bool,
    pub multi_layer: bool,
    pub top_view: bool,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub threads: Option<usize>,
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        side_view = config.conversion.is_side_view,
                        multi_layer = config.conversion.is_multi_layer,
                        quantize = config.conversion.quantizer.enabled,
                        source = %loader.config_source(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        let mut options = self.conversion;
        if overrides.quantize {
            options = options.quantize(true);
        }
        if overrides.multi_layer {
            options = options.multi_layer(true);
        }
        if overrides.top_view {
            options = options.side_view(false);
        }
        if let Some(threads) = overrides.threads {
            options = options.threads(threads);
        }
        self.conversion = options;
        self.max_width = overrides.max_width.or(self.max_width);
        self.max_height = overrides.max_height.or(self.max_height);
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            conversion: Options::default(),
            max_width: None,
            max_height: None,
            image_extensions: default_image_extensions(),
        }
    }
}
