//! Asset loading with embedded fallbacks
//!
//! The material catalog and the default config are compiled into the binary.
//! Either can be replaced at startup by pointing at a file on disk
//! (`MATERIALS_FILE` / `CONFIG_FILE`, or the matching CLI flags):
//!
//! - If no path is configured: use the embedded asset only
//! - If a path is configured and exists: read the file
//! - If a path is configured but missing: fall back to the embedded asset

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const MATERIALS_ASSET: &str = "materials.yaml";
pub const CONFIG_ASSET: &str = "config.yaml";

/// Embedded default catalog and config
#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "*.yaml"]
struct EmbeddedAssets;

/// Loads the material catalog and config, preferring configured files.
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    /// External catalog path (from MATERIALS_FILE env var or --materials)
    materials_file: Option<PathBuf>,
    /// External config path (from CONFIG_FILE env var or --config)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the user asked for an override.
    pub fn new(materials_file: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            materials_file,
            config_file,
        }
    }

    /// Build a loader from the `MATERIALS_FILE` and `CONFIG_FILE` env vars.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os("MATERIALS_FILE").map(PathBuf::from),
            std::env::var_os("CONFIG_FILE").map(PathBuf::from),
        )
    }

    /// Replace the catalog override (CLI flags win over env vars).
    pub fn with_materials_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.materials_file = path;
        }
        self
    }

    /// Replace the config override.
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.config_file = path;
        }
        self
    }

    fn read(&self, external: Option<&Path>, name: &str) -> io::Result<Cow<'static, [u8]>> {
        if let Some(path) = external {
            if path.exists() {
                tracing::trace!(path = %path.display(), asset = name, "Loading asset from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
            tracing::warn!(
                path = %path.display(),
                asset = name,
                "Configured asset file not found, using embedded default"
            );
        }

        EmbeddedAssets::get(name)
            .map(|f| {
                tracing::trace!(asset = name, "Loading asset from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Embedded {name} not found"),
                )
            })
    }

    fn read_string(&self, external: Option<&Path>, name: &str) -> io::Result<String> {
        let bytes = self.read(external, name)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Read the material catalog as a UTF-8 string
    pub fn read_materials_string(&self) -> io::Result<String> {
        self.read_string(self.materials_file.as_deref(), MATERIALS_ASSET)
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        self.read_string(self.config_file.as_deref(), CONFIG_ASSET)
    }

    /// Where the catalog comes from, for status output.
    pub fn materials_source(&self) -> String {
        Self::describe(self.materials_file.as_deref())
    }

    /// Where the config comes from, for status output.
    pub fn config_source(&self) -> String {
        Self::describe(self.config_file.as_deref())
    }

    fn describe(path: Option<&Path>) -> String {
        match path {
            Some(p) if p.exists() => p.display().to_string(),
            Some(p) => format!("embedded ({} not found)", p.display()),
            None => "embedded".to_string(),
        }
    }

    /// List embedded assets (for display)
    pub fn list_embedded() -> Vec<String> {
        let mut names: Vec<String> = EmbeddedAssets::iter().map(|s| s.to_string()).collect();
        names.sort();
        names
    }
}
