//! Directory batch conversion.
//!
//! Every image in the input directory (non-recursive, sorted by file name)
//! is converted through one shared [`Converter`] and written to
//! `<output>/<stem>.schematic`. A failing image is logged and recorded in
//! the report; the batch only stops early in fail-fast mode.

use crate::error::AppError;
use crate::models::AppConfig;
use crate::services::conversion::{convert_loaded, ConversionReport, SizeLimits};
use crate::services::image_loader::{load_image, LoadedImage};
use pixel_stacker::Converter;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const SCHEMATIC_EXTENSION: &str = "schematic";

/// Decodes one input file. Replaceable for tests.
pub type ImageLoaderFn = dyn Fn(&Path, SizeLimits) -> Result<LoadedImage, AppError>;

/// Result of one batch item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Converted(ConversionReport),
    Failed {
        input: PathBuf,
        kind: &'static str,
        error: String,
    },
}

impl ItemOutcome {
    pub fn input(&self) -> &Path {
        match self {
            ItemOutcome::Converted(report) => &report.input,
            ItemOutcome::Failed { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Converted(_))
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub items: Vec<ItemOutcome>,
    /// True when fail-fast stopped the batch before every input was tried.
    pub stopped_early: bool,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

pub struct BatchDriver<'a> {
    converter: &'a Converter,
    extensions: Vec<String>,
    limits: SizeLimits,
    fail_fast: bool,
    loader: Box<ImageLoaderFn>,
}

impl<'a> BatchDriver<'a> {
    pub fn new(converter: &'a Converter, config: &AppConfig) -> Self {
        Self {
            converter,
            extensions: config.image_extensions.clone(),
            limits: SizeLimits {
                max_width: config.max_width,
                max_height: config.max_height,
            },
            fail_fast: false,
            loader: Box::new(|path: &Path, limits: SizeLimits| {
                load_image(path, limits.max_width, limits.max_height)
            }),
        }
    }

    /// Stop at the first failing image.
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    pub fn limits(mut self, limits: SizeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the image decoder.
    pub fn with_loader(
        mut self,
        loader: impl Fn(&Path, SizeLimits) -> Result<LoadedImage, AppError> + 'static,
    ) -> Self {
        self.loader = Box::new(loader);
        self
    }

    fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|k| k.eq_ignore_ascii_case(ext)))
    }

    /// Image files directly inside `dir`, sorted by path.
    pub fn collect_inputs(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        if !dir.is_dir() {
            return Err(AppError::InputNotFound(dir.to_path_buf()));
        }
        let mut inputs = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| AppError::io(dir, e))? {
            let path = entry.map_err(|e| AppError::io(dir, e))?.path();
            if path.is_file() && self.is_image(&path) {
                inputs.push(path);
            }
        }
        inputs.sort();
        Ok(inputs)
    }

    /// Convert every image in `input_dir` into `output_dir`.
    ///
    /// Only directory-level problems are returned as errors; per-image
    /// failures land in the report.
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchReport, AppError> {
        let inputs = self.collect_inputs(input_dir)?;
        fs::create_dir_all(output_dir).map_err(|e| AppError::io(output_dir, e))?;

        tracing::info!(
            input_dir = %input_dir.display(),
            output_dir = %output_dir.display(),
            images = inputs.len(),
            "Starting batch"
        );

        let mut report = BatchReport {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            items: Vec::with_capacity(inputs.len()),
            stopped_early: false,
        };
        let mut outputs = HashSet::new();

        for (n, input) in inputs.iter().enumerate() {
            let output = output_path(input, output_dir);
            if !outputs.insert(output.clone()) {
                tracing::warn!(
                    input = %input.display(),
                    output = %output.display(),
                    "Output name already used in this batch, overwriting"
                );
            }

            let outcome = match self.convert_one(input, &output) {
                Ok(item) => ItemOutcome::Converted(item),
                Err(e) => {
                    tracing::warn!(input = %input.display(), error = %e, "Failed to convert image");
                    ItemOutcome::Failed {
                        input: input.clone(),
                        kind: e.kind(),
                        error: e.to_string(),
                    }
                }
            };
            let failed = !outcome.is_success();
            report.items.push(outcome);

            if failed && self.fail_fast {
                report.stopped_early = n + 1 < inputs.len();
                break;
            }
        }

        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            stopped_early = report.stopped_early,
            "Batch finished"
        );
        Ok(report)
    }

    fn convert_one(&self, input: &Path, output: &Path) -> Result<ConversionReport, AppError> {
        let loaded = (self.loader)(input, self.limits)?;
        convert_loaded(self.converter, input, &loaded, output, None)
    }
}

/// `<output_dir>/<stem>.schematic`
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".");
    name.push(SCHEMATIC_EXTENSION);
    output_dir.join(name)
}
