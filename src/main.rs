use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_to_schematic::assets::AssetLoader;
use image_to_schematic::models::{load_palette, AppConfig, Overrides};
use image_to_schematic::services::batch::{output_path, BatchDriver, BatchReport, ItemOutcome};
use image_to_schematic::services::{convert_file, SizeLimits};
use pixel_stacker::Converter;

const DEFAULT_LOG_FILTER: &str = "image_to_schematic=info,pixel_stacker=info";

#[derive(Parser)]
#[command(name = "image-to-schematic")]
#[command(version)]
#[command(about = "Convert images into Minecraft schematics made of colored blocks")]
struct Cli {
    /// Image file, or a directory with --batch
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Schematic file, or output directory with --batch
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert every image in the input directory
    #[arg(long)]
    batch: bool,

    /// Silence all console output
    #[arg(long)]
    nolog: bool,

    /// Reduce the number of colors before matching
    #[arg(long, visible_alias = "quantise")]
    quantize: bool,

    /// Allow a stained glass layer on top of each block
    #[arg(long)]
    multilayer: bool,

    /// Build a floor seen from above instead of a wall
    #[arg(long)]
    topview: bool,

    /// Stop the batch at the first failing image
    #[arg(long)]
    fail_fast: bool,

    /// Also write a PNG preview of the result (single image only)
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Print the conversion report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Downscale images wider than this
    #[arg(long)]
    max_width: Option<u32>,

    /// Downscale images taller than this
    #[arg(long)]
    max_height: Option<u32>,

    /// Render threads (0 = one per CPU)
    #[arg(long)]
    threads: Option<usize>,

    /// Config file (overrides CONFIG_FILE)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Material catalog (overrides MATERIALS_FILE)
    #[arg(long)]
    materials: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            quantize: self.quantize,
            multi_layer: self.multilayer,
            top_view: self.topview,
            max_width: self.max_width,
            max_height: self.max_height,
            threads: self.threads,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.nolog);

    let loader = AssetLoader::from_env()
        .with_materials_file(cli.materials.clone())
        .with_config_file(cli.config.clone());

    let Some(input) = cli.input.clone() else {
        if !cli.nolog {
            run_status_command(&loader);
        }
        return Ok(ExitCode::SUCCESS);
    };

    let config = AppConfig::load_from_assets(&loader).with_overrides(&cli.overrides());
    let palette = load_palette(&loader).context("Failed to load material catalog")?;
    let converter = Converter::new(Arc::new(palette), config.conversion.clone())
        .context("Failed to prepare converter")?;

    if cli.batch {
        run_batch_command(&cli, &input, &config, &converter)
    } else {
        run_single_command(&cli, &input, &config, &converter)
    }
}

fn init_logging(nolog: bool) {
    let filter = if nolog {
        tracing_subscriber::EnvFilter::new("off")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
    };

    // stdout is reserved for --json output
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run_single_command(
    cli: &Cli,
    input: &Path,
    config: &AppConfig,
    converter: &Converter,
) -> anyhow::Result<ExitCode> {
    let output = match &cli.output {
        Some(path) if path.is_dir() => output_path(input, path),
        Some(path) => path.clone(),
        None => input.with_extension("schematic"),
    };
    let limits = SizeLimits {
        max_width: config.max_width,
        max_height: config.max_height,
    };

    let report = convert_file(converter, input, &output, limits, cli.preview.as_deref())
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.nolog {
        println!(
            "Wrote {} ({}x{}, {} blocks, {} bytes)",
            report.output.display(),
            report.width,
            report.height,
            report.block_count(),
            report.bytes
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn run_batch_command(
    cli: &Cli,
    input: &Path,
    config: &AppConfig,
    converter: &Converter,
) -> anyhow::Result<ExitCode> {
    if cli.preview.is_some() {
        tracing::warn!("--preview is ignored in batch mode");
    }
    let output_dir = cli.output.clone().unwrap_or_else(|| input.to_path_buf());

    let report = BatchDriver::new(converter, config)
        .fail_fast(cli.fail_fast)
        .run(input, &output_dir)
        .with_context(|| format!("Batch over {} failed", input.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.nolog {
        print_batch_summary(&report);
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_batch_summary(report: &BatchReport) {
    for item in &report.items {
        match item {
            ItemOutcome::Converted(r) => {
                println!("  + {} -> {}", r.input.display(), r.output.display())
            }
            ItemOutcome::Failed { input, error, .. } => {
                println!("  ! {}: {error}", input.display())
            }
        }
    }
    println!(
        "\n{} converted, {} failed{}",
        report.succeeded(),
        report.failed(),
        if report.stopped_early {
            " (stopped early)"
        } else {
            ""
        }
    );
}

/// Show configuration sources and usage hints
fn run_status_command(loader: &AssetLoader) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("image-to-schematic v{VERSION}");
    println!("Convert images into Minecraft schematics\n");

    println!("Environment Variables:");
    println!(
        "  MATERIALS_FILE  {}",
        std::env::var("MATERIALS_FILE").unwrap_or_else(|_| "(not set)".into())
    );
    println!(
        "  CONFIG_FILE     {}",
        std::env::var("CONFIG_FILE").unwrap_or_else(|_| "(not set)".into())
    );
    println!(
        "  RUST_LOG        {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("(not set, using {DEFAULT_LOG_FILTER})"))
    );

    println!("\nAsset Sources:");
    println!("  Materials: {}", loader.materials_source());
    println!("  Config:    {}", loader.config_source());
    println!("  Embedded:  {}", AssetLoader::list_embedded().join(", "));

    match load_palette(loader) {
        Ok(palette) => println!("\n{} materials available", palette.len() - 1),
        Err(e) => println!("\nMaterial catalog is invalid: {e}"),
    }

    println!("\nUsage:");
    println!("  image-to-schematic -i photo.png                   Convert one image");
    println!("  image-to-schematic -i photos/ -o out/ --batch     Convert a directory");
    println!("\nRun 'image-to-schematic --help' for more details.");
}
