use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use pixelmask_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use pixelmask_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use pixelmask_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use pixelmask_core::pipeline::pixelate_image_use_case::PixelateImageUseCase;
use pixelmask_core::pixelation::infrastructure::block_pixelator::BlockPixelator;
use pixelmask_core::shared::constants::IMAGE_EXTENSIONS;
use pixelmask_core::shared::region::Region;
use pixelmask_core::shared::settings::Settings;

/// Pixelate rectangular regions of an image.
#[derive(Parser)]
#[command(name = "pixelmask")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Output image file (format follows the extension; PNG keeps alpha).
    output: PathBuf,

    /// Region to pixelate as x,y,width,height (repeatable).
    #[arg(long = "region", value_name = "X,Y,W,H", allow_hyphen_values = true)]
    regions: Vec<Region>,

    /// JSON file with an array of {x, y, width, height} regions.
    #[arg(long)]
    regions_file: Option<PathBuf>,

    /// Edge length of each averaging block in pixels (default: saved setting).
    #[arg(long)]
    block_size: Option<u32>,

    /// Regions must exceed this size on both axes (default: saved setting).
    #[arg(long)]
    min_region_size: Option<u32>,

    /// Do not remember --block-size for later runs.
    #[arg(long)]
    no_save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut settings = Settings::load();
    if let Some(block_size) = cli.block_size {
        settings.block_size = block_size;
    }
    if let Some(min_region_size) = cli.min_region_size {
        settings.min_region_size = min_region_size;
    }

    let regions = collect_regions(cli.regions, cli.regions_file.as_deref())?;
    if regions.is_empty() {
        log::warn!("No regions given; output will match the input");
    }

    let mut use_case = PixelateImageUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        Box::new(BlockPixelator::new(settings.block_size)?),
        f64::from(settings.min_region_size),
        Box::new(StdoutPipelineLogger::new()),
    );
    let applied = use_case.execute(&cli.input, &cli.output, &regions)?;
    log::info!(
        "Output written to {} ({applied} region(s) pixelated)",
        cli.output.display()
    );

    if !cli.no_save_settings && cli.block_size.is_some() {
        match settings.save() {
            Ok(path) => log::debug!("Saved settings to {}", path.display()),
            Err(e) => log::warn!("Could not save settings: {e}"),
        }
    }

    Ok(())
}

fn collect_regions(
    mut regions: Vec<Region>,
    regions_file: Option<&Path>,
) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
    if let Some(path) = regions_file {
        let loaded = Region::load_all(path)?;
        log::info!("Loaded {} region(s) from {}", loaded.len(), path.display());
        regions.extend(loaded);
    }
    Ok(regions)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.input) {
        return Err(format!(
            "Unsupported input format: {} (expected one of {})",
            cli.input.display(),
            IMAGE_EXTENSIONS.join(", ")
        )
        .into());
    }
    if !is_image(&cli.output) {
        return Err(format!(
            "Unsupported output format: {} (expected one of {})",
            cli.output.display(),
            IMAGE_EXTENSIONS.join(", ")
        )
        .into());
    }
    if cli.block_size == Some(0) {
        return Err("Block size must be a positive integer, got 0".into());
    }
    if let Some(path) = &cli.regions_file {
        if !path.exists() {
            return Err(format!("Regions file not found: {}", path.display()).into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
