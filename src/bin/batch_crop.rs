use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use image_cropper::CropRect;
use image_cropper::batch::process_images;
use image_cropper::config::{BatchConfig, load_config};

#[derive(Parser)]
#[command(name = "batch_crop", about = "crop all images of a folder to the same rectangle")]
struct Cli {
    /// RON batch config file, command line options take precedence
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// folder with the input images
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// folder for the cropped images
    #[arg(long)]
    crop_output: Option<PathBuf>,

    /// folder for the originals with the marked rectangle
    #[arg(long)]
    rect_output: Option<PathBuf>,

    /// crop rectangle as x,y,width,height
    #[arg(long, short, allow_hyphen_values = true)]
    rect: Option<CropRect>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config: BatchConfig = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("cannot read config {}", path.display()))?,
        None => BatchConfig::default(),
    };
    if let Some(dir) = cli.input {
        config.input_folder = dir;
    }
    if let Some(dir) = cli.crop_output {
        config.output_crop_folder = dir;
    }
    if let Some(dir) = cli.rect_output {
        config.output_rect_folder = dir;
    }
    if let Some(rect) = cli.rect {
        config.crop_rect = rect;
    }

    process_images(&config)
        .with_context(|| format!("batch crop of {} failed", config.input_folder.display()))?;
    Ok(())
}
