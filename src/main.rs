use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use eframe::egui;
use log::info;

use image_cropper::app::CropperApp;
use image_cropper::config::{EditorConfig, load_config};
use image_cropper::imaging::{SUPPORTED_EXTENSIONS, load_image};

#[derive(Parser)]
#[command(name = "image_cropper", about = "draw, move and crop a rectangle of an image")]
struct Cli {
    /// image to crop, opens a file dialog if omitted
    image: Option<PathBuf>,

    /// RON editor config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// directory to write the cropped image to
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    /// start in free-form instead of square mode
    #[arg(long)]
    free: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config: EditorConfig = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("cannot read config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if cli.free {
        config.square_mode = false;
    }

    let path = match cli.image {
        Some(path) => path,
        None => match rfd::FileDialog::new()
            .add_filter("Image", &SUPPORTED_EXTENSIONS)
            .pick_file()
        {
            Some(path) => path,
            None => {
                info!("no image selected");
                return Ok(());
            }
        },
    };

    let image = load_image(&path)
        .with_context(|| format!("cannot load image {}, please check the path", path.display()))?;
    info!("loaded {} ({}x{})", path.display(), image.width(), image.height());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Image Cropper",
        options,
        Box::new(move |cc| Ok(Box::new(CropperApp::new(cc, image, path, config)))),
    )
    .map_err(|e| anyhow!("window error: {e}"))
}
