//! Crop a whole folder of images to one rectangle

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::BatchConfig;
use crate::errors::Result;
use crate::imaging::{annotate, crop, is_supported, load_image, save_png};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// files for which both outputs were written
    pub processed: usize,
    /// supported files that could not be read, cropped or written
    pub skipped: usize,
    /// files without a supported image extension
    pub ignored: usize,
}

/// Output file names for an input file: `<base>_cropped.png` and `<base>_with_rect.png`
pub fn output_paths(config: &BatchConfig, input: &Path) -> (PathBuf, PathBuf) {
    let base = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (
        config.output_crop_folder.join(format!("{base}_cropped.png")),
        config.output_rect_folder.join(format!("{base}_with_rect.png")),
    )
}

/// Crop every supported image in `config.input_folder` and write the cropped image plus a marked
/// copy of the original. Files are processed in name order. Unreadable files are skipped.
pub fn process_images(config: &BatchConfig) -> Result<BatchSummary> {
    fs::create_dir_all(&config.output_crop_folder)?;
    fs::create_dir_all(&config.output_rect_folder)?;

    let entries = input_files(&config.input_folder)?;
    let mut summary = BatchSummary::default();

    for path in entries {
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !is_supported(&path) {
            debug!("ignoring {}", filename);
            summary.ignored += 1;
            continue;
        }

        match process_file(config, &path) {
            Ok(()) => {
                summary.processed += 1;
                println!("✓ processed: {}", filename);
            }
            Err(e) => {
                warn!("cannot process image {}: {}", filename, e);
                summary.skipped += 1;
            }
        }
    }

    println!("\nDone! processed {} images", summary.processed);
    println!("cropped images saved in: {}", config.output_crop_folder.display());
    println!("marked images saved in: {}", config.output_rect_folder.display());

    Ok(summary)
}

/// regular files of `folder`, sorted by path
pub fn input_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => warn!("cannot read entry of {}: {}", folder.display(), e),
        }
    }
    files.sort();
    Ok(files)
}

fn process_file(config: &BatchConfig, path: &Path) -> Result<()> {
    let image = load_image(path)?;
    let cropped = crop(&image, config.crop_rect)?;
    let marked = annotate(
        &image,
        config.crop_rect,
        config.marker_color,
        config.line_thickness,
    );

    let (crop_path, rect_path) = output_paths(config, path);
    save_png(&cropped, &crop_path)?;
    save_png(&marked, &rect_path)?;
    Ok(())
}
