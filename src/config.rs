//! RON configuration for the batch and interactive croppers

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::errors::Result;
use crate::geometry::CropRect;
use crate::imaging::RED;

/// Read a RON config file. Missing fields take their `Default` values.
pub fn load_config<C: DeserializeOwned>(path: &Path) -> Result<C> {
    let input = fs::read_to_string(path)?;
    Ok(ron::from_str(&input)?)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input_folder: PathBuf,
    pub output_crop_folder: PathBuf,
    pub output_rect_folder: PathBuf,
    pub crop_rect: CropRect,
    pub line_thickness: u32,
    pub marker_color: [u8; 3],
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::from("input_images"),
            output_crop_folder: PathBuf::from("cropped_images"),
            output_rect_folder: PathBuf::from("images_with_rect"),
            crop_rect: CropRect::new(239, 152, 94, 94),
            line_thickness: 2,
            marker_color: RED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// selection outline width in screen points
    pub line_width: f32,
    pub edge_color: [u8; 3],
    /// start in square mode
    pub square_mode: bool,
    /// where "cropped_<name>.png" goes
    pub output_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            edge_color: RED,
            square_mode: true,
            output_dir: PathBuf::from("."),
        }
    }
}
