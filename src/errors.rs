use thiserror::Error;

pub type Result<T> = std::result::Result<T, CropError>;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("crop region {0} does not overlap the {1}x{2} image")]
    EmptyCrop(crate::geometry::CropRect, u32, u32),

    #[error("invalid rectangle: {0}")]
    InvalidRect(String),
}
