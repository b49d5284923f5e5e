//! Interactive and batch rectangle cropping of images

pub mod app;
pub mod batch;
pub mod config;
pub mod editor;
pub mod errors;
pub mod geometry;
pub mod imaging;

pub use errors::{CropError, Result};
pub use geometry::CropRect;
