//! Image loading, cropping, marker drawing and PNG output

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};
use imageproc::drawing::{Canvas, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::errors::{CropError, Result};
use crate::geometry::CropRect;

pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "tif"];

pub const RED: [u8; 3] = [255, 0, 0];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !is_supported(path) {
        return Err(CropError::UnsupportedFormat(path.display().to_string()));
    }
    Ok(image::open(path)?)
}

/// Copy of the part of `image` covered by `rect`, cut off at the image border.
/// Fails with [`CropError::EmptyCrop`] if no pixel is left.
pub fn crop(image: &DynamicImage, rect: CropRect) -> Result<DynamicImage> {
    let region = rect
        .clamp_to(image.width(), image.height())
        .ok_or(CropError::EmptyCrop(rect, image.width(), image.height()))?;
    Ok(image.crop_imm(region.x, region.y, region.width, region.height))
}

// only color channels are written, alpha stays. Float images come back as 16bit
pub fn annotate(image: &DynamicImage, rect: CropRect, color: [u8; 3], thickness: u32) -> DynamicImage {
    let [r, g, b] = color;
    let wide = |c: u8| c as u16 * 257;
    let rgb16 = Rgb([wide(r), wide(g), wide(b)]);

    match image {
        DynamicImage::ImageRgb8(img) => mark(img, rect, Rgb(color), thickness, false).into(),
        DynamicImage::ImageRgba8(img) => mark(img, rect, Rgba([r, g, b, 255]), thickness, true).into(),
        DynamicImage::ImageRgb16(img) => mark(img, rect, rgb16, thickness, false).into(),
        DynamicImage::ImageRgba16(img) => {
            let [r, g, b] = rgb16.0;
            mark(img, rect, Rgba([r, g, b, u16::MAX]), thickness, true).into()
        }
        DynamicImage::ImageLuma8(img) => {
            let l: Luma<u8> = Rgb(color).to_luma();
            mark(img, rect, l, thickness, false).into()
        }
        DynamicImage::ImageLumaA8(img) => {
            let l: Luma<u8> = Rgb(color).to_luma();
            mark(img, rect, LumaA([l.0[0], 255]), thickness, true).into()
        }
        DynamicImage::ImageLuma16(img) => {
            let l: Luma<u16> = rgb16.to_luma();
            mark(img, rect, l, thickness, false).into()
        }
        DynamicImage::ImageLumaA16(img) => {
            let l: Luma<u16> = rgb16.to_luma();
            mark(img, rect, LumaA([l.0[0], u16::MAX]), thickness, true).into()
        }
        DynamicImage::ImageRgb32F(_) => {
            annotate(&DynamicImage::ImageRgb16(image.to_rgb16()), rect, color, thickness)
        }
        _ => annotate(&DynamicImage::ImageRgba16(image.to_rgba16()), rect, color, thickness),
    }
}

fn mark<P: Pixel>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    rect: CropRect,
    color: P,
    thickness: u32,
    has_alpha: bool,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let mut out = src.clone();
    let color_channels = P::CHANNEL_COUNT as usize - usize::from(has_alpha);
    let mut canvas = ColorChannels {
        image: &mut out,
        color_channels,
    };
    draw_outline(&mut canvas, rect, color, thickness);
    out
}

// nested 1px rectangles centered on the corner polygon
fn draw_outline<C: Canvas>(canvas: &mut C, rect: CropRect, color: C::Pixel, thickness: u32) {
    let r = rect.normalized();
    let t = thickness.max(1) as i64;
    let (x0, y0) = (r.x as i64, r.y as i64);
    let (w, h) = (r.width as i64, r.height as i64);

    for k in -(t / 2)..=((t - 1) / 2) {
        let (rw, rh) = (w + 1 - 2 * k, h + 1 - 2 * k);
        if rw < 1 || rh < 1 {
            continue;
        }
        let band = Rect::at((x0 + k) as i32, (y0 + k) as i32).of_size(rw as u32, rh as u32);
        draw_hollow_rect_mut(canvas, band, color);
    }
}

struct ColorChannels<'a, P: Pixel> {
    image: &'a mut ImageBuffer<P, Vec<P::Subpixel>>,
    color_channels: usize,
}

impl<P: Pixel> Canvas for ColorChannels<'_, P> {
    type Pixel = P;

    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn get_pixel(&self, x: u32, y: u32) -> P {
        *self.image.get_pixel(x, y)
    }

    fn draw_pixel(&mut self, x: u32, y: u32, color: P) {
        let n = self.color_channels;
        let px = self.image.get_pixel_mut(x, y);
        px.channels_mut()[..n].copy_from_slice(&color.channels()[..n]);
    }
}

pub fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder =
        PngEncoder::new_with_quality(&mut writer, CompressionType::Best, FilterType::Adaptive);
    png_compatible(image).write_with_encoder(encoder)?;
    writer.flush()?;
    Ok(())
}

fn png_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb32F(_) => Cow::Owned(DynamicImage::ImageRgb16(image.to_rgb16())),
        DynamicImage::ImageRgba32F(_) => Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16())),
        _ => Cow::Borrowed(image),
    }
}
