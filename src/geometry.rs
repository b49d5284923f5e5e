//! Pixel geometry shared by the batch and interactive croppers

use std::fmt;
use std::str::FromStr;

use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::errors::CropError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// width and height can be negative while a selection is dragged up or left of its anchor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CropRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn normalized(&self) -> Self {
        Self::from_corners(
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y + self.height),
        )
    }

    /// Intersection with an image of the given size. `None` if nothing is left, which includes
    /// every rectangle with zero or negative width or height.
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Option<PixelRegion> {
        let x0 = self.x.max(0) as i64;
        let y0 = self.y.max(0) as i64;
        let x1 = (self.x as i64 + self.width as i64).min(image_width as i64);
        let y1 = (self.y as i64 + self.height as i64).min(image_height as i64);

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(PixelRegion {
                x: x0 as u32,
                y: y0 as u32,
                width: (x1 - x0) as u32,
                height: (y1 - y0) as u32,
            })
        }
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={}, y={}, width={}, height={}",
            self.x, self.y, self.width, self.height
        )
    }
}

// "x,y,width,height"
impl FromStr for CropRect {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CropError::InvalidRect(format!("'{}': {}", s, e)))?;

        match values.as_slice() {
            [x, y, width, height] => Ok(CropRect::new(*x, *y, *width, *height)),
            _ => Err(CropError::InvalidRect(format!(
                "'{}': expected x,y,width,height",
                s
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct ImageViewport {
    pub screen_rect: egui::Rect,
    pub image_width: u32,
    pub image_height: u32,
}

impl ImageViewport {
    pub fn new(screen_rect: egui::Rect, image_width: u32, image_height: u32) -> Self {
        Self {
            screen_rect,
            image_width,
            image_height,
        }
    }

    fn scale(&self) -> egui::Vec2 {
        egui::vec2(
            self.screen_rect.width() / self.image_width as f32,
            self.screen_rect.height() / self.image_height as f32,
        )
    }

    // truncates towards the lower pixel, None if not over the image
    pub fn to_image(&self, pos: egui::Pos2) -> Option<Point> {
        if !self.screen_rect.contains(pos) || self.image_width == 0 || self.image_height == 0 {
            return None;
        }
        let rel = (pos - self.screen_rect.min) / self.scale();
        let x = (rel.x.floor() as i32).min(self.image_width as i32 - 1);
        let y = (rel.y.floor() as i32).min(self.image_height as i32 - 1);
        Some(Point::new(x, y))
    }

    pub fn to_screen(&self, p: Point) -> egui::Pos2 {
        let scale = self.scale();
        self.screen_rect.min + egui::vec2(p.x as f32 * scale.x, p.y as f32 * scale.y)
    }

    pub fn rect_to_screen(&self, rect: CropRect) -> egui::Rect {
        let r = rect.normalized();
        egui::Rect::from_min_max(
            self.to_screen(Point::new(r.x, r.y)),
            self.to_screen(Point::new(r.x + r.width, r.y + r.height)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_negative_extents() {
        let r = CropRect::new(120, 80, -70, -30).normalized();
        assert_eq!(r, CropRect::new(50, 50, 70, 30));

        let r = CropRect::from_corners(Point::new(10, 40), Point::new(30, 5));
        assert_eq!(r, CropRect::new(10, 5, 20, 35));
    }

    #[test]
    fn clamps_to_image_bounds() {
        let r = CropRect::new(239, 152, 94, 94);
        assert_eq!(
            r.clamp_to(512, 512),
            Some(PixelRegion { x: 239, y: 152, width: 94, height: 94 })
        );

        let r = CropRect::new(480, -10, 64, 30);
        assert_eq!(
            r.clamp_to(512, 512),
            Some(PixelRegion { x: 480, y: 0, width: 32, height: 20 })
        );

        assert_eq!(CropRect::new(600, 0, 10, 10).clamp_to(512, 512), None);
        assert_eq!(CropRect::new(10, 10, 0, 10).clamp_to(512, 512), None);
        assert_eq!(CropRect::new(10, 10, -5, 10).clamp_to(512, 512), None);
    }

    #[test]
    fn parses_rect_text() {
        let r: CropRect = "239, 152,94,94".parse().unwrap();
        assert_eq!(r, CropRect::new(239, 152, 94, 94));

        assert!("1,2,3".parse::<CropRect>().is_err());
        assert!("1,2,x,4".parse::<CropRect>().is_err());
    }

    #[test]
    fn display_format() {
        let r = CropRect::new(50, 50, 70, 70);
        assert_eq!(r.to_string(), "x=50, y=50, width=70, height=70");
    }

    #[test]
    fn viewport_truncates_pointer_positions() {
        // 200x100 image shown at half size
        let vp = ImageViewport::new(
            egui::Rect::from_min_size(egui::pos2(20.0, 20.0), egui::vec2(100.0, 50.0)),
            200,
            100,
        );

        assert_eq!(vp.to_image(egui::pos2(20.0, 20.0)), Some(Point::new(0, 0)));
        assert_eq!(vp.to_image(egui::pos2(20.9, 21.4)), Some(Point::new(1, 2)));
        assert_eq!(vp.to_image(egui::pos2(120.0, 70.0)), Some(Point::new(199, 99)));
        assert_eq!(vp.to_image(egui::pos2(19.0, 30.0)), None);
        assert_eq!(vp.to_image(egui::pos2(50.0, 71.0)), None);

        assert_eq!(vp.to_screen(Point::new(100, 50)), egui::pos2(70.0, 45.0));
    }
}
