//! In-memory canvas with float coordinates and RGBA pixels

use std::io::Cursor;

use image::{imageops::FilterType, ImageFormat, RgbaImage};

use super::color::Color;
use super::shapes::{Circle, FilledRect, Point, Rect, Shape};
use super::surface::RasterSurface;
use crate::errors::{PixelError, Result};

/// Virtual framebuffer canvas
///
/// Coordinates are continuous (f64), not discrete.
/// Pixels are RGBA with alpha compositing.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel data (row-major, RGBA)
    pixels: Vec<Color>,
}

impl Canvas {
    /// Create a new transparent canvas with given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; size],
        }
    }

    /// Resize the canvas, discarding its content like a browser canvas does
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::TRANSPARENT; (width as usize) * (height as usize)];
    }

    /// Get pixel at coordinates
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set pixel at coordinates
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Draw a shape onto the canvas
    pub fn draw<S: Shape>(&mut self, shape: &S) {
        shape.rasterize(self.width, self.height, &mut self.pixels);
    }

    /// Get raw pixel data
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, RasterSurface::to_rgba8(self))
    }
}

impl RasterSurface for Canvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_image(&mut self, image: &RgbaImage, width: u32, height: u32) {
        self.set_size(width, height);
        if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }

        // Same-size draws copy pixels exactly
        let scaled = if image.dimensions() == (width, height) {
            image.clone()
        } else {
            image::imageops::resize(image, width, height, FilterType::Triangle)
        };
        for (x, y, px) in scaled.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            self.set_pixel(x, y, Color::from_rgba8(r, g, b, a));
        }
    }

    fn image_data(&self, x: u32, y: u32, width: u32, height: u32) -> Option<Vec<u8>> {
        if self.width == 0 || self.height == 0 {
            return None;
        }

        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for py in y..y.saturating_add(height) {
            for px in x..x.saturating_add(width) {
                // Outside the canvas reads as transparent black
                let color = self.get_pixel(px, py).unwrap_or(Color::TRANSPARENT);
                data.extend_from_slice(&color.to_rgba8());
            }
        }
        Some(data)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.draw(&FilledRect::new(Rect::new(x, y, width, height), color));
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        self.draw(&Circle::new(Point::new(cx, cy), radius, color));
    }

    fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(Color::to_rgba8).collect()
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        if self.width == 0 || self.height == 0 {
            return Err(PixelError::Encode(format!(
                "cannot encode a {}x{} raster",
                self.width, self.height
            )));
        }

        let image = self
            .to_image()
            .ok_or_else(|| PixelError::Encode("pixel buffer does not match dimensions".into()))?;

        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_new_canvas() {
        let canvas = Canvas::new(100, 50);
        assert_eq!(canvas.width, 100);
        assert_eq!(canvas.height, 50);
        assert_eq!(canvas.pixels.len(), 5000);
    }

    #[test]
    fn test_set_get_pixel() {
        let mut canvas = Canvas::new(10, 10);
        canvas.set_pixel(5, 5, Color::RED);
        assert_eq!(canvas.get_pixel(5, 5), Some(Color::RED));
        assert_eq!(canvas.get_pixel(10, 5), None);
    }

    #[test]
    fn test_empty_canvas_has_no_image_data() {
        let canvas = Canvas::new(4, 0);
        assert!(canvas.image_data(0, 0, 4, 0).is_none());
    }

    #[test]
    fn test_draw_image_same_size_is_exact() {
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        src.put_pixel(1, 0, Rgba([0, 0, 0, 0]));

        let mut canvas = Canvas::new(0, 0);
        canvas.draw_image(&src, 2, 1);
        let data = canvas.image_data(0, 0, 2, 1).unwrap_or_default();
        assert_eq!(data, vec![10, 20, 30, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn test_draw_image_downscales_uniform_color() {
        let src = RgbaImage::from_pixel(8, 4, Rgba([200, 100, 50, 255]));
        let mut canvas = Canvas::new(0, 0);
        canvas.draw_image(&src, 4, 2);
        assert_eq!((canvas.width, canvas.height), (4, 2));
        let px = canvas.get_pixel(3, 1).map(|c| c.to_rgba8()).unwrap_or_default();
        for (got, want) in px.iter().zip([200u8, 100, 50, 255]) {
            assert!(got.abs_diff(want) <= 1, "{px:?}");
        }
    }

    #[test]
    fn test_encode_png_round_trip() {
        let mut canvas = Canvas::new(3, 2);
        canvas.fill_rect(1.0, 0.0, 1.0, 1.0, Color::from_rgba8(1, 2, 3, 255));

        let png = canvas.encode_png().unwrap_or_default();
        let decoded = image::load_from_memory(&png).map(|img| img.to_rgba8().into_raw());
        assert_eq!(decoded.ok(), Some(RasterSurface::to_rgba8(&canvas)));
    }

    #[test]
    fn test_fill_circle_is_solid() {
        let mut canvas = Canvas::new(9, 9);
        canvas.fill_circle(4.5, 4.5, 4.5, Color::GREEN);

        // Every pixel within the inner radius is fully covered
        for (x, y) in [(4, 4), (3, 4), (4, 2), (6, 6), (2, 5)] {
            assert_eq!(canvas.get_pixel(x, y).map(|c| c.to_rgba8()), Some([0, 255, 0, 255]));
        }
        assert_eq!(canvas.get_pixel(0, 0).map(|c| c.a), Some(0.0));
    }

    #[test]
    fn test_encode_empty_canvas_fails() {
        assert!(Canvas::new(0, 3).encode_png().is_err());
    }
}
