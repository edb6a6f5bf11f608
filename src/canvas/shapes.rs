//! Geometric shapes for canvas drawing

use super::Color;

/// 2D point with f64 coordinates (subpixel precision)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area shared with another rectangle
    #[inline]
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.left().max(other.left());
        let h = self.bottom().min(other.bottom()) - self.top().max(other.top());
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

/// Shape trait for drawable primitives
pub trait Shape {
    /// Draw the shape onto a pixel buffer
    fn rasterize(&self, width: u32, height: u32, pixels: &mut [Color]);

    /// Bounding box of the shape
    fn bounds(&self) -> Rect;
}

/// Pixel range `[min, max)` touched by a bounding box, clipped to the buffer
fn pixel_span(bounds: &Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let min_x = bounds.left().floor().max(0.0);
    let min_y = bounds.top().floor().max(0.0);
    let max_x = bounds.right().ceil().min(f64::from(width));
    let max_y = bounds.bottom().ceil().min(f64::from(height));

    if min_x >= max_x || min_y >= max_y {
        return None;
    }
    Some((min_x as u32, min_y as u32, max_x as u32, max_y as u32))
}

/// Solid rectangle with per-pixel area coverage
#[derive(Debug, Clone, Copy)]
pub struct FilledRect {
    pub rect: Rect,
    pub color: Color,
}

impl FilledRect {
    pub fn new(rect: Rect, color: Color) -> Self {
        Self { rect, color }
    }
}

impl Shape for FilledRect {
    fn rasterize(&self, width: u32, height: u32, pixels: &mut [Color]) {
        let Some((min_x, min_y, max_x, max_y)) = pixel_span(&self.rect, width, height) else {
            return;
        };

        for py in min_y..max_y {
            for px in min_x..max_x {
                let cell = Rect::new(f64::from(px), f64::from(py), 1.0, 1.0);
                let coverage = self.rect.overlap_area(&cell) as f32;
                if coverage > 0.0 {
                    let idx = (py * width + px) as usize;
                    if idx < pixels.len() {
                        pixels[idx] = self.color.with_coverage(coverage).blend_over(&pixels[idx]);
                    }
                }
            }
        }
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Solid disc with a one-pixel anti-aliased edge
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub color: Color,
}

impl Circle {
    pub fn new(center: Point, radius: f64, color: Color) -> Self {
        Self {
            center,
            radius,
            color,
        }
    }
}

impl Shape for Circle {
    fn rasterize(&self, width: u32, height: u32, pixels: &mut [Color]) {
        let r = self.radius;
        let Some((min_x, min_y, max_x, max_y)) = pixel_span(&self.bounds(), width, height) else {
            return;
        };

        for py in min_y..max_y {
            for px in min_x..max_x {
                // Distance from the pixel center
                let center = Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
                let dist = center.distance(&self.center);

                let intensity = if dist <= r - 0.5 {
                    1.0
                } else if dist <= r + 0.5 {
                    (r + 0.5 - dist) as f32
                } else {
                    0.0
                };

                if intensity > 0.0 {
                    let idx = (py * width + px) as usize;
                    if idx < pixels.len() {
                        pixels[idx] = self.color.with_coverage(intensity).blend_over(&pixels[idx]);
                    }
                }
            }
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_overlap_area() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert_eq!(r.overlap_area(&Rect::new(1.0, 1.0, 2.0, 2.0)), 1.0);
        assert_eq!(r.overlap_area(&Rect::new(0.5, 0.0, 1.0, 0.5)), 0.5);
        assert_eq!(r.overlap_area(&Rect::new(3.0, 3.0, 1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_filled_rect_covers_exact_pixels() {
        let mut pixels = vec![Color::TRANSPARENT; 16];
        FilledRect::new(Rect::new(1.0, 1.0, 2.0, 2.0), Color::RED).rasterize(4, 4, &mut pixels);

        let painted: Vec<usize> = pixels
            .iter()
            .enumerate()
            .filter(|(_, c)| c.a > 0.0)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(painted, vec![5, 6, 9, 10]);
        assert_eq!(pixels[5].to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_filled_rect_clips_to_buffer() {
        let mut pixels = vec![Color::TRANSPARENT; 4];
        FilledRect::new(Rect::new(1.0, 1.0, 5.0, 5.0), Color::BLUE).rasterize(2, 2, &mut pixels);
        assert_eq!(pixels.iter().filter(|c| c.a > 0.0).count(), 1);
    }

    #[test]
    fn test_unit_circle_fills_single_pixel() {
        let mut pixels = vec![Color::TRANSPARENT; 9];
        Circle::new(Point::new(1.5, 1.5), 0.5, Color::GREEN).rasterize(3, 3, &mut pixels);
        assert_eq!(pixels[4].to_rgba8(), [0, 255, 0, 255]);
        assert_eq!(pixels.iter().filter(|c| c.a > 0.0).count(), 1);
    }

    #[test]
    fn test_circle_leaves_corners_empty() {
        let mut pixels = vec![Color::TRANSPARENT; 64];
        Circle::new(Point::new(4.0, 4.0), 4.0, Color::RED).rasterize(8, 8, &mut pixels);
        assert_eq!(pixels[0].a, 0.0);
        assert_eq!(pixels[(4 * 8 + 4) as usize].to_rgba8(), [255, 0, 0, 255]);
    }
}
