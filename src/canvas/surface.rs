//! Raster surface capability consumed by the sampler and raster renderer

use std::fmt::Debug;

use image::RgbaImage;

use super::canvas::Canvas;
use super::color::Color;
use crate::errors::Result;

/// Scratch 2-D buffer the core draws into and reads back from
pub trait RasterSurface: Debug + Send + Sync {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Resize to `width`×`height` and draw `image` stretched to fill it
    fn draw_image(&mut self, image: &RgbaImage, width: u32, height: u32);

    /// RGBA8 samples for a region, or `None` when the surface holds no readable data
    fn image_data(&self, x: u32, y: u32, width: u32, height: u32) -> Option<Vec<u8>>;

    /// Composite a solid rectangle
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Composite a solid circle
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color);

    /// Whole surface as row-major RGBA8 bytes
    fn to_rgba8(&self) -> Vec<u8>;

    /// Encode the surface as PNG
    fn encode_png(&self) -> Result<Vec<u8>>;
}

/// Creates surfaces on behalf of the core so hosts can swap the backend
pub trait SurfaceFactory: Debug + Send + Sync {
    fn create(&self, width: u32, height: u32) -> Box<dyn RasterSurface>;
}

/// Factory for the built-in [`Canvas`]
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasFactory;

impl SurfaceFactory for CanvasFactory {
    fn create(&self, width: u32, height: u32) -> Box<dyn RasterSurface> {
        Box::new(Canvas::new(width, height))
    }
}
