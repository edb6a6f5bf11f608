//! Raster backend: cells composited onto a fresh surface

use tracing::debug;

use super::{Output, RenderContext, Renderer};
use crate::canvas::RasterSurface;
use crate::errors::Result;
use crate::options::{OutputType, Shape};

/// Rendered raster plus the number of cells painted on it
#[derive(Debug)]
pub struct RasterImage {
    pub surface: Box<dyn RasterSurface>,
    pub shapes: usize,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Row-major RGBA8 pixels
    pub fn rgba8(&self) -> Vec<u8> {
        self.surface.to_rgba8()
    }
}

/// Draws each cell as a `cell_size` square or a circle of that diameter
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterRenderer;

impl RasterRenderer {
    pub fn draw(&self, ctx: &RenderContext<'_>) -> RasterImage {
        let (width, height) = ctx.scaled_size();
        let mut surface = ctx.surfaces.create(width, height);
        let size = f64::from(ctx.cell_size);
        let mut shapes = 0;

        for cell in ctx.painted_cells() {
            let x = f64::from(cell.x);
            let y = f64::from(cell.y);
            match ctx.shape {
                Shape::Circle => {
                    surface.fill_circle((x + 0.5) * size, (y + 0.5) * size, size / 2.0, cell.color);
                }
                Shape::Square => surface.fill_rect(x * size, y * size, size, size, cell.color),
            }
            shapes += 1;
        }

        debug!("Rasterized {} cells onto {}x{}", shapes, width, height);
        RasterImage { surface, shapes }
    }
}

impl Renderer for RasterRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Output> {
        Ok(Output::Raster(self.draw(ctx)))
    }

    fn output_type(&self) -> OutputType {
        OutputType::Raster
    }
}
