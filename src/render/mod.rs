//! # Renderers - color array to output form
//!
//! Every backend walks the color array with the same row-major arithmetic
//! and skips transparent cells:
//!
//! ```text
//!                 ┌─────────────────────────┐
//!                 │       Color array       │
//!                 │  (row-major, w × h)     │
//!                 └───────────┬─────────────┘
//!          ┌────────────┬─────┴──────┬─────────────┐
//!          ▼            ▼            ▼             ▼
//!    ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────┐
//!    │  Raster  │ │  Vector  │ │  Image   │ │ ShadowMosaic │
//!    │  canvas  │ │   SVG    │ │ PNG data │ │  box-shadow  │
//!    └──────────┘ └──────────┘ └──────────┘ └──────────────┘
//! ```

mod image;
mod raster;
mod shadow;
mod vector;

pub use self::image::{encode_data_url, ImageRef, ImageRenderer, EMPTY_DATA_URL};
pub use raster::{RasterImage, RasterRenderer};
pub use shadow::{ShadowEntry, ShadowMosaic, ShadowMosaicRenderer};
pub use vector::{SvgDocument, SvgElement, VectorRenderer, SVG_NAMESPACE};

use crate::canvas::{Color, SurfaceFactory};
use crate::errors::Result;
use crate::options::{OutputType, Shape};
use crate::sampler::{Cell, GridDimensions};

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub colors: &'a [Cell],
    pub grid: GridDimensions,
    pub cell_size: u32,
    pub shape: Shape,
    pub surfaces: &'a dyn SurfaceFactory,
}

/// A non-transparent cell with its grid coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintedCell {
    pub x: u32,
    pub y: u32,
    pub color: Color,
}

impl<'a> RenderContext<'a> {
    /// Non-transparent cells in row-major order.
    ///
    /// The row counter advances whenever the column wraps back to zero.
    pub fn painted_cells(&self) -> impl Iterator<Item = PaintedCell> + 'a {
        let width = self.grid.width.max(1);
        let mut row: Option<u32> = None;

        self.colors.iter().enumerate().filter_map(move |(index, cell)| {
            let x = (index % width as usize) as u32;
            if x == 0 {
                row = Some(row.map_or(0, |r| r + 1));
            }
            let y = row.unwrap_or(0);
            cell.color().map(|color| PaintedCell { x, y, color })
        })
    }

    /// Output size in display units
    pub fn scaled_size(&self) -> (u32, u32) {
        (
            self.grid.width.saturating_mul(self.cell_size),
            self.grid.height.saturating_mul(self.cell_size),
        )
    }
}

/// A rendered output form
#[derive(Debug)]
pub enum Output {
    Raster(RasterImage),
    Vector(SvgDocument),
    Image(ImageRef),
    ShadowMosaic(ShadowMosaic),
}

impl Output {
    pub fn output_type(&self) -> OutputType {
        match self {
            Output::Raster(_) => OutputType::Raster,
            Output::Vector(_) => OutputType::Vector,
            Output::Image(_) => OutputType::Image,
            Output::ShadowMosaic(_) => OutputType::ShadowMosaic,
        }
    }

    /// Number of cells drawn
    pub fn shape_count(&self) -> usize {
        match self {
            Output::Raster(raster) => raster.shapes,
            Output::Vector(svg) => svg.elements.len(),
            Output::Image(image) => image.shapes,
            Output::ShadowMosaic(mosaic) => mosaic.shadows.len(),
        }
    }

    /// True when no cell was drawn
    pub fn is_empty(&self) -> bool {
        self.shape_count() == 0
    }

    /// Textual form: SVG markup, `<img>` tag, or `<div>` with inline style.
    /// Rasters have no markup and yield `None`.
    pub fn to_markup(&self) -> Option<String> {
        match self {
            Output::Raster(_) => None,
            Output::Vector(svg) => Some(svg.to_markup()),
            Output::Image(image) => Some(image.to_html()),
            Output::ShadowMosaic(mosaic) => Some(mosaic.to_html()),
        }
    }
}

/// Strategy that turns a color array into one output form
pub trait Renderer: Send + Sync {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Output>;

    /// Output form this renderer produces
    fn output_type(&self) -> OutputType;
}

/// Strategy object for an output type
pub fn select_renderer(output: OutputType) -> Box<dyn Renderer> {
    match output {
        OutputType::Raster => Box::new(RasterRenderer),
        OutputType::Vector => Box::new(VectorRenderer),
        OutputType::Image => Box::new(ImageRenderer),
        OutputType::ShadowMosaic => Box::new(ShadowMosaicRenderer),
    }
}
