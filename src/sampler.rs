//! Image-to-grid sampling.
//!
//! The source is drawn into a scratch surface at grid resolution, then read
//! back one RGBA sample per cell. Fully transparent samples become
//! [`Cell::Transparent`] so every renderer can skip them.

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::canvas::{Color, RasterSurface};
use crate::decoder::DecodedImage;

/// Downscaled grid size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid coordinates of a row-major cell index
    #[inline]
    pub fn position(&self, index: usize) -> (u32, u32) {
        let width = self.width.max(1) as usize;
        ((index % width) as u32, (index / width) as u32)
    }
}

/// Grid dimensions for a source scaled down to `columns` cells per row.
///
/// `height = round(source_height / source_width * columns)`, rounding halves up.
/// A zero-width source yields a zero-height grid.
pub fn compute_grid(source_width: u32, source_height: u32, columns: u32) -> GridDimensions {
    if source_width == 0 {
        return GridDimensions::new(columns, 0);
    }

    // Integer round-half-up of h * c / w; the product needs 64 bits
    let w = u64::from(source_width);
    let scaled = u64::from(source_height) * u64::from(columns);
    let (quotient, remainder) = (scaled / w, scaled % w);
    let height = if remainder >= w - remainder {
        quotient + 1
    } else {
        quotient
    };

    GridDimensions::new(columns, u32::try_from(height).unwrap_or(u32::MAX))
}

/// One sampled grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Omitted by every renderer
    Transparent,
    Color(Color),
}

impl Cell {
    #[inline]
    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Transparent => None,
            Cell::Color(color) => Some(*color),
        }
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        matches!(self, Cell::Transparent)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Transparent => f.write_str("transparent"),
            Cell::Color(color) => color.fmt(f),
        }
    }
}

/// Row-major per-cell samples, `width * height` long
pub type ColorArray = Vec<Cell>;

/// Read one sample per cell from `surface`.
///
/// Returns an empty array when the surface has no readable data yet.
pub fn sample_colors(
    surface: &dyn RasterSurface,
    width: u32,
    height: u32,
    transform: Option<&dyn Fn(Color) -> Color>,
) -> ColorArray {
    let Some(data) = surface.image_data(0, 0, width, height) else {
        debug!("Surface has no readable data, nothing sampled");
        return ColorArray::new();
    };

    data.chunks_exact(4)
        .map(|px| {
            if px[3] == 0 {
                return Cell::Transparent;
            }
            let color = Color::from_rgba8(px[0], px[1], px[2], px[3]);
            Cell::Color(transform.map_or(color, |apply| apply(color)))
        })
        .collect()
}

/// Draw `image` into `surface` at grid resolution and sample it
#[instrument(level = "debug", skip(surface, image, transform))]
pub fn sample_image(
    surface: &mut dyn RasterSurface,
    image: &DecodedImage,
    grid: GridDimensions,
    transform: Option<&dyn Fn(Color) -> Color>,
) -> ColorArray {
    surface.draw_image(&image.pixels, grid.width, grid.height);
    let colors = sample_colors(surface, grid.width, grid.height, transform);
    debug!(
        "Sampled {} cells ({} transparent)",
        colors.len(),
        colors.iter().filter(|c| c.is_transparent()).count()
    );
    colors
}
