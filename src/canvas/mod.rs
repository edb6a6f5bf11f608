//! # Canvas - raster surface for sampling and drawing
//!
//! The canvas plays two roles:
//! 1. Scratch buffer: the decoded source is drawn at grid resolution and read back
//! 2. Output raster: pixel-art cells are composited as squares or circles
//!
//! ```text
//!   decoded image ──draw_image──▶ ┌──────────────┐ ──image_data──▶ color array
//!                                 │ RasterSurface │
//!   color array ──fill_rect/────▶ └──────────────┘ ──encode_png──▶ data URL
//!                 fill_circle
//! ```

mod canvas;
mod color;
mod shapes;
mod surface;

pub use canvas::Canvas;
pub use color::Color;
pub use shapes::{Circle, FilledRect, Point, Rect, Shape};
pub use surface::{CanvasFactory, RasterSurface, SurfaceFactory};
