#![allow(clippy::module_inception)]

//! # to-pixels
//!
//! Turns an image into pixel art. The source is downsampled onto a coarse
//! grid (`columns` cells per row, height following the aspect ratio) and each
//! sample is drawn back as an enlarged square or circle in one of four forms:
//! a raster canvas, an SVG document, a PNG data URL or a CSS box-shadow
//! mosaic.
//!
//! ```no_run
//! # async fn demo() -> to_pixels::Result<()> {
//! use to_pixels::{PixelArt, PixelOptions, Target};
//!
//! let mut art = PixelArt::new(PixelOptions::with_source("cat.png"), Target::Detached)?;
//! art.load().await?;
//! if let Some(query) = art.get("svg")? {
//!     println!("{:?}", query.into_output().and_then(|o| o.to_markup()));
//! }
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod decoder;
pub mod errors;
pub mod mount;
pub mod options;
pub mod pixel;
pub mod render;
pub mod sampler;
pub mod transform;

pub use decoder::{DecodedImage, FsDecoder, ImageDecoder, MemoryDecoder};
pub use errors::{PixelError, Result};
pub use mount::{MemoryMount, MountPoint, ReadyEvent, Target};
pub use options::{OutputType, PixelOptions, Request, Shape};
pub use pixel::{ColorSamples, PendingSource, PixelArt, Query, SourceReady};
pub use render::{Output, Renderer};
pub use sampler::{compute_grid, Cell, ColorArray, GridDimensions};
pub use transform::{ColorTransform, ColorTransformer, HslTransformer};
