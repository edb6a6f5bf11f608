//! CSS box-shadow backend.
//!
//! A single `cell_size` element is pulled up and left by one cell through a
//! negative margin; each painted cell becomes one `box-shadow` entry offset
//! from it. The trailing margins reserve room for the whole mosaic.

use std::fmt;

use super::{Output, RenderContext, Renderer};
use crate::canvas::Color;
use crate::errors::Result;
use crate::options::{OutputType, Shape};

/// One `Xpx Ypx 0 color` shadow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowEntry {
    pub x: u64,
    pub y: u64,
    pub color: Color,
}

impl fmt::Display for ShadowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}px 0 {}", self.x, self.y, self.color)
    }
}

/// Element styled so its shadows draw the mosaic
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowMosaic {
    pub cell_size: u32,
    /// Right and bottom margins: the scaled grid size
    pub extent: (u64, u64),
    pub rounded: bool,
    pub shadows: Vec<ShadowEntry>,
}

impl ShadowMosaic {
    /// CSS `margin` shorthand: top right bottom left
    pub fn margin(&self) -> String {
        format!(
            "-{cs}px {}px {}px -{cs}px",
            self.extent.0,
            self.extent.1,
            cs = self.cell_size
        )
    }

    /// CSS `box-shadow` value, comma-joined
    pub fn box_shadow(&self) -> String {
        self.shadows
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Inline style declarations for the element
    pub fn style(&self) -> String {
        let mut style = format!(
            "margin:{};width:{cs}px;height:{cs}px",
            self.margin(),
            cs = self.cell_size
        );
        if self.rounded {
            style.push_str(";border-radius:100%");
        }
        if !self.shadows.is_empty() {
            style.push_str(";box-shadow:");
            style.push_str(&self.box_shadow());
        }
        style
    }

    pub fn to_html(&self) -> String {
        format!(r#"<div style="{}"></div>"#, self.style())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ShadowMosaicRenderer;

impl ShadowMosaicRenderer {
    pub fn build(&self, ctx: &RenderContext<'_>) -> ShadowMosaic {
        let size = u64::from(ctx.cell_size);
        let shadows = ctx
            .painted_cells()
            .map(|cell| ShadowEntry {
                x: (u64::from(cell.x) + 1) * size,
                y: (u64::from(cell.y) + 1) * size,
                color: cell.color,
            })
            .collect();

        ShadowMosaic {
            cell_size: ctx.cell_size,
            extent: (
                u64::from(ctx.grid.width) * size,
                u64::from(ctx.grid.height) * size,
            ),
            rounded: ctx.shape == Shape::Circle,
            shadows,
        }
    }
}

impl Renderer for ShadowMosaicRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Output> {
        Ok(Output::ShadowMosaic(self.build(ctx)))
    }

    fn output_type(&self) -> OutputType {
        OutputType::ShadowMosaic
    }
}
