//! Vector backend: one SVG element per cell, in grid units

use std::fmt::Write as _;

use super::{Output, RenderContext, Renderer};
use crate::canvas::Color;
use crate::errors::Result;
use crate::options::{OutputType, Shape};
use crate::sampler::GridDimensions;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// A single SVG shape
#[derive(Debug, Clone, PartialEq)]
pub enum SvgElement {
    /// Unit square with its top-left corner at `(x, y)`
    Rect { x: u32, y: u32, fill: Color },
    /// Circle of radius `r` centered at `(cx, cy)`
    Circle { cx: f64, cy: f64, r: f64, fill: Color },
}

impl SvgElement {
    pub fn fill(&self) -> Color {
        match self {
            SvgElement::Rect { fill, .. } | SvgElement::Circle { fill, .. } => *fill,
        }
    }

    /// Grid cell the element belongs to
    pub fn cell(&self) -> (u32, u32) {
        match self {
            SvgElement::Rect { x, y, .. } => (*x, *y),
            SvgElement::Circle { cx, cy, .. } => (cx.floor() as u32, cy.floor() as u32),
        }
    }

    fn write_markup(&self, out: &mut String) {
        // Writing into a String cannot fail
        let _ = match self {
            SvgElement::Rect { x, y, fill } => write!(
                out,
                r#"<rect fill="{fill}" x="{x}" y="{y}" width="1" height="1"/>"#
            ),
            SvgElement::Circle { cx, cy, r, fill } => write!(
                out,
                r#"<circle fill="{fill}" cx="{cx}" cy="{cy}" r="{r}"/>"#
            ),
        };
    }
}

/// SVG document whose view box is the grid and whose display size is scaled
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub view_box: GridDimensions,
    pub width: u32,
    pub height: u32,
    pub elements: Vec<SvgElement>,
}

impl SvgDocument {
    /// Serialized `<svg>` markup
    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(128 + self.elements.len() * 64);
        // Infallible for String
        let _ = write!(
            out,
            r#"<svg xmlns="{}" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            SVG_NAMESPACE, self.view_box.width, self.view_box.height, self.width, self.height
        );
        for element in &self.elements {
            element.write_markup(&mut out);
        }
        out.push_str("</svg>");
        out
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct VectorRenderer;

impl VectorRenderer {
    pub fn build(&self, ctx: &RenderContext<'_>) -> SvgDocument {
        let (width, height) = ctx.scaled_size();
        let elements = ctx
            .painted_cells()
            .map(|cell| match ctx.shape {
                Shape::Circle => SvgElement::Circle {
                    cx: f64::from(cell.x) + 0.5,
                    cy: f64::from(cell.y) + 0.5,
                    r: 0.5,
                    fill: cell.color,
                },
                Shape::Square => SvgElement::Rect {
                    x: cell.x,
                    y: cell.y,
                    fill: cell.color,
                },
            })
            .collect();

        SvgDocument {
            view_box: ctx.grid,
            width,
            height,
            elements,
        }
    }
}

impl Renderer for VectorRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Output> {
        Ok(Output::Vector(self.build(ctx)))
    }

    fn output_type(&self) -> OutputType {
        OutputType::Vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasFactory;
    use crate::sampler::Cell;

    #[test]
    fn test_markup_for_squares() {
        let colors = [Cell::Transparent, Cell::Color(Color::RED)];
        let ctx = RenderContext {
            colors: &colors,
            grid: GridDimensions::new(2, 1),
            cell_size: 10,
            shape: Shape::Square,
            surfaces: &CanvasFactory,
        };
        let markup = VectorRenderer.build(&ctx).to_markup();
        assert_eq!(
            markup,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 2 1" width="20" height="10"><rect fill="rgba(255,0,0,1)" x="1" y="0" width="1" height="1"/></svg>"#
        );
    }

    #[test]
    fn test_circles_are_centered_in_cells() {
        let colors = [
            Cell::Transparent,
            Cell::Transparent,
            Cell::Transparent,
            Cell::Color(Color::GREEN),
        ];
        let ctx = RenderContext {
            colors: &colors,
            grid: GridDimensions::new(2, 2),
            cell_size: 3,
            shape: Shape::Circle,
            surfaces: &CanvasFactory,
        };
        let svg = VectorRenderer.build(&ctx);
        assert_eq!(
            svg.elements,
            vec![SvgElement::Circle {
                cx: 1.5,
                cy: 1.5,
                r: 0.5,
                fill: Color::GREEN
            }]
        );
        assert_eq!(svg.elements[0].cell(), (1, 1));
        let circle = r#"<circle fill="rgba(0,255,0,1)" cx="1.5" cy="1.5" r="0.5"/>"#;
        assert!(svg.to_markup().contains(circle));
    }
}
