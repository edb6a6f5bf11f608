//! Still-image backend: the raster form encoded as a PNG data URL

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use super::raster::RasterRenderer;
use super::{Output, RenderContext, Renderer};
use crate::canvas::RasterSurface;
use crate::errors::Result;
use crate::options::OutputType;

/// What a zero-area raster encodes to
pub const EMPTY_DATA_URL: &str = "data:,";

const PNG_PREFIX: &str = "data:image/png;base64,";

/// Displayable image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    /// Cells painted on the underlying raster
    pub shapes: usize,
}

impl ImageRef {
    /// Encoded PNG bytes, or `None` for the empty image
    pub fn png_bytes(&self) -> Option<Vec<u8>> {
        let payload = self.data_url.strip_prefix(PNG_PREFIX)?;
        BASE64.decode(payload).ok()
    }

    /// `<img>` tag pointing at the data URL
    pub fn to_html(&self) -> String {
        format!(
            r#"<img src="{}" width="{}" height="{}">"#,
            self.data_url, self.width, self.height
        )
    }
}

/// Encode a surface as a `data:image/png;base64,` URL
pub fn encode_data_url(surface: &dyn RasterSurface) -> Result<String> {
    if surface.width() == 0 || surface.height() == 0 {
        return Ok(EMPTY_DATA_URL.to_string());
    }
    let png = surface.encode_png()?;
    debug!("Encoded {}x{} raster into {} PNG bytes", surface.width(), surface.height(), png.len());
    Ok(format!("{PNG_PREFIX}{}", BASE64.encode(png)))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRenderer;

impl Renderer for ImageRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Output> {
        let raster = RasterRenderer.draw(ctx);
        let data_url = encode_data_url(raster.surface.as_ref())?;
        Ok(Output::Image(ImageRef {
            data_url,
            width: raster.width(),
            height: raster.height(),
            shapes: raster.shapes,
        }))
    }

    fn output_type(&self) -> OutputType {
        OutputType::Image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, CanvasFactory, Color};
    use crate::options::Shape;
    use crate::sampler::{Cell, GridDimensions};

    #[test]
    fn test_empty_surface_encodes_empty_url() -> Result<()> {
        assert_eq!(encode_data_url(&Canvas::new(0, 0))?, EMPTY_DATA_URL);
        Ok(())
    }

    #[test]
    fn test_image_decodes_to_raster_pixels() -> Result<()> {
        let colors = [Cell::Color(Color::from_rgba8(10, 20, 30, 128)), Cell::Transparent];
        let ctx = RenderContext {
            colors: &colors,
            grid: GridDimensions::new(1, 2),
            cell_size: 4,
            shape: Shape::Circle,
            surfaces: &CanvasFactory,
        };

        let Output::Image(image) = ImageRenderer.render(&ctx)? else {
            panic!("expected an image output");
        };
        assert!(image.data_url.starts_with("data:image/png;base64,"));
        assert_eq!((image.width, image.height), (4, 8));

        let png = image.png_bytes().unwrap_or_default();
        let decoded = ::image::load_from_memory(&png).map(|i| i.to_rgba8().into_raw()).ok();
        assert_eq!(decoded, Some(RasterRenderer.draw(&ctx).rgba8()));
        Ok(())
    }
}
