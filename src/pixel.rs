//! Pixel-art instance: options, source readiness and the cached color array.
//!
//! Sampling depends on `(source, columns, color transform)`; the color array is
//! memoized on exactly that tuple. Presentation options (cell size, shape,
//! output type) only re-render from the cached array.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::canvas::{CanvasFactory, Color, RasterSurface, SurfaceFactory};
use crate::decoder::{DecodedImage, FsDecoder, ImageDecoder};
use crate::errors::Result;
use crate::mount::{ReadyEvent, Target};
use crate::options::{
    validate_cell_size, validate_columns, OutputType, PixelOptions, Request, Shape,
};
use crate::render::{encode_data_url, select_renderer, Output, RasterRenderer, RenderContext};
use crate::sampler::{compute_grid, sample_image, Cell, ColorArray, GridDimensions};
use crate::transform::{ColorTransform, ColorTransformer, HslTransformer};

/// Inputs the color array is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SampleKey {
    generation: u64,
    columns: u32,
    transform: (bool, Option<u32>, Option<u32>, Option<u32>),
}

#[derive(Debug)]
struct Samples {
    key: SampleKey,
    grid: GridDimensions,
    colors: ColorArray,
}

#[derive(Debug)]
struct LoadedSource {
    generation: u64,
    source: String,
    image: DecodedImage,
}

/// A source request that has not resolved yet
#[derive(Debug)]
pub struct PendingSource {
    generation: u64,
    source: String,
    decoder: Arc<dyn ImageDecoder>,
}

impl PendingSource {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Decode the source; resolves exactly once
    pub async fn resolve(self) -> SourceReady {
        let result = self.decoder.decode(&self.source).await;
        SourceReady {
            generation: self.generation,
            source: self.source,
            result,
        }
    }
}

/// Outcome of a [`PendingSource`], to be handed back to [`PixelArt::complete_source`]
#[derive(Debug)]
pub struct SourceReady {
    generation: u64,
    source: String,
    result: Result<DecodedImage>,
}

/// Raw samples handed out by the `colorArray` query
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSamples {
    colors: ColorArray,
    columns: u32,
}

impl ColorSamples {
    /// Invoke `callback` with the color array and the grid column count
    pub fn deliver<R>(self, callback: impl FnOnce(&[Cell], u32) -> R) -> R {
        callback(&self.colors, self.columns)
    }
}

/// Result of a query
#[derive(Debug)]
pub enum Query {
    Output(Output),
    DataUrl(String),
    Samples(ColorSamples),
}

impl Query {
    /// The rendered output, if this query produced one
    pub fn into_output(self) -> Option<Output> {
        match self {
            Query::Output(output) => Some(output),
            _ => None,
        }
    }
}

/// Converts one image source into pixel art
#[derive(Debug)]
pub struct PixelArt {
    options: PixelOptions,
    target: Target,
    decoder: Arc<dyn ImageDecoder>,
    surfaces: Arc<dyn SurfaceFactory>,
    transformer: Arc<dyn ColorTransformer>,
    /// Private scratch surface the source is sampled through
    scratch: Box<dyn RasterSurface>,
    generation: u64,
    loaded: Option<LoadedSource>,
    samples: Option<Samples>,
    resamples: u64,
}

impl PixelArt {
    /// Create an instance; no source is requested until [`PixelArt::load`] or
    /// [`PixelArt::set_source`]
    pub fn new(options: PixelOptions, target: Target) -> Result<Self> {
        options.validate()?;
        let surfaces: Arc<dyn SurfaceFactory> = Arc::new(CanvasFactory);
        Ok(Self {
            options,
            target,
            decoder: Arc::new(FsDecoder::new()),
            scratch: surfaces.create(0, 0),
            surfaces,
            transformer: Arc::new(HslTransformer),
            generation: 0,
            loaded: None,
            samples: None,
            resamples: 0,
        })
    }

    /// Create from a JSON options object or a bare source string
    pub fn from_value(value: Value, target: Target) -> Result<Self> {
        Self::new(PixelOptions::from_value(value)?, target)
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_surface_factory(mut self, surfaces: Arc<dyn SurfaceFactory>) -> Self {
        self.scratch = surfaces.create(0, 0);
        self.surfaces = surfaces;
        self.samples = None;
        self
    }

    pub fn with_transformer(mut self, transformer: Arc<dyn ColorTransformer>) -> Self {
        self.transformer = transformer;
        self.samples = None;
        self
    }

    /// Load the source named in the options, if any.
    ///
    /// Returns whether the instance is ready afterwards.
    pub async fn load(&mut self) -> Result<bool> {
        match self.options.source.clone() {
            Some(source) => self.set_source(source).await,
            None => Ok(self.is_ready()),
        }
    }

    pub fn options(&self) -> &PixelOptions {
        &self.options
    }

    /// Whether the latest requested source has finished loading
    pub fn is_ready(&self) -> bool {
        self.current_source().is_some()
    }

    /// Locator of the source currently loaded
    pub fn loaded_source(&self) -> Option<&str> {
        self.current_source().map(|loaded| loaded.source.as_str())
    }

    /// Grid for the loaded source at the current column count
    pub fn grid(&self) -> Option<GridDimensions> {
        let columns = self.options.columns;
        self.current_source()
            .map(|loaded| compute_grid(loaded.image.width, loaded.image.height, columns))
    }

    /// Cached color array, when it is current
    pub fn color_array(&self) -> Option<&[Cell]> {
        let key = self.sample_key();
        self.samples
            .as_ref()
            .filter(|s| s.key == key)
            .map(|s| s.colors.as_slice())
    }

    /// How many times the source has been sampled
    pub fn resample_count(&self) -> u64 {
        self.resamples
    }

    // ==================== Source ====================

    /// Start loading `source`, superseding any pending request
    pub fn request_source(&mut self, source: impl Into<String>) -> PendingSource {
        let source = source.into();
        self.generation += 1;
        self.options.source = Some(source.clone());
        self.samples = None;
        debug!("Requested source #{}: {}", self.generation, source);

        PendingSource {
            generation: self.generation,
            source,
            decoder: Arc::clone(&self.decoder),
        }
    }

    /// Apply a resolved source. Results for superseded requests are dropped
    /// and yield `Ok(false)`.
    pub fn complete_source(&mut self, ready: SourceReady) -> Result<bool> {
        if ready.generation != self.generation {
            warn!(
                "Ignoring stale source #{} ({}), latest is #{}",
                ready.generation, ready.source, self.generation
            );
            return Ok(false);
        }

        let image = match ready.result {
            Ok(image) => image,
            Err(e) => {
                error!("Failed to load source {}: {}", ready.source, e);
                return Err(e);
            }
        };

        info!("Source ready: {} ({}x{})", ready.source, image.width, image.height);
        let event = ReadyEvent {
            source: ready.source.clone(),
            natural_size: (image.width, image.height),
            grid: compute_grid(image.width, image.height, self.options.columns),
        };
        self.loaded = Some(LoadedSource {
            generation: ready.generation,
            source: ready.source,
            image,
        });

        if let Target::Callback(callback) = &mut self.target {
            callback(&event);
        } else {
            self.render()?;
        }
        Ok(true)
    }

    /// Request, decode and apply `source` in one step
    pub async fn set_source(&mut self, source: impl Into<String>) -> Result<bool> {
        let pending = self.request_source(source);
        let ready = pending.resolve().await;
        self.complete_source(ready)
    }

    // ==================== Setters ====================

    /// Change output magnification; never resamples
    pub fn set_cell_size(&mut self, cell_size: u32) -> Result<()> {
        validate_cell_size(cell_size)?;
        self.options.cell_size = cell_size;
        self.rerender()
    }

    /// Change the grid width; resamples on next render
    pub fn set_columns(&mut self, columns: u32) -> Result<()> {
        validate_columns(columns)?;
        self.options.columns = columns;
        self.rerender()
    }

    /// Change columns and cell size together
    pub fn resize(&mut self, columns: u32, cell_size: u32) -> Result<()> {
        validate_columns(columns)?;
        validate_cell_size(cell_size)?;
        self.options.columns = columns;
        self.options.cell_size = cell_size;
        self.rerender()
    }

    pub fn set_shape(&mut self, shape: Shape) -> Result<()> {
        self.options.shape = shape;
        self.rerender()
    }

    pub fn set_output_type(&mut self, output_type: OutputType) -> Result<()> {
        self.options.output_type = output_type;
        self.rerender()
    }

    /// Set the output type by name; unknown names leave the options untouched
    pub fn set_output_type_name(&mut self, name: &str) -> Result<()> {
        let output_type = name.parse()?;
        self.set_output_type(output_type)
    }

    /// Change the per-sample color transform; resamples on next render
    pub fn set_color_transform(&mut self, transform: ColorTransform) -> Result<()> {
        self.options.transform = transform;
        self.rerender()
    }

    // ==================== Rendering ====================

    /// Query an output form by name.
    ///
    /// Besides the output types this accepts `dataURL` and `colorArray`.
    /// Returns `Ok(None)` while no source is ready.
    pub fn get(&mut self, request: &str) -> Result<Option<Query>> {
        let request: Request = request.parse()?;
        self.query(request)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn query(&mut self, request: Request) -> Result<Option<Query>> {
        let cell_size = self.options.cell_size;
        let shape = self.options.shape;
        let surfaces = Arc::clone(&self.surfaces);

        let Some(samples) = self.refresh_samples() else {
            debug!("Source not ready, skipping {:?}", request);
            return Ok(None);
        };
        let ctx = RenderContext {
            colors: &samples.colors,
            grid: samples.grid,
            cell_size,
            shape,
            surfaces: surfaces.as_ref(),
        };

        let query = match request {
            Request::Output(output_type) => {
                Query::Output(select_renderer(output_type).render(&ctx)?)
            }
            Request::DataUrl => {
                let raster = RasterRenderer.draw(&ctx);
                Query::DataUrl(encode_data_url(raster.surface.as_ref())?)
            }
            Request::ColorArray => Query::Samples(ColorSamples {
                colors: samples.colors.clone(),
                columns: samples.grid.width,
            }),
        };
        Ok(Some(query))
    }

    /// Render the configured output type
    pub fn draw(&mut self) -> Result<Option<Output>> {
        let output_type = self.options.output_type;
        Ok(self.query(Request::Output(output_type))?.and_then(Query::into_output))
    }

    /// Render the configured output type into the mount point.
    ///
    /// Returns whether anything was mounted.
    pub fn render(&mut self) -> Result<bool> {
        if !matches!(self.target, Target::Mount(_)) {
            return Ok(false);
        }
        let Some(output) = self.draw()? else {
            return Ok(false);
        };
        if let Target::Mount(mount) = &mut self.target {
            mount.replace(output);
        }
        Ok(true)
    }

    fn rerender(&mut self) -> Result<()> {
        self.render().map(|_| ())
    }

    // ==================== Sampling ====================

    fn current_source(&self) -> Option<&LoadedSource> {
        self.loaded
            .as_ref()
            .filter(|loaded| loaded.generation == self.generation)
    }

    fn sample_key(&self) -> SampleKey {
        SampleKey {
            generation: self.generation,
            columns: self.options.columns,
            transform: self.options.transform.key(),
        }
    }

    /// Bring the color array up to date. Returns `None` while not ready.
    fn refresh_samples(&mut self) -> Option<&Samples> {
        let key = self.sample_key();
        if self.samples.as_ref().is_some_and(|s| s.key == key) {
            return self.samples.as_ref();
        }

        let generation = self.generation;
        let loaded = self.loaded.as_ref().filter(|l| l.generation == generation)?;

        let grid = compute_grid(loaded.image.width, loaded.image.height, self.options.columns);
        let params = self.options.transform;
        let transformer = Arc::clone(&self.transformer);
        let apply = move |color: Color| transformer.apply(color, &params);
        let transform: Option<&dyn Fn(Color) -> Color> = if params.is_identity() {
            None
        } else {
            Some(&apply)
        };

        let colors = sample_image(self.scratch.as_mut(), &loaded.image, grid, transform);
        self.resamples += 1;
        Some(&*self.samples.insert(Samples { key, grid, colors }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::MemoryDecoder;
    use crate::mount::MemoryMount;
    use image::{Rgba, RgbaImage};
    use std::sync::Mutex;

    fn decoder() -> Arc<MemoryDecoder> {
        Arc::new(
            MemoryDecoder::new()
                .with_image("wide.png", RgbaImage::from_pixel(64, 32, Rgba([255, 0, 0, 255])))
                .with_image("square.png", RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]))),
        )
    }

    fn instance(options: PixelOptions, target: Target) -> Result<PixelArt> {
        Ok(PixelArt::new(options, target)?.with_decoder(decoder()))
    }

    #[test]
    fn test_unready_query_is_noop() -> Result<()> {
        let mut art = instance(PixelOptions::default(), Target::Detached)?;
        assert!(!art.is_ready());
        assert!(art.get("vector")?.is_none());
        assert_eq!(art.resample_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_ready_callback_reports_grid() -> Result<()> {
        let seen: Arc<Mutex<Vec<ReadyEvent>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let target = Target::callback(move |event| {
            if let Ok(mut events) = sink.lock() {
                events.push(event.clone());
            }
        });

        let mut art = instance(
            PixelOptions {
                columns: 16,
                ..PixelOptions::with_source("wide.png")
            },
            target,
        )?;
        assert!(art.load().await?);

        let events = seen.lock().map(|e| e.clone()).unwrap_or_default();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].natural_size, (64, 32));
        assert_eq!(events[0].grid, GridDimensions::new(16, 8));
        Ok(())
    }

    #[tokio::test]
    async fn test_presentation_changes_do_not_resample() -> Result<()> {
        let mut art = instance(PixelOptions::default(), Target::Detached)?;
        art.set_source("square.png").await?;

        art.get("raster")?;
        assert_eq!(art.resample_count(), 1);

        art.set_cell_size(5)?;
        art.set_shape(Shape::Circle)?;
        art.set_output_type(OutputType::Vector)?;
        art.get("vector")?;
        art.get("boxShadow")?;
        assert_eq!(art.resample_count(), 1);

        art.set_columns(5)?;
        art.get("vector")?;
        assert_eq!(art.resample_count(), 2);

        art.set_color_transform(ColorTransform {
            invert: true,
            ..Default::default()
        })?;
        art.get("vector")?;
        art.get("raster")?;
        assert_eq!(art.resample_count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_stale_source_is_ignored() -> Result<()> {
        let mut art = instance(PixelOptions::default(), Target::Detached)?;

        let first = art.request_source("wide.png");
        let second = art.request_source("square.png");
        let first_ready = first.resolve().await;
        let second_ready = second.resolve().await;

        assert!(art.complete_source(second_ready)?);
        assert!(!art.complete_source(first_ready)?);

        // Grid follows the square source, not the wide one
        assert_eq!(art.grid(), Some(GridDimensions::new(32, 32)));
        Ok(())
    }

    #[tokio::test]
    async fn test_new_request_clears_readiness() -> Result<()> {
        let mut art = instance(PixelOptions::default(), Target::Detached)?;
        art.set_source("square.png").await?;
        assert!(art.is_ready());

        let _pending = art.request_source("wide.png");
        assert!(!art.is_ready());
        assert!(art.get("raster")?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_source_keeps_instance_usable() -> Result<()> {
        let mut art = instance(PixelOptions::default(), Target::Detached)?;
        assert!(art.set_source("missing.png").await.is_err());
        assert!(!art.is_ready());

        assert!(art.set_source("square.png").await?);
        assert!(art.get("svg")?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_setters_leave_state() -> Result<()> {
        let mut art = instance(PixelOptions::default(), Target::Detached)?;
        assert!(art.set_columns(0).is_err());
        assert!(art.set_cell_size(0).is_err());
        assert!(art.resize(8, 0).is_err());
        assert!(art.set_output_type_name("foo").is_err());
        assert_eq!(art.options().columns, 32);
        assert_eq!(art.options().cell_size, 1);
        assert_eq!(art.options().output_type, OutputType::Raster);
        Ok(())
    }

    #[tokio::test]
    async fn test_mount_rerenders_on_changes() -> Result<()> {
        let mount = MemoryMount::new();
        let mut art = instance(
            PixelOptions {
                output_type: OutputType::Vector,
                ..PixelOptions::with_source("square.png")
            },
            Target::mount(mount.clone()),
        )?;

        art.load().await?;
        assert_eq!(mount.replacements(), 1);

        art.resize(5, 4)?;
        assert_eq!(mount.replacements(), 2);
        let size = mount.with_current(|o| match o {
            Some(Output::Vector(svg)) => Some((svg.width, svg.height, svg.elements.len())),
            _ => None,
        });
        assert_eq!(size, Some((20, 20, 25)));
        Ok(())
    }

    #[tokio::test]
    async fn test_color_array_query_delivers_columns() -> Result<()> {
        let mut art = instance(PixelOptions::default(), Target::Detached)?;
        art.set_source("wide.png").await?;
        art.set_columns(4)?;

        let Some(Query::Samples(samples)) = art.get("colorArray")? else {
            panic!("expected samples");
        };
        let (len, columns) = samples.deliver(|colors, columns| (colors.len(), columns));
        assert_eq!((len, columns), (8, 4));
        Ok(())
    }

    #[tokio::test]
    async fn test_query_refreshes_stale_samples() -> Result<()> {
        let mut art = instance(PixelOptions::default(), Target::Detached)?;
        art.set_source("wide.png").await?;
        art.get("dataURL")?;
        assert_eq!(art.color_array().map(<[Cell]>::len), Some(32 * 16));

        art.set_columns(8)?;
        assert!(art.color_array().is_none());
        assert!(matches!(art.get("dataURL")?, Some(Query::DataUrl(_))));
        assert_eq!(art.color_array().map(<[Cell]>::len), Some(8 * 4));
        assert_eq!(art.resample_count(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_data_url_query() -> Result<()> {
        let mut art = instance(PixelOptions::default(), Target::Detached)?;
        art.set_source("square.png").await?;
        let Some(Query::DataUrl(url)) = art.get("dataURL")? else {
            panic!("expected a data URL");
        };
        assert!(url.starts_with("data:image/png;base64,"));
        Ok(())
    }
}
