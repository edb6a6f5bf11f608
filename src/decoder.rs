//! Image decoder capability.
//!
//! A decoder turns a source locator into RGBA pixel data plus the image's
//! natural dimensions. Decoding is asynchronous; the pixel-art instance only
//! becomes ready once the decoder resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use image::RgbaImage;
use tracing::{debug, instrument};

use crate::errors::{PixelError, Result};

/// Decoded source image
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Natural width in pixels
    pub width: u32,
    /// Natural height in pixels
    pub height: u32,
    /// Pixel-sampleable content
    pub pixels: RgbaImage,
}

impl DecodedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            width: pixels.width(),
            height: pixels.height(),
            pixels,
        }
    }

    /// Decode an encoded image held in memory
    pub fn from_bytes(source_name: &str, bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).map_err(|e| PixelError::Decode {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(image.to_rgba8()))
    }
}

/// Asynchronous source decoder
#[async_trait]
pub trait ImageDecoder: std::fmt::Debug + Send + Sync {
    async fn decode(&self, source: &str) -> Result<DecodedImage>;
}

/// Where the bytes of a source locator live
#[derive(Debug, Clone, PartialEq, Eq)]
enum Locator {
    Path(PathBuf),
    Inline(Vec<u8>),
}

/// Decoder for local paths, `file://` URIs and base64 `data:` URIs
#[derive(Debug, Clone, Default)]
pub struct FsDecoder {
    /// Directory that relative paths are resolved against
    base_dir: Option<PathBuf>,
    /// Accepted for parity with browser loaders; local reads need no opt-in
    cross_origin: bool,
}

impl FsDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `dir`
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_cross_origin(mut self, enabled: bool) -> Self {
        self.cross_origin = enabled;
        self
    }

    pub fn cross_origin(&self) -> bool {
        self.cross_origin
    }

    fn locate(&self, source: &str) -> Result<Locator> {
        if let Some(rest) = source.strip_prefix("data:") {
            return parse_data_uri(source, rest).map(Locator::Inline);
        }

        if source.contains("://") && !source.starts_with("file://") {
            return Err(PixelError::UnsupportedSource(source.to_string()));
        }

        let raw = source.strip_prefix("file://").unwrap_or(source);
        let path = Path::new(raw);
        let path = match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        };
        Ok(Locator::Path(path))
    }
}

#[async_trait]
impl ImageDecoder for FsDecoder {
    #[instrument(level = "debug", skip(self))]
    async fn decode(&self, source: &str) -> Result<DecodedImage> {
        let bytes = match self.locate(source)? {
            Locator::Inline(bytes) => bytes,
            Locator::Path(path) => {
                debug!("Reading source: {}", path.display());
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| PixelError::SourceAccess {
                        path: path.clone(),
                        message: e.to_string(),
                    })?
            }
        };

        let name = source_label(source);
        let decoded = tokio::task::spawn_blocking(move || DecodedImage::from_bytes(&name, &bytes))
            .await
            .map_err(|e| PixelError::Decode {
                source_name: source_label(source),
                message: e.to_string(),
            })??;

        debug!("Decoded {}x{} image", decoded.width, decoded.height);
        Ok(decoded)
    }
}

/// Decoder over images the host has already decoded, keyed by source name
#[derive(Debug, Clone, Default)]
pub struct MemoryDecoder {
    images: HashMap<String, DecodedImage>,
}

impl MemoryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, source: impl Into<String>, image: RgbaImage) -> Self {
        self.insert(source, image);
        self
    }

    pub fn insert(&mut self, source: impl Into<String>, image: RgbaImage) {
        self.images.insert(source.into(), DecodedImage::new(image));
    }
}

#[async_trait]
impl ImageDecoder for MemoryDecoder {
    async fn decode(&self, source: &str) -> Result<DecodedImage> {
        self.images
            .get(source)
            .cloned()
            .ok_or_else(|| PixelError::UnsupportedSource(source_label(source)))
    }
}

/// Decode the payload of a `data:[<mime>][;base64],<data>` URI
fn parse_data_uri(source: &str, rest: &str) -> Result<Vec<u8>> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PixelError::UnsupportedSource(source_label(source)))?;

    if !meta.ends_with(";base64") {
        return Err(PixelError::UnsupportedSource(format!(
            "{} (only base64 data URIs are supported)",
            source_label(source)
        )));
    }

    general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| PixelError::Decode {
            source_name: source_label(source),
            message: e.to_string(),
        })
}

/// Short form of a locator for logs and errors; data URIs can be huge
fn source_label(source: &str) -> String {
    const MAX: usize = 64;
    if source.len() <= MAX {
        return source.to_string();
    }
    let cut = (0..=MAX).rev().find(|&i| source.is_char_boundary(i)).unwrap_or(0);
    format!("{}…", &source[..cut])
}
