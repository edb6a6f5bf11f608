//! Display and sampling options.
//!
//! Options can be built in code, from a JSON value (an object or a bare source
//! string) or from a TOML document. Key names from older configurations
//! (`src`, `row`, `scale`, `pixel`, `type`) are accepted as aliases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::errors::{PixelError, Result};
use crate::transform::ColorTransform;

pub const DEFAULT_COLUMNS: u32 = 32;
pub const DEFAULT_CELL_SIZE: u32 = 1;

/// Shape drawn for each cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Square,
    Circle,
}

impl FromStr for Shape {
    type Err = PixelError;

    /// Anything other than `circle` falls back to squares
    fn from_str(s: &str) -> Result<Self> {
        Ok(if s.eq_ignore_ascii_case("circle") {
            Shape::Circle
        } else {
            Shape::Square
        })
    }
}

/// Rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputType {
    /// Rasterized canvas
    #[default]
    #[serde(rename = "raster", alias = "canvas")]
    Raster,
    /// SVG document
    #[serde(rename = "vector", alias = "svg")]
    Vector,
    /// PNG wrapped in a data URL
    #[serde(rename = "image", alias = "img")]
    Image,
    /// CSS box-shadow mosaic
    #[serde(rename = "shadowMosaic", alias = "boxShadow", alias = "shadow")]
    ShadowMosaic,
}

impl OutputType {
    pub const ALL: [OutputType; 4] = [
        OutputType::Raster,
        OutputType::Vector,
        OutputType::Image,
        OutputType::ShadowMosaic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputType::Raster => "raster",
            OutputType::Vector => "vector",
            OutputType::Image => "image",
            OutputType::ShadowMosaic => "shadowMosaic",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputType {
    type Err = PixelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raster" | "canvas" => Ok(OutputType::Raster),
            "vector" | "svg" => Ok(OutputType::Vector),
            "image" | "img" => Ok(OutputType::Image),
            "shadowMosaic" | "boxShadow" | "shadow" => Ok(OutputType::ShadowMosaic),
            other => Err(PixelError::UnsupportedType(other.to_string())),
        }
    }
}

/// What a query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// One of the rendered forms
    Output(OutputType),
    /// PNG data URL string of the raster form
    DataUrl,
    /// Raw color samples delivered through a callback
    ColorArray,
}

impl FromStr for Request {
    type Err = PixelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dataURL" | "dataUrl" => Ok(Request::DataUrl),
            "colorArray" => Ok(Request::ColorArray),
            other => other.parse().map(Request::Output),
        }
    }
}

impl From<OutputType> for Request {
    fn from(output: OutputType) -> Self {
        Request::Output(output)
    }
}

/// Configuration for a pixel-art instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PixelOptions {
    /// Image locator handed to the decoder
    #[serde(alias = "src")]
    pub source: Option<String>,
    /// Grid width in cells
    #[serde(alias = "row", alias = "scale")]
    pub columns: u32,
    /// Output pixels per cell
    #[serde(alias = "pixel")]
    pub cell_size: u32,
    pub shape: Shape,
    #[serde(alias = "type")]
    pub output_type: OutputType,
    #[serde(flatten)]
    pub transform: ColorTransform,
}

impl Default for PixelOptions {
    fn default() -> Self {
        Self {
            source: None,
            columns: DEFAULT_COLUMNS,
            cell_size: DEFAULT_CELL_SIZE,
            shape: Shape::Square,
            output_type: OutputType::Raster,
            transform: ColorTransform::default(),
        }
    }
}

impl PixelOptions {
    /// Options with only a source set
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Default::default()
        }
    }

    /// Build from a JSON value: an options object or a plain source string
    pub fn from_value(value: Value) -> Result<Self> {
        let options = match value {
            Value::Object(_) => serde_json::from_value::<PixelOptions>(value)?,
            Value::String(source) => Self::with_source(source),
            other => {
                let kind = json_kind(&other);
                error!("Options must be an object or a source string, got {}", kind);
                return Err(PixelError::InvalidOptions(format!(
                    "expected an object or a source string, got {kind}"
                )));
            }
        };
        options.validate()?;
        Ok(options)
    }

    /// Build from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: PixelOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the numeric invariants
    pub fn validate(&self) -> Result<()> {
        validate_columns(self.columns)?;
        validate_cell_size(self.cell_size)
    }
}

pub(crate) fn validate_columns(columns: u32) -> Result<()> {
    if columns == 0 {
        return Err(PixelError::param("columns", "must be greater than zero"));
    }
    Ok(())
}

pub(crate) fn validate_cell_size(cell_size: u32) -> Result<()> {
    if cell_size == 0 {
        return Err(PixelError::param("cellSize", "must be greater than zero"));
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
