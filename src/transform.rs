//! Per-sample color transforms applied before quantization.
//!
//! Transforms run in a fixed order: invert, hue, hue rotation, saturation.
//! Each step only runs when its option is set.

use palette::{Hsl, IntoColor, RgbHue, Srgb};
use serde::{Deserialize, Serialize};

use crate::canvas::Color;

/// Color transform parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorTransform {
    /// Negate the RGB channels
    #[serde(default)]
    pub invert: bool,
    /// Replace the hue (degrees)
    #[serde(default)]
    pub hue: Option<f32>,
    /// Rotate the hue (degrees)
    #[serde(default)]
    pub hue_rotate: Option<f32>,
    /// Scale saturation by `1 + saturate`
    #[serde(default)]
    pub saturate: Option<f32>,
}

impl ColorTransform {
    /// True when no step would change a color
    pub fn is_identity(&self) -> bool {
        !self.invert && self.hue.is_none() && self.hue_rotate.is_none() && self.saturate.is_none()
    }

    fn touches_hsl(&self) -> bool {
        self.hue.is_some() || self.hue_rotate.is_some() || self.saturate.is_some()
    }

    /// Memoization key; float fields compared bitwise
    pub(crate) fn key(&self) -> (bool, Option<u32>, Option<u32>, Option<u32>) {
        (
            self.invert,
            self.hue.map(f32::to_bits),
            self.hue_rotate.map(f32::to_bits),
            self.saturate.map(f32::to_bits),
        )
    }
}

/// Pure function from (color, transform) to a transformed color
pub trait ColorTransformer: std::fmt::Debug + Send + Sync {
    fn apply(&self, color: Color, transform: &ColorTransform) -> Color;
}

/// Default transformer working in HSL space
#[derive(Debug, Default, Clone, Copy)]
pub struct HslTransformer;

impl ColorTransformer for HslTransformer {
    fn apply(&self, color: Color, transform: &ColorTransform) -> Color {
        let mut rgb = Srgb::new(color.r, color.g, color.b);

        if transform.invert {
            rgb = Srgb::new(1.0 - rgb.red, 1.0 - rgb.green, 1.0 - rgb.blue);
        }

        if transform.touches_hsl() {
            let mut hsl: Hsl = rgb.into_color();

            if let Some(hue) = transform.hue {
                hsl.hue = RgbHue::from_degrees(hue);
            }
            if let Some(degrees) = transform.hue_rotate {
                hsl.hue = RgbHue::from_degrees(hsl.hue.into_positive_degrees() + degrees);
            }
            if let Some(ratio) = transform.saturate {
                hsl.saturation = (hsl.saturation + hsl.saturation * ratio).clamp(0.0, 1.0);
            }

            rgb = hsl.into_color();
        }

        Color::rgba(
            rgb.red.clamp(0.0, 1.0),
            rgb.green.clamp(0.0, 1.0),
            rgb.blue.clamp(0.0, 1.0),
            color.a,
        )
    }
}
