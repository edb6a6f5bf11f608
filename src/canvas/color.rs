//! Color types with alpha support

use std::fmt;

/// RGBA color with f32 components (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGBA values (0-255)
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Convert to 8-bit RGBA, rounding to the nearest channel value
    #[inline]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }

    /// Blend this color over another (alpha compositing)
    #[inline]
    pub fn blend_over(&self, bg: &Color) -> Color {
        let a = self.a + bg.a * (1.0 - self.a);
        if a < 0.0001 {
            return Color::TRANSPARENT;
        }
        Color {
            r: (self.r * self.a + bg.r * bg.a * (1.0 - self.a)) / a,
            g: (self.g * self.a + bg.g * bg.a * (1.0 - self.a)) / a,
            b: (self.b * self.a + bg.b * bg.a * (1.0 - self.a)) / a,
            a,
        }
    }

    /// Same color with the alpha scaled by `coverage`
    #[inline]
    pub fn with_coverage(&self, coverage: f32) -> Color {
        Color {
            a: self.a * coverage.clamp(0.0, 1.0),
            ..*self
        }
    }

    /// CSS functional notation, e.g. `rgba(255,0,0,0.5)`
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

/// Empty canvas pixel
impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, _] = self.to_rgba8();
        write!(f, "rgba({},{},{},{})", r, g, b, format_alpha(self.a))
    }
}

#[inline]
fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Alpha with at most three decimals and no trailing zeros
fn format_alpha(alpha: f32) -> String {
    let fixed = format!("{:.3}", alpha.clamp(0.0, 1.0));
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba8_round_trip() {
        for v in [0u8, 1, 127, 128, 200, 254, 255] {
            let c = Color::from_rgba8(v, v, v, v);
            assert_eq!(c.to_rgba8(), [v, v, v, v]);
        }
    }

    #[test]
    fn test_css_format() {
        assert_eq!(Color::RED.to_css(), "rgba(255,0,0,1)");
        assert_eq!(Color::from_rgba8(0, 128, 255, 128).to_css(), "rgba(0,128,255,0.502)");
        assert_eq!(Color::TRANSPARENT.to_css(), "rgba(0,0,0,0)");
    }

    #[test]
    fn test_blend_over_transparent_keeps_color() {
        let fg = Color::from_rgba8(10, 20, 30, 255);
        let blended = fg.blend_over(&Color::TRANSPARENT);
        assert_eq!(blended.to_rgba8(), [10, 20, 30, 255]);
    }

    #[test]
    fn test_half_alpha_over_opaque() {
        let blended = Color::rgba(1.0, 0.0, 0.0, 0.5).blend_over(&Color::BLUE);
        assert_eq!(blended.to_rgba8(), [128, 0, 128, 255]);
        assert_eq!(Color::default(), Color::TRANSPARENT);
    }
}
