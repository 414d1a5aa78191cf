use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Errors from parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("unrecognized color format: {0:?}")]
    UnrecognizedFormat(String),
    #[error("invalid color component: {0:?}")]
    InvalidComponent(String),
}

/// Linear RGB color with components in `[0, 1]`.
///
/// Parses the two notations the demo uses: hex (`#c0ffee` or `c0ffee`) and
/// CSS-style `rgb(54, 69, 79)` with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Lowercase hex representation without a leading `#`, e.g. `ffffff`.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("{r:02x}{g:02x}{b:02x}")
    }

    /// The color as an RGB array, handy at the GPU boundary.
    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Component-wise scale, used to fold light intensity into a color.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(body) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            let mut parts = body.split(',').map(str::trim);
            let mut component = || {
                let raw = parts
                    .next()
                    .ok_or_else(|| ColorParseError::UnrecognizedFormat(s.to_string()))?;
                raw.parse::<u8>()
                    .map_err(|_| ColorParseError::InvalidComponent(raw.to_string()))
            };
            let (r, g, b) = (component()?, component()?, component()?);
            if parts.next().is_some() {
                return Err(ColorParseError::UnrecognizedFormat(s.to_string()));
            }
            return Ok(Self::from_rgb8(r, g, b));
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::UnrecognizedFormat(s.to_string()));
        }
        let byte = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ColorParseError::InvalidComponent(hex.to_string()))
        };
        Ok(Self::from_rgb8(byte(0..2)?, byte(2..4)?, byte(4..6)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_round_trips_to_hex() {
        assert_eq!(Color::WHITE.to_hex(), "ffffff");
        assert_eq!("ffffff".parse::<Color>().unwrap(), Color::WHITE);
    }

    #[test]
    fn parses_hash_prefixed_hex() {
        let c: Color = "#36454f".parse().unwrap();
        assert_eq!(c.to_rgb8(), [0x36, 0x45, 0x4f]);
    }

    #[test]
    fn parses_css_rgb() {
        let c: Color = "rgb(54, 69, 79)".parse().unwrap();
        assert_eq!(c.to_rgb8(), [54, 69, 79]);
        assert_eq!(c.to_hex(), "36454f");
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!("rgb(54, 69)".parse::<Color>().is_err());
        assert!("rgb(300, 0, 0)".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("not-a-color".parse::<Color>().is_err());
    }

    #[test]
    fn scaled_folds_intensity() {
        let c = Color::new(0.5, 1.0, 0.25).scaled(2.0);
        assert_eq!(c.to_array(), [1.0, 2.0, 0.5]);
    }
}
