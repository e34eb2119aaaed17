//! RGBA colors for mod configs and canvases
//!
//! Stored as linear `[f32; 4]` like the renderer's vertex colors; serialized as
//! `#rrggbb` / `#rrggbbaa` hex strings so config files stay readable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An RGBA color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b, 1.0])
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional)
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }

        let channel = |i: usize| -> f32 {
            // Length and digits validated above
            u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0) as f32 / 255.0
        };

        match hex.len() {
            3 => {
                let nibble = |i: usize| -> f32 {
                    let v = u8::from_str_radix(&hex[i..i + 1], 16).unwrap_or(0);
                    (v * 17) as f32 / 255.0
                };
                Ok(Self::rgb(nibble(0), nibble(1), nibble(2)))
            }
            6 => Ok(Self::rgb(channel(0), channel(2), channel(4))),
            8 => Ok(Self::rgba(channel(0), channel(2), channel(4), channel(6))),
            len => Err(ColorParseError::InvalidLength(len)),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Same color with alpha multiplied by `factor`
    pub fn scale_alpha(self, factor: f32) -> Self {
        let [r, g, b, a] = self.0;
        Self([r, g, b, (a * factor).clamp(0.0, 1.0)])
    }

    pub fn alpha(&self) -> f32 {
        self.0[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<Color> for [f32; 4] {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Failure to parse a hex color string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Digit count other than 3, 6 or 8
    InvalidLength(usize),
    /// Contains a non-hex character
    InvalidDigit(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::InvalidLength(len) => {
                write!(f, "expected 3, 6 or 8 hex digits, got {}", len)
            }
            ColorParseError::InvalidDigit(s) => write!(f, "invalid hex color {:?}", s),
        }
    }
}

impl std::error::Error for ColorParseError {}
