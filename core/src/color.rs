//! Display colors exchanged between configuration, palette assignment and rendering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color with floating point channels in the range `0.0..=1.0`.
///
/// Serialises as a `#RRGGBBAA` hex string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    /// Red channel intensity.
    pub red: f32,
    /// Green channel intensity.
    pub green: f32,
    /// Blue channel intensity.
    pub blue: f32,
    /// Alpha channel intensity.
    pub alpha: f32,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates a color from byte RGBA values.
    #[must_use]
    pub const fn from_rgba_u8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: alpha as f32 / 255.0,
        }
    }

    /// Parses `#RRGGBBAA` or `#RRGGBB` notation; the leading `#` is optional.
    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let digits = value.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigits(value.to_owned()));
        }
        let opaque = match digits.len() {
            8 => false,
            6 => true,
            length => return Err(ColorParseError::InvalidLength { length }),
        };

        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorParseError::InvalidDigits(value.to_owned()))?;
        let packed = if opaque { (packed << 8) | 0xff } else { packed };

        let [red, green, blue, alpha] = packed.to_be_bytes();
        Ok(Self::from_rgba_u8(red, green, blue, alpha))
    }

    /// Formats the color as an uppercase `#RRGGBBAA` string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            channel_to_byte(self.red),
            channel_to_byte(self.green),
            channel_to_byte(self.blue),
            channel_to_byte(self.alpha)
        )
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Reports whether every channel is finite and within `0.0..=1.0`.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        [self.red, self.green, self.blue, self.alpha]
            .iter()
            .all(|channel| channel.is_finite() && (0.0..=1.0).contains(channel))
    }
}

fn channel_to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

/// Errors produced while parsing hex color notation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string contained characters outside the hexadecimal alphabet.
    #[error("'{0}' is not a hexadecimal color")]
    InvalidDigits(String),
    /// The string did not contain six or eight hex digits.
    #[error("expected 6 or 8 hex digits, found {length}")]
    InvalidLength {
        /// Number of digits found after the optional `#`.
        length: usize,
    },
}
