use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (the leading `#` is required, hex digits are case-insensitive).
    pub fn parse_hex(value: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidColorFormat { value: value.to_string() };
        let digits = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self { r: channel(0..2)?, g: channel(2..4)?, b: channel(4..6)? })
    }
}

/// A validated `#RRGGBB` colour. The text is kept as entered so stored documents round-trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    text: String,
    rgb: Rgb,
}

impl HexColor {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let text = value.into().trim().to_string();
        let rgb = Rgb::parse_hex(&text)?;
        Ok(Self { text, rgb })
    }

    /// Builds a colour from constant channel values, used for presets and defaults.
    pub fn from_rgb(rgb: Rgb) -> Self {
        Self { text: format!("#{:02X}{:02X}{:02X}", rgb.r, rgb.g, rgb.b), rgb }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }
}

impl TryFrom<String> for HexColor {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.text
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
