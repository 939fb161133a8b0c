// src/color.rs

//! Defines the concrete RGB `Color` type used by the theme and the drivers.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An sRGB color with 8-bit components.
///
/// Drivers receive colors in this concrete form; there is no palette or
/// "default" placeholder left to resolve. Theme entries in a config file are
/// written as `"#rrggbb"` strings and parsed via [`Color::from_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parses a `#rrggbb` hex string. The leading `#` is required.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = match s.strip_prefix('#') {
            Some(d) => d,
            None => bail!("color '{}' must start with '#'", s),
        };
        if digits.len() != 6 || !digits.is_ascii() {
            bail!("color '{}' must be of the form #rrggbb", s);
        }
        let component = |range: std::ops::Range<usize>| -> Result<u8> {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| anyhow!("invalid hex component in '{}': {}", s, e))
        };
        Ok(Color {
            r: component(0..2)?,
            g: component(2..4)?,
            b: component(4..6)?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_string()
    }
}
