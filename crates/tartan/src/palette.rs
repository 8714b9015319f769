//! Colour palette.
//!
//! Threads never hold a colour value, only a [`ColourIndex`] into the
//! palette. Editing a swatch therefore recolours every thread that uses it
//! the next time the threads are rendered.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TartanError;

/// Index of a palette swatch.
pub type ColourIndex = usize;

/// Number of swatches in a palette.
pub const SWATCH_COUNT: usize = 8;

/// An RGBA colour with 8 bits per channel.
///
/// Serialised as a hex string (`#rrggbb`, or `#rrggbbaa` when not opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const WHITE: Colour = Colour::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Colour = Colour::rgb(0x00, 0x00, 0x00);
    pub const RED: Colour = Colour::rgb(0xFF, 0x00, 0x00);
    pub const GREEN: Colour = Colour::rgb(0x00, 0x80, 0x00);
    pub const BLUE: Colour = Colour::rgb(0x00, 0x00, 0xFF);
    pub const LIGHT_CYAN: Colour = Colour::rgb(0xE0, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 0xFF
    }

    /// Hex form used in SVG attributes and settings files.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Result<Self, TartanError> {
        let invalid = || TartanError::InvalidColour {
            value: value.to_string(),
        };

        let hex = value.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        let alpha = if hex.len() == 8 { channel(6)? } else { 0xFF };
        Ok(Colour::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Colour {
    type Error = TartanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::from_hex(&value)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_hex()
    }
}

/// Anything that can resolve a swatch index to a colour.
///
/// Render calls take this capability rather than caching colours, so a
/// palette edit is picked up by the next render.
pub trait ColourSource {
    fn colour_at(&self, index: ColourIndex) -> Colour;
}

/// A named palette entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub colour: Colour,
    #[serde(default)]
    pub name: Option<String>,
}

impl Swatch {
    pub fn new(colour: Colour, name: &str) -> Self {
        Self {
            colour,
            name: Some(name.to_string()),
        }
    }

    /// Blank white, unnamed.
    pub fn blank() -> Self {
        Self {
            colour: Colour::WHITE,
            name: None,
        }
    }
}

/// Fixed-size set of swatches.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    swatches: Vec<Swatch>,
}

impl Palette {
    /// A palette of blank swatches.
    pub fn blank() -> Self {
        Self {
            swatches: vec![Swatch::blank(); SWATCH_COUNT],
        }
    }

    /// Build a palette from stored swatches. Missing entries are blank and
    /// anything past [`SWATCH_COUNT`] is dropped.
    pub fn from_swatches(swatches: &[Swatch]) -> Self {
        let mut palette = Self::blank();
        for (slot, swatch) in palette.swatches.iter_mut().zip(swatches) {
            *slot = swatch.clone();
        }
        palette
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn swatch(&self, index: ColourIndex) -> Option<&Swatch> {
        self.swatches.get(index)
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn iter(&self) -> impl Iterator<Item = &Swatch> {
        self.swatches.iter()
    }

    /// Replace both colour and name. Returns false when `index` is not a
    /// swatch slot.
    pub fn set_swatch(&mut self, index: ColourIndex, colour: Colour, name: Option<&str>) -> bool {
        match self.swatches.get_mut(index) {
            Some(swatch) => {
                swatch.colour = colour;
                swatch.name = name.map(str::to_string);
                true
            }
            None => false,
        }
    }

    pub fn set_colour(&mut self, index: ColourIndex, colour: Colour) -> bool {
        match self.swatches.get_mut(index) {
            Some(swatch) => {
                swatch.colour = colour;
                true
            }
            None => false,
        }
    }

    pub fn set_name(&mut self, index: ColourIndex, name: Option<&str>) -> bool {
        match self.swatches.get_mut(index) {
            Some(swatch) => {
                swatch.name = name.map(str::to_string);
                true
            }
            None => false,
        }
    }

    /// Reset every swatch to blank white.
    pub fn clear(&mut self) {
        for swatch in &mut self.swatches {
            *swatch = Swatch::blank();
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let mut palette = Self::blank();
        palette.set_swatch(0, Colour::WHITE, Some("Blank"));
        palette.set_swatch(1, Colour::LIGHT_CYAN, Some("Highlight"));
        palette.set_swatch(2, Colour::BLACK, Some("Lowlight"));
        palette.set_swatch(3, Colour::RED, Some("Major 1"));
        palette.set_swatch(4, Colour::GREEN, Some("Major 2"));
        palette.set_swatch(5, Colour::BLUE, Some("Major 3"));
        palette
    }
}

impl ColourSource for Palette {
    fn colour_at(&self, index: ColourIndex) -> Colour {
        match self.swatches.get(index) {
            Some(swatch) => swatch.colour,
            None => {
                tracing::warn!(index, "colour index outside palette, using blank");
                Colour::WHITE
            }
        }
    }
}
