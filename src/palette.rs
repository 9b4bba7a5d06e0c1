//! Fixed, ordered tile palettes and color indices
//!
//! Cells never carry colors directly; they carry a [`ColorIndex`] into the
//! panel's palette. Palettes are written as `#RGB` / `#RRGGBB` / `#RRGGBBAA`
//! hex strings in documents and config files.

use image::Rgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for palette parsing and lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color '{0}' must start with '#'")]
    MissingHash(String),
    /// Invalid length (must be 3, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// A palette needs at least one entry
    #[error("palette has no colors")]
    NoColors,
    /// More colors than a [`ColorIndex`] can address
    #[error("palette has {0} colors, at most {} are allowed", MAX_COLORS)]
    TooManyColors(usize),
    /// Color index past the end of the palette
    #[error("color index {index} out of range for palette of {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Most entries a palette may hold: one per [`ColorIndex`] value.
pub const MAX_COLORS: usize = u8::MAX as usize + 1;

/// Index into a [`Palette`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorIndex(pub u8);

impl ColorIndex {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for ColorIndex {
    fn from(index: u8) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for ColorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The signage palette: backplate blue, border blue, pink, yellow, purple, green, white.
pub const DEFAULT_COLORS: [&str; 7] =
    ["#002c80", "#0074a4", "#fd5d5d", "#f3bd10", "#9e82b6", "#0f8a44", "#eaeae0"];

/// An ordered list of colors addressed by [`ColorIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
}

impl Default for Palette {
    fn default() -> Self {
        let colors = DEFAULT_COLORS
            .iter()
            .filter_map(|hex| parse_hex_color(hex).ok())
            .collect();
        Self { colors }
    }
}

impl Palette {
    /// Build a palette from hex color strings.
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::NoColors);
        }
        if colors.len() > MAX_COLORS {
            return Err(PaletteError::TooManyColors(colors.len()));
        }
        let colors = colors
            .iter()
            .map(|c| parse_hex_color(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Resolve an index to its color, `None` when out of range.
    pub fn get(&self, index: ColorIndex) -> Option<Rgba<u8>> {
        self.colors.get(index.index()).copied()
    }

    /// Accept an index only if it addresses an entry of this palette.
    pub fn check(&self, index: usize) -> Result<ColorIndex, PaletteError> {
        match u8::try_from(index) {
            Ok(byte) if index < self.colors.len() => Ok(ColorIndex(byte)),
            _ => Err(PaletteError::OutOfRange { index, len: self.colors.len() }),
        }
    }

    /// The color `steps` entries after `base`, wrapping around the palette.
    pub fn rotate(&self, base: ColorIndex, steps: usize) -> ColorIndex {
        let len = self.colors.len().clamp(1, MAX_COLORS);
        let wrapped = (base.index() % len + steps % len) % len;
        ColorIndex(u8::try_from(wrapped).unwrap_or(u8::MAX))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgba<u8>> {
        self.colors.iter()
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = PaletteError;

    fn try_from(colors: Vec<String>) -> Result<Self, Self::Error> {
        Palette::from_hex(&colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors.iter().map(|c| format_hex_color(*c)).collect()
    }
}

/// Parse a hex color string (#RGB, #RRGGBB, #RRGGBBAA)
///
/// # Examples
///
/// ```
/// use marquee::palette::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_hex_color("#002c80").unwrap(), image::Rgba([0, 44, 128, 255]));
/// ```
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>, PaletteError> {
    if s.is_empty() {
        return Err(PaletteError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or_else(|| PaletteError::MissingHash(s.to_string()))?;

    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(PaletteError::InvalidHex(c));
    }

    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|d| d * 17);
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

    let rgba = match hex.len() {
        3 => [digit(0), digit(1), digit(2), Ok(255)],
        6 => [pair(0), pair(2), pair(4), Ok(255)],
        8 => [pair(0), pair(2), pair(4), pair(6)],
        len => return Err(PaletteError::InvalidLength(len)),
    };

    let mut out = [0u8; 4];
    for (slot, channel) in out.iter_mut().zip(rgba) {
        // all characters were checked above
        *slot = channel.map_err(|_| PaletteError::InvalidLength(hex.len()))?;
    }
    Ok(Rgba(out))
}

/// Format a color as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
pub fn format_hex_color(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}
