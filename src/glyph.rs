//! Bitmap-font glyph model
//!
//! Fonts are maps from single-character keys to glyph records:
//!
//! ```json
//! { "A": { "offset": 0, "pixels": [[0,2,0],[1,0,1]] },
//!   "B": { "offset": 1, "pixels": [[[1,1]],[[0,2]]], "layers": 2 } }
//! ```
//!
//! Pixel codes are 0 (empty) and 1..=6 for square, circle and the four
//! corners. When `layers` is present, `pixels` holds one matrix per color plane.

use crate::cell::Shape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Highest valid pixel code.
pub const MAX_CODE: u8 = 6;

/// Rows of pixel codes, row-major.
pub type PixelMatrix = Vec<Vec<u8>>;

/// Error type for malformed glyphs and fonts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlyphError {
    /// Pixel code outside 0..=6
    #[error("plane {plane}, row {row}, column {column}: invalid pixel code {code}, expected 0-6")]
    InvalidCode { plane: usize, row: usize, column: usize, code: u8 },
    /// A row whose width differs from the first row
    #[error("plane {plane}, row {row} has {found} pixels, expected {expected}")]
    RaggedRow { plane: usize, row: usize, expected: usize, found: usize },
    /// Planes of a layered glyph must share one size
    #[error("plane {plane} is {found_w}x{found_h}, expected {expected_w}x{expected_h}")]
    PlaneSizeMismatch {
        plane: usize,
        expected_w: usize,
        expected_h: usize,
        found_w: usize,
        found_h: usize,
    },
    /// `layers` disagrees with the number of matrices in `pixels`
    #[error("glyph declares {declared} layer(s) but has {found} plane(s)")]
    LayerCountMismatch { declared: usize, found: usize },
    /// Error inside one glyph of a font
    #[error("glyph '{key}': {source}")]
    InFont {
        key: String,
        #[source]
        source: Box<GlyphError>,
    },
    /// Font text could not be parsed
    #[error("font parse error: {0}")]
    Parse(String),
}

/// One matrix, or a stack of same-sized matrices for multi-color glyphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GlyphPixels {
    Single(PixelMatrix),
    Planes(Vec<PixelMatrix>),
}

/// A packed glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    /// Vertical baseline shift in tiles
    #[serde(default)]
    pub offset: i32,
    pub pixels: GlyphPixels,
    /// Number of color planes when `pixels` is layered
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub layers: Option<usize>,
}

/// The glyph used for ' ': no pixels, no width.
pub static SPACE: Glyph = Glyph { offset: 0, pixels: GlyphPixels::Single(Vec::new()), layers: None };

impl Glyph {
    /// A single-plane glyph.
    pub fn single(offset: i32, pixels: PixelMatrix) -> Self {
        Self { offset, pixels: GlyphPixels::Single(pixels), layers: None }
    }

    /// A layered glyph; `layers` is set to the plane count.
    pub fn layered(offset: i32, planes: Vec<PixelMatrix>) -> Self {
        let layers = Some(planes.len());
        Self { offset, pixels: GlyphPixels::Planes(planes), layers }
    }

    /// Color planes, bottom first.
    pub fn planes(&self) -> &[PixelMatrix] {
        match &self.pixels {
            GlyphPixels::Single(matrix) => std::slice::from_ref(matrix),
            GlyphPixels::Planes(planes) => planes,
        }
    }

    pub fn is_layered(&self) -> bool {
        matches!(self.pixels, GlyphPixels::Planes(_))
    }

    /// Width in tiles, taken from the first row of the first plane.
    pub fn width(&self) -> usize {
        self.planes().first().and_then(|p| p.first()).map_or(0, |row| row.len())
    }

    /// Height in tiles, the row count of the first plane.
    pub fn height(&self) -> usize {
        self.planes().first().map_or(0, |p| p.len())
    }

    /// Occupied pixels as `(plane, x, y, shape)`.
    pub fn shapes(&self) -> impl Iterator<Item = (usize, usize, usize, Shape)> + '_ {
        self.planes().iter().enumerate().flat_map(|(plane, matrix)| {
            matrix.iter().enumerate().flat_map(move |(y, row)| {
                row.iter()
                    .enumerate()
                    .filter_map(move |(x, &code)| Shape::from_code(code).map(|s| (plane, x, y, s)))
            })
        })
    }

    /// Check codes, row widths, plane sizes and the declared layer count.
    pub fn validate(&self) -> Result<(), GlyphError> {
        let planes = self.planes();
        if let Some(declared) = self.layers {
            if declared != planes.len() {
                return Err(GlyphError::LayerCountMismatch { declared, found: planes.len() });
            }
        }

        let (expected_w, expected_h) = (self.width(), self.height());
        for (plane, matrix) in planes.iter().enumerate() {
            let found_w = matrix.first().map_or(0, |r| r.len());
            if matrix.len() != expected_h || found_w != expected_w {
                return Err(GlyphError::PlaneSizeMismatch {
                    plane,
                    expected_w,
                    expected_h,
                    found_w,
                    found_h: matrix.len(),
                });
            }
            for (row, cells) in matrix.iter().enumerate() {
                if cells.len() != expected_w {
                    return Err(GlyphError::RaggedRow {
                        plane,
                        row,
                        expected: expected_w,
                        found: cells.len(),
                    });
                }
                if let Some((column, &code)) = cells.iter().enumerate().find(|(_, c)| **c > MAX_CODE) {
                    return Err(GlyphError::InvalidCode { plane, row, column, code });
                }
            }
        }
        Ok(())
    }
}

/// A bitmap font keyed by character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Font {
    glyphs: BTreeMap<String, Glyph>,
}

impl Font {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a font from JSON (comments and trailing commas allowed) and validate it.
    pub fn from_json(text: &str) -> Result<Self, GlyphError> {
        let font: Font = json5::from_str(text).map_err(|e| GlyphError::Parse(e.to_string()))?;
        font.validate()?;
        Ok(font)
    }

    pub fn insert(&mut self, key: impl Into<String>, glyph: Glyph) {
        self.glyphs.insert(key.into(), glyph);
    }

    pub fn get(&self, key: &str) -> Option<&Glyph> {
        self.glyphs.get(key)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Glyph)> {
        self.glyphs.iter()
    }

    /// Glyph for `ch`: space is always the empty glyph, otherwise exact match,
    /// then upper case, then lower case.
    ///
    /// # Examples
    ///
    /// ```
    /// use marquee::glyph::{Font, Glyph};
    ///
    /// let mut font = Font::new();
    /// font.insert("A", Glyph::single(0, vec![vec![1]]));
    /// assert!(font.resolve('a').is_some());
    /// assert_eq!(font.resolve(' ').unwrap().width(), 0);
    /// assert!(font.resolve('b').is_none());
    /// ```
    pub fn resolve(&self, ch: char) -> Option<&Glyph> {
        if ch == ' ' {
            return Some(&SPACE);
        }
        let mut buf = [0; 4];
        let exact: &str = ch.encode_utf8(&mut buf);
        let upper: String = ch.to_uppercase().collect();
        let lower: String = ch.to_lowercase().collect();
        self.glyphs
            .get(exact)
            .or_else(|| self.glyphs.get(&upper))
            .or_else(|| self.glyphs.get(&lower))
    }

    pub fn validate(&self) -> Result<(), GlyphError> {
        for (key, glyph) in &self.glyphs {
            glyph
                .validate()
                .map_err(|e| GlyphError::InFont { key: key.clone(), source: Box::new(e) })?;
        }
        Ok(())
    }
}

impl FromIterator<(String, Glyph)> for Font {
    fn from_iter<T: IntoIterator<Item = (String, Glyph)>>(iter: T) -> Self {
        Self { glyphs: iter.into_iter().collect() }
    }
}
