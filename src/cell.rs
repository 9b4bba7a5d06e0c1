//! Tiles and their shapes
//!
//! A [`Cell`] is one tile on the lattice: where it sits, which palette entry it
//! uses and which [`Shape`] it is drawn as. Cells also hold an optional staged
//! offset, the uncommitted half of a drag: the committed address is only ever
//! changed by [`Cell::finalize_offset`].

use crate::address::{GridAddress, GridOffset};
use crate::palette::{ColorIndex, Palette};
use crate::render::TileSurface;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tile shapes.
///
/// `Pen` is the freehand stamp: it renders as a square and marks cells that
/// the corner-smoothing pass is expected to reshape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    #[serde(rename = "square")]
    Square,
    #[serde(rename = "circle")]
    Circle,
    #[serde(rename = "cornerNE")]
    CornerNe,
    #[serde(rename = "cornerSE")]
    CornerSe,
    #[serde(rename = "cornerSW")]
    CornerSw,
    #[serde(rename = "cornerNW")]
    CornerNw,
    #[serde(rename = "pen")]
    Pen,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::Square,
        Shape::Circle,
        Shape::CornerNe,
        Shape::CornerSe,
        Shape::CornerSw,
        Shape::CornerNw,
        Shape::Pen,
    ];

    /// Shape for a glyph pixel code; 0 and unknown codes are empty.
    pub fn from_code(code: u8) -> Option<Shape> {
        match code {
            1 => Some(Shape::Square),
            2 => Some(Shape::Circle),
            3 => Some(Shape::CornerNe),
            4 => Some(Shape::CornerSe),
            5 => Some(Shape::CornerSw),
            6 => Some(Shape::CornerNw),
            _ => None,
        }
    }

    /// Glyph pixel code for this shape. Pen cells are exported as squares.
    pub fn code(self) -> u8 {
        match self {
            Shape::Square | Shape::Pen => 1,
            Shape::Circle => 2,
            Shape::CornerNe => 3,
            Shape::CornerSe => 4,
            Shape::CornerSw => 5,
            Shape::CornerNw => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Circle => "circle",
            Shape::CornerNe => "cornerNE",
            Shape::CornerSe => "cornerSE",
            Shape::CornerSw => "cornerSW",
            Shape::CornerNw => "cornerNW",
            Shape::Pen => "pen",
        }
    }

    /// Whether stamping this shape asks for corner smoothing.
    pub fn smooths(self) -> bool {
        self == Shape::Pen
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Shape::ALL.iter().map(|s| s.name()).collect();
                format!("unknown shape '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One tile owned by a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(flatten)]
    address: GridAddress,
    color: ColorIndex,
    shape: Shape,
    #[serde(skip)]
    staged: Option<GridOffset>,
}

impl Cell {
    /// A cell with no staged offset.
    ///
    /// `color` is not checked against any palette here; callers validate it with
    /// [`Palette::check`](crate::palette::Palette::check), as
    /// [`EditorState::set_color`](crate::tool::EditorState::set_color) does. An
    /// out-of-range color renders magenta and fails [`Document::validate`](crate::document::Document::validate).
    pub fn new(address: GridAddress, color: ColorIndex, shape: Shape) -> Self {
        Self { address, color, shape, staged: None }
    }

    /// Committed address.
    pub fn address(&self) -> GridAddress {
        self.address
    }

    pub fn color(&self) -> ColorIndex {
        self.color
    }

    pub fn set_color(&mut self, color: ColorIndex) {
        self.color = color;
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    /// Record a pending translation. Replaces any earlier staged value, since
    /// drag deltas are always measured from the drag anchor.
    pub fn stage_offset(&mut self, dx: i32, dy: i32) {
        let offset = GridOffset::new(dx, dy);
        self.staged = if offset.is_zero() { None } else { Some(offset) };
    }

    pub fn staged_offset(&self) -> Option<GridOffset> {
        self.staged
    }

    /// Where the cell is shown: committed address plus any staged offset.
    pub fn preview_position(&self) -> GridAddress {
        self.address + self.staged.unwrap_or(GridOffset::ZERO)
    }

    /// Commit the staged translation into the address and clear it.
    pub fn finalize_offset(&mut self) {
        if let Some(offset) = self.staged.take() {
            self.address = self.address + offset;
        }
    }

    /// Hand this cell to a surface at its preview position. Never mutates.
    pub fn draw<S: TileSurface + ?Sized>(&self, palette: &Palette, surface: &mut S) {
        surface.draw_tile(self.preview_position(), self.shape, palette.get(self.color));
    }
}
