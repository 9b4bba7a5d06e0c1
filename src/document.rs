//! Saved artwork: grid, palette and committed layers
//!
//! Documents are plain JSON. Cells are written as `{gx, gy, color, shape}`;
//! staged drag offsets and the in-progress working layer are never saved.

use crate::address::GridGeometry;
use crate::error::EditorError;
use crate::palette::Palette;
use crate::stack::LayerStack;
use serde::{Deserialize, Serialize};

/// A saved layer stack together with the grid and palette it was drawn on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub grid: GridGeometry,
    #[serde(default)]
    pub palette: Palette,
    pub layers: LayerStack,
}

impl Document {
    pub fn new(grid: GridGeometry, palette: Palette, layers: LayerStack) -> Self {
        Self { grid, palette, layers }
    }

    /// Parse and validate a document.
    pub fn from_json(text: &str) -> Result<Self, EditorError> {
        let document: Document =
            serde_json::from_str(text).map_err(|e| EditorError::Parse(e.to_string()))?;
        document.validate()?;
        Ok(document)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        serde_json::to_string_pretty(self).map_err(|e| EditorError::Parse(e.to_string()))
    }

    /// The grid must be renderable and every cell must use a color from the palette.
    pub fn validate(&self) -> Result<(), EditorError> {
        self.grid.validate()?;
        for layer in self.layers.iter() {
            for cell in layer.cells() {
                self.palette.check(cell.color().index()).map_err(|source| {
                    EditorError::InvalidCellColor { layer: layer.name().to_string(), source }
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{GridAddress, GridError};
    use crate::cell::{Cell, Shape};
    use crate::layer::Layer;
    use crate::palette::{ColorIndex, PaletteError};

    fn sample() -> Document {
        let grid = GridGeometry::new(6, 4, 8);
        let mut stack = LayerStack::new(&grid, ColorIndex(0), ColorIndex(1), 1);
        stack.add(Layer::from_cells(
            "mark",
            [Cell::new(GridAddress::new(2, 2), ColorIndex(4), Shape::CornerSe)],
        ));
        Document::new(grid, Palette::default(), stack)
    }

    #[test]
    fn test_json_round_trip() {
        let document = sample();
        let json = document.to_json().unwrap();
        let parsed = Document::from_json(&json).unwrap();
        assert_eq!(parsed, document);
        assert!(parsed.layers.get(0).unwrap().is_locked());
    }

    #[test]
    fn test_staged_offsets_are_not_saved() {
        let mut document = sample();
        document.layers.get_mut(2).unwrap().offset(1, 1);
        let parsed = Document::from_json(&document.to_json().unwrap()).unwrap();
        let layer = parsed.layers.get(2).unwrap();
        assert!(!layer.has_staged());
        assert!(layer.has(GridAddress::new(2, 2)));
    }

    #[test]
    fn test_validate_rejects_foreign_colors() {
        let mut document = sample();
        document.layers.get_mut(2).unwrap().fill(ColorIndex(9));
        assert_eq!(
            document.validate(),
            Err(EditorError::InvalidCellColor {
                layer: "mark".to_string(),
                source: PaletteError::OutOfRange { index: 9, len: 7 },
            })
        );
    }

    #[test]
    fn test_missing_palette_uses_default() {
        let json = r#"{"grid":{"width":2,"height":2,"zoom":4},"layers":[
            {"name":"background","locked":true,"cells":[]},
            {"name":"border","cells":[]}]}"#;
        let document = Document::from_json(json).unwrap();
        assert_eq!(document.palette, Palette::default());
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let json = r#"{"grid":{"width":200000,"height":1,"zoom":30000},"layers":[
            {"name":"background","locked":true,"cells":[]},
            {"name":"border","cells":[]}]}"#;
        assert!(matches!(
            Document::from_json(json),
            Err(EditorError::Grid(GridError::TooManyTiles { width: 200000, height: 1 }))
        ));

        let mut document = sample();
        document.grid.zoom = 0;
        assert!(matches!(document.validate(), Err(EditorError::Grid(GridError::ZeroSize { .. }))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(Document::from_json("{"), Err(EditorError::Parse(_))));
    }
}
