//! Error types for editor operations

use crate::address::GridError;
use crate::glyph::GlyphError;
use crate::palette::PaletteError;
use thiserror::Error;

/// Error returned by stack edits and editor commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Background and border cannot be removed or targeted by tools
    #[error("layer {0} is protected")]
    ProtectedLayer(usize),
    /// Layer index past the top of the stack
    #[error("layer index {index} out of range for stack of {len}")]
    LayerOutOfRange { index: usize, len: usize },
    /// A stack was loaded without background and border
    #[error("layer stack needs background and border layers, found {0} layer(s)")]
    MissingBaseLayers(usize),
    /// A cell or command used a color outside the palette
    #[error("layer '{layer}': {source}")]
    InvalidCellColor {
        layer: String,
        #[source]
        source: PaletteError,
    },
    /// A document could not be read or written
    #[error("document error: {0}")]
    Parse(String),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Glyph(#[from] GlyphError),
}
