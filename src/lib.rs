//! Marquee - Library for composing tile-lattice artwork for LED signs
//!
//! This library provides functionality to:
//! - Address a fixed grid of tiles and paint cells of one of seven shapes
//! - Stack cells into layers above a locked background and a border
//! - Smooth freehand strokes into rounded outlines
//! - Drive drawing, filling, moving, copying and erasing from pointer events
//! - Typeset text from bitmap glyph fonts and export layers back to glyphs
//! - Save documents as JSON and render previews to PNG

pub mod address;
pub mod autotile;
pub mod cell;
pub mod cli;
pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod glyph;
pub mod layer;
pub mod output;
pub mod palette;
pub mod render;
pub mod script;
pub mod stack;
pub mod tool;

pub use address::{GridAddress, GridGeometry, GridOffset};
pub use cell::{Cell, Shape};
pub use document::Document;
pub use error::EditorError;
pub use glyph::{Font, Glyph};
pub use layer::Layer;
pub use palette::{ColorIndex, Palette};
pub use stack::LayerStack;
pub use tool::{EditorState, Mode};
