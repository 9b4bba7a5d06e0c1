//! Configuration schema types for `marquee.toml`
//!
//! Every section and field is optional; missing values fall back to the
//! stock 64x16 sign with the seven-color palette.

use crate::address::GridGeometry;
use crate::cell::Shape;
use crate::error::EditorError;
use crate::palette::{parse_hex_color, Palette, DEFAULT_COLORS, MAX_COLORS};
use crate::tool::{EditorState, Mode};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Grid dimensions in tiles and the on-screen tile size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Pixels per tile edge
    #[serde(default = "default_zoom")]
    pub zoom: u32,
    /// Thickness of the border outline, in tiles
    #[serde(default = "default_border_width")]
    pub border_width: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            zoom: default_zoom(),
            border_width: default_border_width(),
        }
    }
}

fn default_width() -> u32 {
    64
}

fn default_height() -> u32 {
    16
}

fn default_zoom() -> u32 {
    24
}

fn default_border_width() -> u32 {
    1
}

/// Palette colors and the roles of the base layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Hex colors, `#RGB`, `#RRGGBB` or `#RRGGBBAA`
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
    /// Palette index of the background layer
    #[serde(default)]
    pub background: usize,
    /// Palette index of the border layer
    #[serde(default = "default_border")]
    pub border: usize,
    /// Color behind all layers in rendered previews
    #[serde(default = "default_canvas")]
    pub canvas: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            background: 0,
            border: default_border(),
            canvas: default_canvas(),
        }
    }
}

fn default_colors() -> Vec<String> {
    DEFAULT_COLORS.iter().map(|c| c.to_string()).collect()
}

fn default_border() -> usize {
    1
}

fn default_canvas() -> String {
    "#3f3f3e".to_string()
}

/// Initial tool state of a fresh editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_tool")]
    pub tool: Shape,
    #[serde(default = "default_color")]
    pub color: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { mode: Mode::default(), tool: default_tool(), color: default_color() }
    }
}

fn default_tool() -> Shape {
    Shape::Pen
}

fn default_color() -> usize {
    1
}

/// Root configuration structure for `marquee.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarqueeConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    /// Glyph fonts by name; relative paths resolve against the config file
    #[serde(default)]
    pub fonts: BTreeMap<String, PathBuf>,
}

/// A single validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "palette.colors[2]")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marquee.toml: '{}' {}", self.field, self.message)
    }
}

impl MarqueeConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut error = |field: String, message: String| {
            errors.push(ConfigValidationError { field, message });
        };

        for (field, value) in [
            ("grid.width", self.grid.width),
            ("grid.height", self.grid.height),
            ("grid.zoom", self.grid.zoom),
        ] {
            if value == 0 {
                error(field.to_string(), "must be a positive integer".to_string());
            }
        }
        if self.grid.width > 0 && self.grid.height > 0 && self.grid.zoom > 0 {
            if let Err(e) = self.grid().validate() {
                error("grid".to_string(), e.to_string());
            }
        }

        if self.palette.colors.is_empty() {
            error("palette.colors".to_string(), "must contain at least one color".to_string());
        }
        if self.palette.colors.len() > MAX_COLORS {
            error(
                "palette.colors".to_string(),
                format!("must contain at most {} colors", MAX_COLORS),
            );
        }
        for (i, color) in self.palette.colors.iter().enumerate() {
            if let Err(e) = parse_hex_color(color) {
                error(format!("palette.colors[{}]", i), e.to_string());
            }
        }
        if let Err(e) = parse_hex_color(&self.palette.canvas) {
            error("palette.canvas".to_string(), e.to_string());
        }

        let len = self.palette.colors.len();
        for (field, index) in [
            ("palette.background", self.palette.background),
            ("palette.border", self.palette.border),
            ("editor.color", self.editor.color),
        ] {
            if index >= len {
                error(field.to_string(), format!("index {} is outside the {}-color palette", index, len));
            }
        }

        for (name, path) in &self.fonts {
            if path.as_os_str().is_empty() {
                error(format!("fonts.{}", name), "must be a file path".to_string());
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn grid(&self) -> GridGeometry {
        GridGeometry::new(self.grid.width, self.grid.height, self.grid.zoom)
    }

    pub fn palette(&self) -> Result<Palette, EditorError> {
        Ok(Palette::from_hex(&self.palette.colors)?)
    }

    pub fn canvas(&self) -> Result<Rgba<u8>, EditorError> {
        Ok(parse_hex_color(&self.palette.canvas)?)
    }

    /// A blank editor with the configured grid, palette and initial tool state.
    pub fn new_editor(&self) -> Result<EditorState, EditorError> {
        let palette = self.palette()?;
        let background = palette.check(self.palette.background)?;
        let border = palette.check(self.palette.border)?;
        let mut state =
            EditorState::blank(self.grid(), palette, background, border, self.grid.border_width)?;
        state.set_mode(self.editor.mode);
        state.set_tool(self.editor.tool);
        state.set_color(self.editor.color)?;
        Ok(state)
    }
}
