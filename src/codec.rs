//! Glyph codec: packed pixel matrices to placed cells and back
//!
//! Import places a glyph's nonzero pixels as cells relative to a cursor, one
//! layer per color plane. Export packs a layer's cells into the bounding box of
//! their addresses, one plane per distinct color, so drawn layers can be saved
//! as new font glyphs.

use crate::address::{GridAddress, GridGeometry};
use crate::cell::Cell;
use crate::glyph::{Font, Glyph, PixelMatrix};
use crate::layer::Layer;
use crate::palette::{ColorIndex, Palette};
use crate::stack::LayerStack;
use log::{debug, warn};

/// Gap in tiles between consecutive glyphs.
pub const GLYPH_SPACING: i32 = 1;

/// Place `glyph` with its top-left pixel at `cursor`.
///
/// Returns one layer per non-empty plane. A single-plane glyph uses `base`; a
/// layered glyph colors plane `i` with `base + i`, wrapping around the palette.
/// Layered planes are named `<name>.<i>`.
pub fn import_glyph(
    glyph: &Glyph,
    cursor: GridAddress,
    base: ColorIndex,
    palette: &Palette,
    name: &str,
) -> Vec<Layer> {
    let layered = glyph.is_layered();
    let mut layers: Vec<Layer> = glyph
        .planes()
        .iter()
        .enumerate()
        .map(|(plane, _)| {
            if layered {
                Layer::new(format!("{}.{}", name, plane))
            } else {
                Layer::new(name)
            }
        })
        .collect();

    for (plane, x, y, shape) in glyph.shapes() {
        let color = if layered { palette.rotate(base, plane) } else { base };
        let address = GridAddress::new(cursor.gx + x as i32, cursor.gy + y as i32 + glyph.offset);
        layers[plane].push(Cell::new(address, color, shape), false);
    }

    layers.retain(|layer| !layer.is_empty());
    layers
}

/// A run of text resolved against a font.
#[derive(Debug, Clone)]
pub struct TextLayout<'a> {
    /// Resolved glyphs in order
    pub glyphs: Vec<(char, &'a Glyph)>,
    /// Characters with no glyph; they take no space
    pub skipped: Vec<char>,
    /// Total width in tiles including the gaps between glyphs
    pub width: i32,
    /// Tallest `offset + rows` over all glyphs
    pub height: i32,
}

impl TextLayout<'_> {
    /// Top-left cursor that centers the run on `grid`.
    pub fn centered_origin(&self, grid: &GridGeometry) -> GridAddress {
        GridAddress::new(
            (grid.width as i32 - self.width).div_euclid(2),
            (grid.height as i32 - self.height).div_euclid(2),
        )
    }
}

/// Resolve every character of `text` and measure the run.
pub fn layout_text<'a>(font: &'a Font, text: &str) -> TextLayout<'a> {
    let mut glyphs = Vec::new();
    let mut skipped = Vec::new();
    let mut width = -GLYPH_SPACING;
    let mut height = 0;

    for ch in text.chars() {
        match font.resolve(ch) {
            Some(glyph) => {
                width += glyph.width() as i32 + GLYPH_SPACING;
                height = height.max(glyph.offset + glyph.height() as i32);
                glyphs.push((ch, glyph));
            }
            None => {
                warn!("no glyph for {:?}, skipping", ch);
                skipped.push(ch);
            }
        }
    }

    TextLayout { glyphs, skipped, width: width.max(0), height }
}

/// Import every glyph of a layout left to right starting at `origin`.
pub fn typeset(
    layout: &TextLayout<'_>,
    origin: GridAddress,
    base: ColorIndex,
    palette: &Palette,
) -> Vec<Layer> {
    let mut cursor = origin;
    let mut layers = Vec::new();
    for (ch, glyph) in &layout.glyphs {
        layers.extend(import_glyph(glyph, cursor, base, palette, &ch.to_string()));
        cursor.gx += glyph.width() as i32 + GLYPH_SPACING;
    }
    debug!("typeset {} glyph(s) into {} layer(s)", layout.glyphs.len(), layers.len());
    layers
}

/// Pack a layer into a glyph with offset 0.
///
/// The matrix spans the bounding box of the committed addresses. Each distinct
/// color, ascending, becomes one plane holding the shape codes of its cells.
/// A single color exports as a flat matrix; several as planes plus `layers`.
pub fn export_layer(layer: &Layer) -> Glyph {
    let Some((lo, hi)) = layer.bounds() else {
        return Glyph::single(0, Vec::new());
    };
    let width = (hi.gx - lo.gx + 1) as usize;
    let height = (hi.gy - lo.gy + 1) as usize;

    let mut planes: Vec<PixelMatrix> = layer
        .colors()
        .into_iter()
        .map(|color| {
            let mut matrix = vec![vec![0u8; width]; height];
            for cell in layer.cells().iter().filter(|c| c.color() == color) {
                let a = cell.address();
                matrix[(a.gy - lo.gy) as usize][(a.gx - lo.gx) as usize] = cell.shape().code();
            }
            matrix
        })
        .collect();

    if planes.len() == 1 {
        Glyph::single(0, planes.remove(0))
    } else {
        Glyph::layered(0, planes)
    }
}

/// Export every user layer of a stack, keyed by layer name.
///
/// A name already taken by a lower layer is suffixed with `#<index>`.
pub fn export_stack(stack: &LayerStack) -> Font {
    let mut font = Font::new();
    for (index, layer) in stack.iter().enumerate() {
        if LayerStack::is_protected(index) {
            continue;
        }
        let key = if font.get(layer.name()).is_some() {
            format!("{}#{}", layer.name(), index)
        } else {
            layer.name().to_string()
        };
        font.insert(key, export_layer(layer));
    }
    font
}
