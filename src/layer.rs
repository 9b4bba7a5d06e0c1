//! Layers: ordered, address-deduplicated cell collections
//!
//! A [`Layer`] keeps its cells in insertion order (the draw order within the
//! layer) next to an address index used for O(1) membership tests. The two are
//! kept in bijection by every mutating operation: no two cells of a layer ever
//! share an address.

use crate::address::GridAddress;
use crate::autotile;
use crate::cell::{Cell, Shape};
use crate::codec;
use crate::glyph::Glyph;
use crate::palette::{ColorIndex, Palette};
use crate::render::TileSurface;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Suffix appended to the name of a duplicated layer.
pub const COPY_SUFFIX: &str = "-copy";

/// A named, independently editable set of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LayerRecord", into = "LayerRecord")]
pub struct Layer {
    name: String,
    cells: Vec<Cell>,
    index: HashMap<GridAddress, usize>,
    visible: bool,
    locked: bool,
}

/// Serialized form of a layer; the address index is rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LayerRecord {
    name: String,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    locked: bool,
    cells: Vec<Cell>,
}

fn default_true() -> bool {
    true
}

impl From<LayerRecord> for Layer {
    fn from(record: LayerRecord) -> Self {
        let mut layer = Layer::from_cells(record.name, record.cells);
        layer.visible = record.visible;
        layer.locked = record.locked;
        layer
    }
}

impl From<Layer> for LayerRecord {
    fn from(layer: Layer) -> Self {
        LayerRecord {
            name: layer.name,
            visible: layer.visible,
            locked: layer.locked,
            cells: layer.cells,
        }
    }
}

impl Layer {
    /// An empty, visible, unlocked layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: Vec::new(),
            index: HashMap::new(),
            visible: true,
            locked: false,
        }
    }

    /// A layer holding `cells`. Later cells on an already used address are dropped.
    pub fn from_cells(name: impl Into<String>, cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut layer = Layer::new(name);
        for cell in cells {
            layer.push(cell, false);
        }
        layer
    }

    /// A layer with one `shape` cell of `color` on every address.
    pub fn filled(
        name: impl Into<String>,
        addresses: impl IntoIterator<Item = GridAddress>,
        color: ColorIndex,
        shape: Shape,
    ) -> Self {
        Layer::from_cells(name, addresses.into_iter().map(|a| Cell::new(a, color, shape)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether the layer is rendered. Locked layers always are.
    pub fn is_visible(&self) -> bool {
        self.visible || self.locked
    }

    /// Toggle visibility. Ignored on locked layers.
    pub fn set_visible(&mut self, visible: bool) {
        if !self.locked {
            self.visible = visible;
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn has(&self, address: GridAddress) -> bool {
        self.index.contains_key(&address)
    }

    pub fn get(&self, address: GridAddress) -> Option<&Cell> {
        self.index.get(&address).map(|&i| &self.cells[i])
    }

    /// Mutable access to the cell at `address`. Only color and shape can be
    /// changed through it; moving a cell goes through [`Layer::offset`].
    pub fn get_mut(&mut self, address: GridAddress) -> Option<&mut Cell> {
        match self.index.get(&address) {
            Some(&i) => self.cells.get_mut(i),
            None => None,
        }
    }

    /// Insert a cell unless its address is already taken.
    ///
    /// Returns whether the cell was inserted. With `smooth`, every cell of the
    /// layer is re-classified afterwards, since the new cell can change its
    /// neighbors' corners too.
    pub fn push(&mut self, cell: Cell, smooth: bool) -> bool {
        let address = cell.address();
        if self.index.contains_key(&address) {
            return false;
        }
        self.index.insert(address, self.cells.len());
        self.cells.push(cell);
        if smooth {
            self.smooth();
        }
        true
    }

    /// Remove the cell at `address`, if any. Neighbors keep their shapes.
    pub fn remove(&mut self, address: GridAddress) -> Option<Cell> {
        let position = self.index.remove(&address)?;
        let cell = self.cells.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(cell)
    }

    /// Stage a translation on every cell without touching addresses.
    pub fn offset(&mut self, dx: i32, dy: i32) {
        for cell in &mut self.cells {
            cell.stage_offset(dx, dy);
        }
    }

    /// Whether any cell holds an uncommitted offset.
    pub fn has_staged(&self) -> bool {
        self.cells.iter().any(|c| c.staged_offset().is_some())
    }

    /// Commit staged translations and rebuild the address index.
    pub fn finalize(&mut self) {
        for cell in &mut self.cells {
            cell.finalize_offset();
        }
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self.cells.iter().enumerate().map(|(i, c)| (c.address(), i)).collect();
    }

    /// Recolor every cell. Shapes and addresses are unchanged.
    ///
    /// `color` is not checked against the palette; see [`Cell::new`].
    pub fn fill(&mut self, color: ColorIndex) {
        for cell in &mut self.cells {
            cell.set_color(color);
        }
    }

    /// A fresh copy named `<name>-copy` with new cells and no staged offsets.
    pub fn duplicate(&self) -> Layer {
        let cells = self.cells.iter().map(|c| Cell::new(c.address(), c.color(), c.shape()));
        let mut copy = Layer::from_cells(format!("{}{}", self.name, COPY_SUFFIX), cells);
        copy.visible = self.visible;
        copy
    }

    /// Re-run corner classification on every cell against this layer's occupancy.
    pub fn smooth(&mut self) {
        let shapes: Vec<Shape> = self
            .cells
            .iter()
            .map(|c| autotile::classify(c.address(), |a| self.index.contains_key(&a)))
            .collect();
        for (cell, shape) in self.cells.iter_mut().zip(shapes) {
            cell.set_shape(shape);
        }
    }

    /// Smallest `(min, max)` address box holding every cell.
    pub fn bounds(&self) -> Option<(GridAddress, GridAddress)> {
        let mut cells = self.cells.iter().map(|c| c.address());
        let first = cells.next()?;
        Some(cells.fold((first, first), |(lo, hi), a| {
            (
                GridAddress::new(lo.gx.min(a.gx), lo.gy.min(a.gy)),
                GridAddress::new(hi.gx.max(a.gx), hi.gy.max(a.gy)),
            )
        }))
    }

    /// Distinct colors used by the layer, ascending.
    pub fn colors(&self) -> Vec<ColorIndex> {
        let mut colors: Vec<_> = self.cells.iter().map(|c| c.color()).collect();
        colors.sort();
        colors.dedup();
        colors
    }

    /// Pack the layer into a glyph pixel matrix. See [`codec::export_layer`].
    pub fn to_pixel_matrix(&self) -> Glyph {
        codec::export_layer(self)
    }

    /// Draw every cell in insertion order.
    pub fn draw<S: TileSurface + ?Sized>(&self, palette: &Palette, surface: &mut S) {
        for cell in &self.cells {
            cell.draw(palette, surface);
        }
    }

    /// Check that the address index and the cell list agree.
    pub fn is_consistent(&self) -> bool {
        self.index.len() == self.cells.len()
            && self
                .index
                .iter()
                .all(|(a, &i)| self.cells.get(i).is_some_and(|c| c.address() == *a))
    }
}
